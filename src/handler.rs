//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责校验输入文件、协调文件 I/O、调用图像适配器与隐写编解码器，
//! 并向用户报告结果。编解码器本身不接触文件系统。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::{
    HIDDEN_IMAGE_PREFIX, MAX_INPUT_BYTES, RECOVERED_TEXT_PREFIX, SUPPORTED_EXTENSIONS,
};
use crate::error::StegoError;
use crate::grid::PixelGrid;
use crate::image_io::{decode_lossless, encode_lossless};
use crate::steganography::{CodecOptions, capacity_bits, embed, extract_text, max_message_len};
use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责校验并读取载体图像、读取要隐藏的文本、调用隐写核心函数嵌入文本，
/// 最后将结果以 PNG 格式写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与选项的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体图像的扩展名不受支持、文件过大或无法解码。
/// * 无法读取文本文件，或文本不是合法的 UTF-8。
/// * 文本为空，或图像没有足够的空间来隐藏文本。
/// * 目标文件已存在且未指定 `--force`，或无法写入目标文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_output_path(&args.image, HIDDEN_IMAGE_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;

    if !has_png_extension(&dest) {
        warn!(
            "Output is always PNG encoded, but '{}' does not end in .png",
            dest.display()
        );
    }

    let message = read_message(&args)?;
    let grid = load_grid(&args.image)?;
    let opts = CodecOptions::with_alpha(args.use_alpha);

    info!(
        "Hiding {} bytes in {} ({}x{}, {} bits available)",
        message.len(),
        args.image.display(),
        grid.width(),
        grid.height(),
        capacity_bits(&grid, &opts)
    );

    let hidden = embed(grid, message.as_bytes(), &opts).map_err(|e| match e {
        StegoError::InsufficientCapacity {
            required,
            available,
        } => {
            let summary = format!(
                "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
                required.to_string().red().bold(),
                available.to_string().green().bold()
            );
            anyhow::Error::new(e).context(summary)
        }
        other => anyhow::Error::new(other).context("Failed to hide the text in the image."),
    })?;

    let png = encode_lossless(&hidden).context("Failed to encode the resulting image as PNG.")?;

    fs::write(&dest, png).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责校验并读取经过隐写的图像、调用恢复核心函数提取文本，
/// 最后将恢复的文本内容写入目标文本文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与选项的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 图像的扩展名不受支持、文件过大或无法解码。
/// * 图像中没有隐藏消息、数据已损坏，或隐藏的内容不是 UTF-8 文本。
/// * 目标文件已存在且未指定 `--force`，或无法写入目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_output_path(&args.image, RECOVERED_TEXT_PREFIX, "txt"));
    ensure_writable(&dest, args.force)?;

    let grid = load_grid(&args.image)?;
    let opts = CodecOptions::with_alpha(args.use_alpha);

    let text = extract_text(&grid, &opts).map_err(|e| {
        let hint = match e {
            StegoError::InvalidTextEncoding(_) => {
                "A hidden message was found, but it is not valid UTF-8 text."
            }
            _ => "The image may not contain a hidden message or is corrupted.",
        };
        anyhow::Error::new(e).context(format!(
            "Failed to recover the hidden text from '{}'. \n{}",
            args.image.to_string_lossy().red().bold(),
            hint
        ))
    })?;

    info!(
        "Recovered {} bytes from {}",
        text.len(),
        args.image.display()
    );

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：报告图像尺寸、可用位数与可隐藏的最大字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let grid = load_grid(&args.image)?;
    let opts = CodecOptions::with_alpha(args.use_alpha);

    println!(
        "{}: {}x{}, {} channels",
        args.image.to_string_lossy().bold(),
        grid.width(),
        grid.height(),
        grid.channels()
    );
    println!(
        "Embeddable bits: {}, maximum message size: {} bytes",
        capacity_bits(&grid, &opts).to_string().green().bold(),
        max_message_len(&grid, &opts).to_string().green().bold()
    );

    Ok(())
}

/// 校验载体文件 (扩展名、大小) 并解码为像素网格。
fn load_grid(path: &Path) -> Result<PixelGrid> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    anyhow::ensure!(
        SUPPORTED_EXTENSIONS.contains(&extension.as_str()),
        "Invalid image file type: {}. \nSupported types: {}",
        path.to_string_lossy().red().bold(),
        SUPPORTED_EXTENSIONS.join(", ")
    );

    let metadata = fs::metadata(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    anyhow::ensure!(
        metadata.len() <= MAX_INPUT_BYTES,
        "Image file is too large: {} bytes. \nThe limit is {} bytes.",
        metadata.len().to_string().red().bold(),
        MAX_INPUT_BYTES.to_string().green().bold()
    );

    let bytes = fs::read(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    anyhow::ensure!(
        !bytes.is_empty(),
        "Image file is empty: {}",
        path.to_string_lossy().red().bold()
    );

    decode_lossless(&bytes).with_context(|| {
        format!(
            "Unable to decode image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 从命令行参数或文本文件中取得要隐藏的文本。
fn read_message(args: &HideArgs) -> Result<String> {
    let message = match (&args.message, &args.text) {
        (Some(message), _) => message.clone(),
        (None, Some(path)) => fs::read_to_string(path).with_context(|| {
            format!(
                "Unable to read text file: {} \nThe file must exist and contain UTF-8 text.",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, None) => anyhow::bail!("Either a text file or a message must be provided."),
    };

    anyhow::ensure!(!message.is_empty(), StegoError::EmptyMessage);
    Ok(message)
}

/// 在输入文件旁生成默认输出路径，例如 `dir/cat.png` -> `dir/doctored_cat.png`。
fn default_output_path(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{prefix}{stem}.{extension}"))
}

/// 目标文件已存在时，除非指定了 `--force`，否则拒绝覆盖。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}
