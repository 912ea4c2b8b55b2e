//! # LSB 隐写编解码器
//!
//! 载荷帧为 `长度前缀 (u32, 大端序) || 消息字节`，按高位在前展开为位序列后，
//! 以行优先、像素内按通道存储顺序的方式逐位写入各通道的最低有效位。
//! 帧之后的像素与通道保持原样。
//!
//! 编解码器是无状态的纯函数，不做任何 I/O，可以在互不相干的网格上并发调用。

use log::{debug, trace};

use crate::bits::{bits_to_bytes, bytes_to_bits};
use crate::constants::{BITS_PER_BYTE, LENGTH_PREFIX_BITS};
use crate::error::StegoError;
use crate::grid::{ChannelPolicy, PixelGrid};

/// 嵌入与提取共用的选项，两端必须一致。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecOptions {
    pub channels: ChannelPolicy,
}

impl CodecOptions {
    pub fn with_alpha(use_alpha: bool) -> Self {
        Self {
            channels: if use_alpha {
                ChannelPolicy::UseAlpha
            } else {
                ChannelPolicy::SkipAlpha
            },
        }
    }
}

/// 长度为 `message_len` 的消息成帧后所需的位数。
pub fn required_bits(message_len: usize) -> u64 {
    LENGTH_PREFIX_BITS as u64 + message_len as u64 * BITS_PER_BYTE as u64
}

/// 网格可用于嵌入的总位数。
pub fn capacity_bits(grid: &PixelGrid, opts: &CodecOptions) -> u64 {
    grid.capacity_bits(opts.channels)
}

/// 网格最多能容纳的消息字节数。
pub fn max_message_len(grid: &PixelGrid, opts: &CodecOptions) -> u64 {
    let payload_bits = capacity_bits(grid, opts).saturating_sub(LENGTH_PREFIX_BITS as u64);
    (payload_bits / BITS_PER_BYTE as u64).min(u64::from(u32::MAX))
}

/// 将消息嵌入网格，返回修改后的网格。
///
/// 容量检查在写入任何一位之前完成，失败时不会产生部分修改的结果。
///
/// # Errors
///
/// * [`StegoError::EmptyMessage`] - 消息为空。
/// * [`StegoError::InsufficientCapacity`] - 成帧后的载荷超出网格容量
///   (包括零像素网格，以及长度无法用 `u32` 表示的消息)。
pub fn embed(
    mut grid: PixelGrid,
    message: &[u8],
    opts: &CodecOptions,
) -> Result<PixelGrid, StegoError> {
    if message.is_empty() {
        return Err(StegoError::EmptyMessage);
    }

    let required = required_bits(message.len());
    let available = capacity_bits(&grid, opts);
    let length = u32::try_from(message.len())
        .map_err(|_| insufficient_capacity(required, available))?;
    if required > available {
        return Err(insufficient_capacity(required, available));
    }

    let mut frame = Vec::with_capacity(LENGTH_PREFIX_BITS / BITS_PER_BYTE + message.len());
    frame.extend_from_slice(&length.to_be_bytes());
    frame.extend_from_slice(message);
    let bits = bytes_to_bits(&frame);

    let slots = grid.slot_indices(opts.channels);
    let pixels = grid.as_raw_mut();
    for (index, bit) in slots.zip(bits) {
        pixels[index] = (pixels[index] & 0xFE) | bit;
    }

    debug!(
        "Embedded {} message bytes ({} of {} bits) into a {}x{} grid",
        message.len(),
        required,
        available,
        grid.width(),
        grid.height()
    );

    Ok(grid)
}

/// 从网格中提取隐藏的消息字节。
///
/// 长度前缀为 `0` 时返回空序列。
///
/// # Errors
///
/// [`StegoError::CorruptOrForeignImage`] - 网格连长度前缀都放不下，
/// 或长度前缀声明的载荷超出网格容量。
pub fn extract(grid: &PixelGrid, opts: &CodecOptions) -> Result<Vec<u8>, StegoError> {
    let available = capacity_bits(grid, opts);
    if available < LENGTH_PREFIX_BITS as u64 {
        return Err(StegoError::CorruptOrForeignImage {
            declared: LENGTH_PREFIX_BITS as u64,
            available,
        });
    }

    let pixels = grid.as_raw();
    let mut slots = grid.slot_indices(opts.channels);

    let prefix = bits_to_bytes(&read_bits(pixels, &mut slots, LENGTH_PREFIX_BITS))?;
    let length = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    trace!("Decoded length prefix: {length}");

    let declared = required_bits(length as usize);
    if declared > available {
        return Err(StegoError::CorruptOrForeignImage {
            declared,
            available,
        });
    }

    let message = bits_to_bytes(&read_bits(
        pixels,
        &mut slots,
        length as usize * BITS_PER_BYTE,
    ))?;

    debug!(
        "Extracted {} message bytes from a {}x{} grid",
        message.len(),
        grid.width(),
        grid.height()
    );

    Ok(message)
}

/// 提取消息并按 UTF-8 解释为文本。
///
/// # Errors
///
/// 除 [`extract`] 的错误外，字节不是合法 UTF-8 时返回
/// [`StegoError::InvalidTextEncoding`]。
pub fn extract_text(grid: &PixelGrid, opts: &CodecOptions) -> Result<String, StegoError> {
    Ok(String::from_utf8(extract(grid, opts)?)?)
}

fn read_bits(pixels: &[u8], slots: &mut impl Iterator<Item = usize>, count: usize) -> Vec<u8> {
    slots.take(count).map(|index| pixels[index] & 1).collect()
}

fn insufficient_capacity(required: u64, available: u64) -> StegoError {
    StegoError::InsufficientCapacity {
        required,
        available,
    }
}
