//! # 图像适配器
//!
//! 负责压缩图像文件与 [`PixelGrid`] 之间的转换，只处理内存缓冲区，不接触文件系统。
//! 输出固定为 PNG：有损格式会在重新压缩时破坏嵌入的最低有效位。

use image::{DynamicImage, ImageBuffer, ImageError, ImageFormat};
use log::debug;
use std::io::Cursor;

use crate::error::StegoError;
use crate::grid::PixelGrid;

/// 根据文件头识别图像格式。
///
/// # Errors
///
/// 无法识别或当前构建未启用该格式的解码时返回 [`StegoError::UnsupportedFormat`]。
pub fn guess_format(bytes: &[u8]) -> Result<ImageFormat, StegoError> {
    let format = image::guess_format(bytes).map_err(|_| StegoError::UnsupportedFormat)?;
    if !format.reading_enabled() {
        return Err(StegoError::UnsupportedFormat);
    }
    Ok(format)
}

/// 将压缩图像解码为像素网格。
///
/// 带 Alpha 的图像解码为 4 通道 RGBA，其余解码为 3 通道 RGB；
/// 灰度与 16 位图像统一转换为 8 位。
///
/// # Errors
///
/// * [`StegoError::UnsupportedFormat`] - 格式无法识别。
/// * [`StegoError::CorruptImage`] - 格式可识别但数据无法解码。
pub fn decode_lossless(bytes: &[u8]) -> Result<PixelGrid, StegoError> {
    let format = guess_format(bytes)?;
    let image = image::load_from_memory_with_format(bytes, format).map_err(map_decode_error)?;
    debug!(
        "Decoded {:?} image {}x{} ({:?})",
        format,
        image.width(),
        image.height(),
        image.color()
    );
    into_grid(image)
}

/// 将像素网格编码为 PNG。
///
/// # Errors
///
/// 编码器失败时返回 [`StegoError::ImageEncoding`]。
pub fn encode_lossless(grid: &PixelGrid) -> Result<Vec<u8>, StegoError> {
    let image = to_dynamic_image(grid)?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| StegoError::ImageEncoding(e.to_string()))?;

    debug!(
        "Encoded {}x{} grid as PNG ({} bytes)",
        grid.width(),
        grid.height(),
        png.len()
    );
    Ok(png)
}

fn to_dynamic_image(grid: &PixelGrid) -> Result<DynamicImage, StegoError> {
    let (width, height) = (grid.width(), grid.height());
    let raw = grid.as_raw().to_vec();
    let image = match grid.channels() {
        1 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageLuma8),
        2 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageLumaA8),
        3 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageRgb8),
        _ => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageRgba8),
    };
    image.ok_or_else(|| StegoError::InvalidPixelGrid("buffer does not match dimensions".into()))
}

fn into_grid(image: DynamicImage) -> Result<PixelGrid, StegoError> {
    let (width, height) = (image.width(), image.height());
    if image.color().has_alpha() {
        PixelGrid::new(width, height, 4, image.into_rgba8().into_raw())
    } else {
        PixelGrid::new(width, height, 3, image.into_rgb8().into_raw())
    }
}

fn map_decode_error(error: ImageError) -> StegoError {
    match error {
        ImageError::Unsupported(_) => StegoError::UnsupportedFormat,
        other => StegoError::CorruptImage(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn gradient(width: u32, height: u32, channels: u8) -> PixelGrid {
        let data = (0..width * height * u32::from(channels))
            .map(|i| (i * 37 % 256) as u8)
            .collect();
        PixelGrid::new(width, height, channels, data).unwrap()
    }

    #[test]
    fn png_preserves_pixels_exactly() {
        for channels in [3, 4] {
            let grid = gradient(17, 9, channels);
            let png = encode_lossless(&grid).unwrap();
            assert_eq!(guess_format(&png).unwrap(), ImageFormat::Png);
            assert_eq!(decode_lossless(&png).unwrap(), grid);
        }
    }

    #[test]
    fn greyscale_is_widened_to_rgb() {
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 3, Luma([200])))
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let grid = decode_lossless(&png).unwrap();
        assert_eq!(grid.channels(), 3);
        assert!(grid.as_raw().iter().all(|&value| value == 200));
    }

    #[test]
    fn jpeg_is_accepted_as_input() {
        let mut jpeg = Vec::new();
        to_dynamic_image(&gradient(8, 8, 3))
            .unwrap()
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();

        let decoded = decode_lossless(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height(), decoded.channels()), (8, 8, 3));
    }

    #[test]
    fn unknown_bytes_are_unsupported() {
        let result = decode_lossless(b"definitely not an image");
        assert!(matches!(result, Err(StegoError::UnsupportedFormat)));
    }

    #[test]
    fn truncated_png_is_corrupt() {
        let png = encode_lossless(&gradient(16, 16, 3)).unwrap();
        let result = decode_lossless(&png[..png.len() / 2]);
        assert!(matches!(result, Err(StegoError::CorruptImage(_))));
    }
}
