//! # 错误类型模块
//!
//! 定义隐写编解码器与图像适配器可能返回的全部错误。
//! 所有错误都是可恢复的，命令行层会为其附加上下文后报告给用户。

use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    /// 以空消息调用 `embed`。
    #[error("The message to hide is empty")]
    EmptyMessage,

    /// 加上长度前缀后的载荷超出了图像的可用容量。
    #[error("Not enough space in the image. Required: {required} bits, Available: {available} bits")]
    InsufficientCapacity { required: u64, available: u64 },

    /// 读出的长度前缀与图像容量不符，或图像连长度前缀都放不下。
    #[error(
        "The image does not contain a hidden message or is corrupted \
         (frame needs {declared} bits, image holds {available} bits)"
    )]
    CorruptOrForeignImage { declared: u64, available: u64 },

    /// 恢复出的字节不是合法的 UTF-8 文本。
    #[error("The hidden message is not valid UTF-8 text")]
    InvalidTextEncoding(#[from] FromUtf8Error),

    /// 无法识别的图像格式。
    #[error("Image format is not supported")]
    UnsupportedFormat,

    /// 格式可识别，但图像数据无法解码。
    #[error("Image data is corrupt: {0}")]
    CorruptImage(String),

    /// 重新编码为 PNG 时失败。
    #[error("Failed to encode the image: {0}")]
    ImageEncoding(String),

    #[error("Invalid pixel grid: {0}")]
    InvalidPixelGrid(String),

    /// 位序列长度不是 8 的整数倍。
    #[error("Bit sequence of length {0} is not a multiple of 8")]
    UnalignedBits(usize),
}
