//! # lsb_stego 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：无状态的隐写编解码器
//! ([`steganography`])、共用的位打包函数 ([`bits`])、像素网格 ([`grid`])，
//! 以及负责图像格式转换的适配器 ([`image_io`])。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod grid;
pub mod handler;
pub mod image_io;
pub mod steganography;

pub use error::StegoError;
pub use grid::{ChannelPolicy, PixelGrid};
pub use steganography::{CodecOptions, embed, extract, extract_text};
