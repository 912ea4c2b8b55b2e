/// 写在每条消息之前的长度前缀所占的位数 (大端序 `u32`)。
pub const LENGTH_PREFIX_BITS: usize = 32;

/// 每个消息字节占用 8 个通道的最低有效位，高位在前。
pub const BITS_PER_BYTE: usize = 8;

/// 载体文件大小上限 (5 MiB)，超出时在解码之前直接拒绝。
pub const MAX_INPUT_BYTES: u64 = 5 * 1024 * 1024;

/// 允许作为载体的文件扩展名。
///
/// JPEG 只能作为输入，隐写结果始终保存为 PNG。
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp", "qoi",
];

/// 默认输出图像的文件名前缀，例如 `doctored_cat.png`。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// 默认恢复文本的文件名前缀，例如 `recovered_doctored_cat.txt`。
pub const RECOVERED_TEXT_PREFIX: &str = "recovered_";
