//! # 位/字节转换
//!
//! 嵌入与提取共用的两个纯函数。位序列中每个元素取值为 `0` 或 `1`，
//! 每个字节按高位在前展开。

use crate::constants::BITS_PER_BYTE;
use crate::error::StegoError;

/// 将字节序列展开为位序列 (每字节高位在前)。
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1))
        .collect()
}

/// 将位序列重新打包为字节序列，是 [`bytes_to_bits`] 的逆运算。
///
/// # Errors
///
/// 位序列长度不是 8 的整数倍时返回 [`StegoError::UnalignedBits`]。
pub fn bits_to_bytes(bits: &[u8]) -> Result<Vec<u8>, StegoError> {
    if bits.len() % BITS_PER_BYTE != 0 {
        return Err(StegoError::UnalignedBits(bits.len()));
    }

    Ok(bits
        .chunks_exact(BITS_PER_BYTE)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_expand_msb_first() {
        assert_eq!(bytes_to_bits(&[0b1000_0001]), vec![1, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(
            bytes_to_bits(&[0x00, 0xFF]),
            vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1]
        );
        assert!(bytes_to_bits(&[]).is_empty());
    }

    #[test]
    fn bits_pack_msb_first() {
        let bits = [0, 1, 0, 0, 1, 0, 0, 0, 0, 1, 1, 0, 1, 0, 0, 1];
        assert_eq!(bits_to_bytes(&bits).unwrap(), b"Hi".to_vec());
    }

    #[test]
    fn packing_is_inverse_of_unpacking() {
        let bits: Vec<u8> = (0..64).map(|i| ((i * 7 + i / 3) % 2) as u8).collect();
        assert_eq!(bytes_to_bits(&bits_to_bytes(&bits).unwrap()), bits);

        let text = "隐写 stego ✓".as_bytes();
        assert_eq!(bits_to_bytes(&bytes_to_bits(text)).unwrap(), text);
    }

    #[test]
    fn unaligned_bits_are_rejected() {
        let result = bits_to_bytes(&[1, 0, 1]);
        assert!(matches!(result, Err(StegoError::UnalignedBits(3))));
    }
}
