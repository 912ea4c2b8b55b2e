//! # 像素网格
//!
//! 编解码器操作的内存像素缓冲区：按行优先存放，每个像素包含相同数量的
//! 8 位通道。2 通道 (灰度 + Alpha) 与 4 通道 (RGBA) 网格的最后一个通道是 Alpha。

use crate::error::StegoError;

/// 是否在 Alpha 通道中嵌入数据。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelPolicy {
    /// 只使用颜色通道，Alpha 保持不变。
    #[default]
    SkipAlpha,
    /// 所有通道都参与嵌入。
    UseAlpha,
}

/// 固定尺寸、固定通道数的像素网格。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelGrid {
    /// 由原始像素数据构造网格。
    ///
    /// # Errors
    ///
    /// 通道数不在 `1..=4` 之间，或 `data` 长度不等于
    /// `width * height * channels` 时返回 [`StegoError::InvalidPixelGrid`]。
    pub fn new(
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> Result<Self, StegoError> {
        if !(1..=4).contains(&channels) {
            return Err(StegoError::InvalidPixelGrid(format!(
                "unsupported channel count {channels}"
            )));
        }

        let expected = u64::from(width) * u64::from(height) * u64::from(channels);
        if data.len() as u64 != expected {
            return Err(StegoError::InvalidPixelGrid(format!(
                "{width}x{height}x{channels} needs {expected} bytes, got {}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// 2 通道与 4 通道网格带有 Alpha 通道。
    pub fn has_alpha(&self) -> bool {
        self.channels == 2 || self.channels == 4
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// 每个像素中可用于嵌入的通道数。
    pub fn embeddable_channels(&self, policy: ChannelPolicy) -> u8 {
        match policy {
            ChannelPolicy::SkipAlpha if self.has_alpha() => self.channels - 1,
            _ => self.channels,
        }
    }

    /// 网格可容纳的总位数：每个可用通道一个最低有效位。
    pub fn capacity_bits(&self, policy: ChannelPolicy) -> u64 {
        self.pixel_count() * u64::from(self.embeddable_channels(policy))
    }

    /// 按嵌入顺序 (行优先，像素内按存储顺序) 依次给出可用通道在原始数据中的下标。
    pub(crate) fn slot_indices(
        &self,
        policy: ChannelPolicy,
    ) -> impl Iterator<Item = usize> + use<> {
        let channels = usize::from(self.channels);
        let usable = usize::from(self.embeddable_channels(policy));
        (0..self.data.len()).filter(move |index| index % channels < usable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let result = PixelGrid::new(2, 2, 3, vec![0; 11]);
        assert!(matches!(result, Err(StegoError::InvalidPixelGrid(_))));
    }

    #[test]
    fn rejects_bad_channel_count() {
        assert!(PixelGrid::new(1, 1, 0, vec![]).is_err());
        assert!(PixelGrid::new(1, 1, 5, vec![0; 5]).is_err());
    }

    #[test]
    fn capacity_depends_on_alpha_policy() {
        let rgba = PixelGrid::new(10, 10, 4, vec![0; 400]).unwrap();
        assert_eq!(rgba.capacity_bits(ChannelPolicy::SkipAlpha), 300);
        assert_eq!(rgba.capacity_bits(ChannelPolicy::UseAlpha), 400);

        let rgb = PixelGrid::new(10, 10, 3, vec![0; 300]).unwrap();
        assert_eq!(rgb.capacity_bits(ChannelPolicy::SkipAlpha), 300);
        assert_eq!(rgb.capacity_bits(ChannelPolicy::UseAlpha), 300);

        let grey_alpha = PixelGrid::new(4, 4, 2, vec![0; 32]).unwrap();
        assert_eq!(grey_alpha.capacity_bits(ChannelPolicy::SkipAlpha), 16);
    }

    #[test]
    fn slots_skip_alpha_in_row_major_order() {
        let grid = PixelGrid::new(2, 1, 4, vec![0; 8]).unwrap();
        let skip: Vec<usize> = grid.slot_indices(ChannelPolicy::SkipAlpha).collect();
        assert_eq!(skip, vec![0, 1, 2, 4, 5, 6]);

        let all: Vec<usize> = grid.slot_indices(ChannelPolicy::UseAlpha).collect();
        assert_eq!(all, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn zero_sized_grid_has_no_capacity() {
        let grid = PixelGrid::new(0, 7, 3, vec![]).unwrap();
        assert_eq!(grid.pixel_count(), 0);
        assert_eq!(grid.capacity_bits(ChannelPolicy::SkipAlpha), 0);
    }
}
