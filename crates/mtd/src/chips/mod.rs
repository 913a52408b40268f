//! 探测后端模块
//!
//! 把一个 [`MapWindow`] 识别为 RAM 或 ROM 设备。每个驱动实例只使用一种模式。

mod map_ram;
mod map_rom;

use alloc::boxed::Box;

use crate::device::MtdDevice;
use crate::map::MapWindow;

pub use map_ram::MapRam;
pub use map_rom::MapRom;

/// 探测能力接口
pub trait MapProbe: Send + Sync {
    /// 将窗口识别为可读写的 RAM
    ///
    /// # 返回值
    /// 识别成功则返回设备句柄，否则返回 `None`
    fn probe_ram(&self, map: &MapWindow) -> Option<Box<dyn MtdDevice>>;

    /// 将窗口识别为只读的 ROM
    fn probe_rom(&self, map: &MapWindow) -> Option<Box<dyn MtdDevice>>;
}

/// 总线宽度是否受支持
pub(crate) fn bankwidth_supported(bankwidth: usize) -> bool {
    matches!(bankwidth, 1 | 2 | 4 | 8)
}

/// 通用的 RAM / ROM 探测后端
#[derive(Debug, Clone, Copy)]
pub struct ChipProbe {
    erasesize: usize,
}

impl ChipProbe {
    /// 创建探测后端
    ///
    /// # 参数
    /// * `erasesize` - RAM 设备报告的擦除块大小，通常为页大小
    pub const fn new(erasesize: usize) -> Self {
        Self { erasesize }
    }
}

impl MapProbe for ChipProbe {
    fn probe_ram(&self, map: &MapWindow) -> Option<Box<dyn MtdDevice>> {
        let dev = MapRam::probe(map, self.erasesize)?;
        Some(Box::new(dev))
    }

    fn probe_rom(&self, map: &MapWindow) -> Option<Box<dyn MtdDevice>> {
        let dev = MapRom::probe(map)?;
        Some(Box::new(dev))
    }
}
