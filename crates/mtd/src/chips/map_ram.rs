//! 映射 RAM 设备

use alloc::string::ToString;

use super::bankwidth_supported;
use crate::device::{MtdDevice, check_read_range, check_range};
use crate::error::MtdResult;
use crate::info::{MtdFlags, MtdInfo, MtdType};
use crate::map::MapWindow;

/// 通过映射窗口读写的 RAM 设备
///
/// 不做擦除或任何闪存管理，写入直接落到窗口上。
pub struct MapRam {
    map: MapWindow,
    info: MtdInfo,
}

impl MapRam {
    /// 尝试把窗口识别为 RAM
    ///
    /// 窗口为空、总线宽度不受支持或大小不是总线宽度的整数倍时识别失败。
    pub fn probe(map: &MapWindow, erasesize: usize) -> Option<Self> {
        let bankwidth = map.bankwidth();
        if map.size() == 0 || !bankwidth_supported(bankwidth) || map.size() % bankwidth != 0 {
            log::debug!(
                "map_ram: {} not recognized (size={:#x} bankwidth={})",
                map.name(),
                map.size(),
                bankwidth
            );
            return None;
        }

        Some(Self {
            map: *map,
            info: MtdInfo {
                name: map.name().to_string(),
                mtd_type: MtdType::Ram,
                flags: MtdFlags::CAP_RAM,
                size: map.size(),
                erasesize,
                writesize: 1,
                bankwidth,
            },
        })
    }
}

impl MtdDevice for MapRam {
    fn info(&self) -> &MtdInfo {
        &self.info
    }

    fn read(&self, from: usize, buf: &mut [u8]) -> MtdResult<usize> {
        let len = check_read_range(self.info.size, from, buf.len())?;
        self.map.copy_from(from, &mut buf[..len])?;
        Ok(len)
    }

    fn write(&self, to: usize, buf: &[u8]) -> MtdResult<usize> {
        check_range(self.info.size, to, buf.len())?;
        self.map.copy_to(to, buf)?;
        Ok(buf.len())
    }
}
