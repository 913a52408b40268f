//! 映射 ROM 设备

use alloc::string::ToString;

use super::bankwidth_supported;
use crate::device::{MtdDevice, check_read_range};
use crate::error::MtdResult;
use crate::info::{MtdFlags, MtdInfo, MtdType};
use crate::map::MapWindow;

/// 通过映射窗口只读访问的 ROM 设备
pub struct MapRom {
    map: MapWindow,
    info: MtdInfo,
}

impl MapRom {
    /// 尝试把窗口识别为 ROM
    pub fn probe(map: &MapWindow) -> Option<Self> {
        if map.size() == 0 || !bankwidth_supported(map.bankwidth()) {
            log::debug!(
                "map_rom: {} not recognized (size={:#x} bankwidth={})",
                map.name(),
                map.size(),
                map.bankwidth()
            );
            return None;
        }

        Some(Self {
            map: *map,
            info: MtdInfo {
                name: map.name().to_string(),
                mtd_type: MtdType::Rom,
                flags: MtdFlags::CAP_ROM,
                size: map.size(),
                erasesize: map.size(),
                writesize: 1,
                bankwidth: map.bankwidth(),
            },
        })
    }
}

impl MtdDevice for MapRom {
    fn info(&self) -> &MtdInfo {
        &self.info
    }

    fn read(&self, from: usize, buf: &mut [u8]) -> MtdResult<usize> {
        let len = check_read_range(self.info.size, from, buf.len())?;
        self.map.copy_from(from, &mut buf[..len])?;
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MtdError;
    use alloc::vec;
    use core::ptr::NonNull;

    #[test]
    fn test_rom_reads_and_refuses_writes() {
        let mut backing = vec![0x5Au8; 64];
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let map = unsafe { MapWindow::new("ROM", 0x4000_0000, virt, 64, 4) };
        let rom = MapRom::probe(&map).unwrap();

        assert_eq!(rom.info().flags, MtdFlags::CAP_ROM);
        assert!(!rom.is_writeable());
        assert_eq!(rom.write(0, &[1]), Err(MtdError::ReadOnly));

        // 读请求越过末尾时被截断
        let mut buf = [0u8; 8];
        assert_eq!(rom.read(60, &mut buf), Ok(4));
        assert_eq!(&buf[..4], &[0x5A; 4]);
    }

    #[test]
    fn test_rom_rejects_odd_bankwidth() {
        let mut backing = vec![0u8; 64];
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let map = unsafe { MapWindow::new("ROM", 0, virt, 64, 3) };
        assert!(MapRom::probe(&map).is_none());
    }
}
