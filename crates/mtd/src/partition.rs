//! 分区模块
//!
//! [`MtdPartition`] 是编译期定义的静态分区描述；
//! [`PartitionDevice`] 是注册到注册表中的分区设备，把访问转发到主设备的对应偏移。

use alloc::string::ToString;
use alloc::sync::Arc;

use crate::device::{MtdDevice, check_read_range, check_range};
use crate::error::{MtdError, MtdResult};
use crate::info::{MtdFlags, MtdInfo, PointMapping};

/// 分区大小取值：一直延伸到主设备末尾
pub const SIZE_FULL: usize = 0;

/// 分区描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MtdPartition {
    /// 分区名
    pub name: &'static str,
    /// 分区在主设备中的起始偏移
    pub offset: usize,
    /// 分区大小，[`SIZE_FULL`] 表示到主设备末尾
    pub size: usize,
    /// 从主设备能力中屏蔽的标志
    pub mask_flags: MtdFlags,
}

impl MtdPartition {
    /// 覆盖整个主设备的分区
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            offset: 0,
            size: SIZE_FULL,
            mask_flags: MtdFlags::empty(),
        }
    }

    /// 设置起始偏移
    pub const fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// 设置大小
    pub const fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// 设置屏蔽标志（例如屏蔽 `WRITEABLE` 得到只读分区）
    pub const fn with_mask_flags(mut self, mask_flags: MtdFlags) -> Self {
        self.mask_flags = mask_flags;
        self
    }

    /// 计算分区在大小为 `master_size` 的主设备中的 `(offset, size)`
    pub fn resolve(&self, master_size: usize) -> MtdResult<(usize, usize)> {
        if self.offset >= master_size {
            return Err(MtdError::OutOfBounds);
        }
        let size = if self.size == SIZE_FULL {
            master_size - self.offset
        } else {
            self.size
        };
        check_range(master_size, self.offset, size)?;
        Ok((self.offset, size))
    }
}

/// 已注册的分区设备
pub struct PartitionDevice {
    master: Arc<dyn MtdDevice>,
    offset: usize,
    info: MtdInfo,
}

impl PartitionDevice {
    /// 在主设备上创建分区
    pub fn new(master: Arc<dyn MtdDevice>, part: &MtdPartition) -> MtdResult<Self> {
        let (offset, size) = part.resolve(master.size())?;
        let master_info = master.info();
        let info = MtdInfo {
            name: part.name.to_string(),
            mtd_type: master_info.mtd_type,
            flags: master_info.flags.difference(part.mask_flags),
            size,
            erasesize: master_info.erasesize.min(size),
            writesize: master_info.writesize,
            bankwidth: master_info.bankwidth,
        };
        Ok(Self {
            master,
            offset,
            info,
        })
    }

    /// 主设备
    pub fn master(&self) -> &Arc<dyn MtdDevice> {
        &self.master
    }

    /// 分区在主设备中的偏移
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl MtdDevice for PartitionDevice {
    fn info(&self) -> &MtdInfo {
        &self.info
    }

    fn read(&self, from: usize, buf: &mut [u8]) -> MtdResult<usize> {
        let len = check_read_range(self.info.size, from, buf.len())?;
        self.master.read(self.offset + from, &mut buf[..len])
    }

    fn write(&self, to: usize, buf: &[u8]) -> MtdResult<usize> {
        if !self.is_writeable() {
            return Err(MtdError::ReadOnly);
        }
        check_range(self.info.size, to, buf.len())?;
        self.master.write(self.offset + to, buf)
    }

    fn point(&self, from: usize, len: usize, want_phys: bool) -> MtdResult<PointMapping> {
        check_range(self.info.size, from, len)?;
        self.master.point(self.offset + from, len, want_phys)
    }

    fn unpoint(&self, from: usize, len: usize) -> MtdResult<()> {
        check_range(self.info.size, from, len)?;
        self.master.unpoint(self.offset + from, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chips::MapRam;
    use crate::map::MapWindow;
    use alloc::vec;
    use core::ptr::NonNull;

    #[test]
    fn test_full_partition_spans_master() {
        let part = MtdPartition::new("ROMfs");
        assert_eq!(part.resolve(0x10000), Ok((0, 0x10000)));
    }

    #[test]
    fn test_partition_outside_master_is_rejected() {
        let part = MtdPartition::new("tail").with_offset(0x1000).with_size(0x1000);
        assert_eq!(part.resolve(0x1800), Err(MtdError::OutOfBounds));
        assert_eq!(
            MtdPartition::new("late").with_offset(0x2000).resolve(0x2000),
            Err(MtdError::OutOfBounds)
        );
    }

    #[test]
    fn test_partition_forwards_with_offset_and_masks_flags() {
        let mut backing = vec![0u8; 256];
        backing[128] = 0x42;
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let map = unsafe { MapWindow::new("RAM", 0, virt, 256, 4) };
        let master: Arc<dyn MtdDevice> = Arc::new(MapRam::probe(&map, 4096).unwrap());

        let part = MtdPartition::new("upper")
            .with_offset(128)
            .with_mask_flags(MtdFlags::WRITEABLE);
        let dev = PartitionDevice::new(master, &part).unwrap();

        assert_eq!(dev.size(), 128);
        assert!(!dev.is_writeable());
        assert_eq!(dev.write(0, &[1]), Err(MtdError::ReadOnly));

        let mut buf = [0u8; 1];
        assert_eq!(dev.read(0, &mut buf), Ok(1));
        assert_eq!(buf[0], 0x42);
        // 主设备不支持直接访问时分区也不支持
        assert_eq!(dev.point(0, 4, false), Err(MtdError::NotSupported));
        assert_eq!(dev.point(127, 4, false), Err(MtdError::OutOfBounds));
    }

    /// 在窗口上直接提供 point 的 ROM，用于验证分区的直接访问转发
    struct PointableRom {
        rom: crate::chips::MapRom,
        map: MapWindow,
    }

    impl MtdDevice for PointableRom {
        fn info(&self) -> &MtdInfo {
            self.rom.info()
        }

        fn read(&self, from: usize, buf: &mut [u8]) -> MtdResult<usize> {
            self.rom.read(from, buf)
        }

        fn point(&self, from: usize, len: usize, want_phys: bool) -> MtdResult<PointMapping> {
            check_range(self.map.size(), from, len)?;
            Ok(PointMapping {
                virt: NonNull::new(self.map.virt().as_ptr().wrapping_add(from)).unwrap(),
                phys: want_phys.then(|| self.map.phys() + from),
                retlen: len,
            })
        }
    }

    #[test]
    fn test_readonly_partition_still_points_within_range() {
        let mut backing = vec![0u8; 256];
        backing[200] = 0x7E;
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let map = unsafe { MapWindow::new("ROM", 0x1000, virt, 256, 4) };
        let rom = crate::chips::MapRom::probe(&map).unwrap();
        let master: Arc<dyn MtdDevice> = Arc::new(PointableRom { rom, map });

        let part = MtdPartition::new("ro")
            .with_offset(192)
            .with_mask_flags(MtdFlags::WRITEABLE);
        let dev = PartitionDevice::new(master, &part).unwrap();

        let mapping = dev.point(8, 4, true).unwrap();
        assert_eq!(mapping.phys, Some(0x1000 + 200));
        assert_eq!(unsafe { mapping.as_slice() }[0], 0x7E);
        assert_eq!(dev.unpoint(8, 4), Ok(()));
        assert_eq!(dev.point(60, 8, false), Err(MtdError::OutOfBounds));
        assert_eq!(dev.unpoint(64, 1), Err(MtdError::OutOfBounds));
    }
}
