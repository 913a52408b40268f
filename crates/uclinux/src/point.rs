//! 直接访问接口
//!
//! [`PointAccessor`] 包装探测后端返回的设备，为其挂上基于映射窗口的 `point`：
//! 返回窗口内部的指针（以及对应的物理地址），调用方无需拷贝即可读取。

use alloc::boxed::Box;
use core::ptr::NonNull;

use mtd::{MapWindow, MtdDevice, MtdError, MtdInfo, MtdResult, PointMapping};

/// 带直接访问能力的设备句柄
pub struct PointAccessor {
    inner: Box<dyn MtdDevice>,
    window: MapWindow,
}

impl PointAccessor {
    /// 为 `inner` 挂上基于 `window` 的直接访问
    pub fn attach(inner: Box<dyn MtdDevice>, window: MapWindow) -> Self {
        Self { inner, window }
    }

    /// 设备所引用的映射窗口
    pub fn window(&self) -> &MapWindow {
        &self.window
    }

    /// 不做范围检查的直接访问
    ///
    /// 返回 `virt + from` 与（可选的）`phys + from`，`retlen` 总是等于 `len`。
    ///
    /// # Safety
    /// 调用方必须保证 `from + len` 不超过设备大小。越界时返回的物理地址没有意义。
    pub unsafe fn point_unchecked(&self, from: usize, len: usize, want_phys: bool) -> PointMapping {
        // SAFETY: 调用方保证 from 位于窗口内，窗口基址非空
        let virt = unsafe { NonNull::new_unchecked(self.window.virt().as_ptr().add(from)) };
        PointMapping {
            virt,
            phys: want_phys.then(|| self.window.phys().wrapping_add(from)),
            retlen: len,
        }
    }
}

impl MtdDevice for PointAccessor {
    fn info(&self) -> &MtdInfo {
        self.inner.info()
    }

    fn read(&self, from: usize, buf: &mut [u8]) -> MtdResult<usize> {
        self.inner.read(from, buf)
    }

    fn write(&self, to: usize, buf: &[u8]) -> MtdResult<usize> {
        self.inner.write(to, buf)
    }

    fn point(&self, from: usize, len: usize, want_phys: bool) -> MtdResult<PointMapping> {
        if !self.window.contains(from, len) {
            return Err(MtdError::OutOfBounds);
        }
        // SAFETY: 范围已检查
        Ok(unsafe { self.point_unchecked(from, len, want_phys) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use mtd::{ChipProbe, MapProbe};

    #[test]
    fn test_point_returns_window_offsets() {
        let mut backing = vec![0u8; 0x1000];
        backing[0x10..0x14].copy_from_slice(&[1, 2, 3, 4]);
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let window = unsafe { MapWindow::new("ROM", 0x4000_0000, virt, 0x1000, 4) };
        let rom = ChipProbe::new(4096).probe_rom(&window).unwrap();
        let dev = PointAccessor::attach(rom, window);

        let mapping = dev.point(0x10, 4, true).unwrap();
        assert_eq!(mapping.phys, Some(0x4000_0010));
        assert_eq!(mapping.retlen, 4);
        assert_eq!(unsafe { mapping.as_slice() }, &[1, 2, 3, 4]);

        let mapping = dev.point(0, 0x1000, false).unwrap();
        assert_eq!(mapping.phys, None);
        assert_eq!(mapping.virt, virt);
        assert_eq!(mapping.retlen, 0x1000);
    }

    #[test]
    fn test_point_outside_device_is_rejected() {
        let mut backing = vec![0u8; 0x1000];
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let window = unsafe { MapWindow::new("ROM", 0x4000_0000, virt, 0x1000, 4) };
        let rom = ChipProbe::new(4096).probe_rom(&window).unwrap();
        let dev = PointAccessor::attach(rom, window);

        assert_eq!(dev.point(0xFFD, 4, false), Err(MtdError::OutOfBounds));
        assert_eq!(dev.point(usize::MAX, 2, false), Err(MtdError::OutOfBounds));
        assert!(dev.point(0x1000, 0, false).is_ok());
    }

    #[test]
    fn test_point_at_top_of_physical_address_space() {
        let mut backing = vec![0u8; 0x1000];
        backing[0xFFC..].copy_from_slice(&[9, 8, 7, 6]);
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let phys = usize::MAX - 0xFFF;
        let window = unsafe { MapWindow::new("ROM", phys, virt, 0x1000, 4) };
        let rom = ChipProbe::new(4096).probe_rom(&window).unwrap();
        let dev = PointAccessor::attach(rom, window);

        let mapping = dev.point(0xFFC, 4, true).unwrap();
        assert_eq!(mapping.phys, Some(usize::MAX - 3));
        assert_eq!(unsafe { mapping.as_slice() }, &[9, 8, 7, 6]);
        assert_eq!(dev.point(0xFFD, 4, true), Err(MtdError::OutOfBounds));
    }
}
