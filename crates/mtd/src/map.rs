//! 映射窗口
//!
//! [`MapWindow`] 是一段已建立虚拟映射的物理区域的只读视图，
//! 探测后端创建的设备和直接访问路径通过它访问内存。
//! 它不拥有映射：映射的建立与释放由驱动负责。

use crate::error::{MtdError, MtdResult};
use core::ptr::NonNull;

/// 已映射区域的非拥有视图
#[derive(Debug, Clone, Copy)]
pub struct MapWindow {
    name: &'static str,
    phys: usize,
    virt: NonNull<u8>,
    size: usize,
    bankwidth: usize,
}

// Safety: MapWindow 只是地址和长度的组合，
// 映射在窗口生命周期内保持有效由 MapWindow::new 的调用者保证。
unsafe impl Send for MapWindow {}
unsafe impl Sync for MapWindow {}

impl MapWindow {
    /// 创建映射窗口
    ///
    /// # Safety
    /// `virt` 必须指向一段至少 `size` 字节、可按字节访问的映射，
    /// 并且在所有使用此窗口（及其副本）的设备被销毁之前保持有效。
    /// `phys + size` 不得超出地址空间。
    pub unsafe fn new(
        name: &'static str,
        phys: usize,
        virt: NonNull<u8>,
        size: usize,
        bankwidth: usize,
    ) -> Self {
        Self {
            name,
            phys,
            virt,
            size,
            bankwidth,
        }
    }

    /// 区域名
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 区域起始物理地址
    pub fn phys(&self) -> usize {
        self.phys
    }

    /// 窗口起始虚拟地址
    pub fn virt(&self) -> NonNull<u8> {
        self.virt
    }

    /// 区域大小（字节）
    pub fn size(&self) -> usize {
        self.size
    }

    /// 总线宽度（字节）
    pub fn bankwidth(&self) -> usize {
        self.bankwidth
    }

    /// `[offset, offset + len)` 是否完全位于窗口内
    pub fn contains(&self, offset: usize, len: usize) -> bool {
        offset.checked_add(len).is_some_and(|end| end <= self.size)
    }

    /// 从窗口 `offset` 处拷贝 `buf.len()` 字节
    pub fn copy_from(&self, offset: usize, buf: &mut [u8]) -> MtdResult<()> {
        if !self.contains(offset, buf.len()) {
            return Err(MtdError::OutOfBounds);
        }
        let src = self.virt.as_ptr().wrapping_add(offset);
        for (i, byte) in buf.iter_mut().enumerate() {
            // SAFETY: 范围已检查，窗口在生命周期内有效
            *byte = unsafe { src.add(i).read_volatile() };
        }
        Ok(())
    }

    /// 把 `buf` 拷贝到窗口 `offset` 处
    pub fn copy_to(&self, offset: usize, buf: &[u8]) -> MtdResult<()> {
        if !self.contains(offset, buf.len()) {
            return Err(MtdError::OutOfBounds);
        }
        let dst = self.virt.as_ptr().wrapping_add(offset);
        for (i, byte) in buf.iter().enumerate() {
            // SAFETY: 同上
            unsafe { dst.add(i).write_volatile(*byte) };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_copy_within_window() {
        let mut backing = vec![0u8; 16];
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let window = unsafe { MapWindow::new("RAM", 0x1000, virt, 16, 4) };

        window.copy_to(4, &[1, 2, 3, 4]).unwrap();
        let mut buf = [0u8; 6];
        window.copy_from(3, &mut buf).unwrap();
        assert_eq!(buf, [0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_copy_outside_window_is_rejected() {
        let mut backing = vec![0u8; 16];
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let window = unsafe { MapWindow::new("ROM", 0, virt, 16, 4) };

        let mut buf = [0u8; 4];
        assert_eq!(window.copy_from(13, &mut buf), Err(MtdError::OutOfBounds));
        assert_eq!(window.copy_to(usize::MAX, &buf), Err(MtdError::OutOfBounds));
        assert!(window.contains(12, 4));
        assert!(!window.contains(12, 5));
    }
}
