//! 宿主内存映射服务的 Mock 实现
//!
//! 注意：这里不直接依赖 `mtd` crate（避免循环依赖）。
//! `mtd` crate 在 `cfg(test)` 或 `test-mocks` feature 下为这些类型实现其 trait（例如 `IoMemOps`）。

use alloc::vec;
use alloc::vec::Vec;
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Mock 的 I/O 内存映射服务
///
/// 用一段堆内存模拟起始于 `phys_base` 的物理区域，
/// `ioremap` 返回指向该内存的指针，并统计映射/解除映射的调用次数。
/// 每个存活的映射按 `(虚拟地址, 大小)` 记录，`iounmap` 的参数必须与某个存活映射完全一致。
pub struct MockIoMem {
    memory: UnsafeCell<Vec<u8>>,
    phys_base: usize,
    page_size: usize,
    /// 从第几次 `ioremap` 调用开始失败（0 表示永不失败）
    fail_from: AtomicUsize,
    map_calls: AtomicUsize,
    unmap_calls: AtomicUsize,
    live: UnsafeCell<Vec<(usize, usize)>>,
}

// Safety: 测试中对模拟内存的访问由被测代码串行进行
unsafe impl Sync for MockIoMem {}
unsafe impl Send for MockIoMem {}

impl MockIoMem {
    /// 创建一个起始于 `phys_base`、大小为 `len` 字节的模拟物理区域
    pub fn new(phys_base: usize, len: usize) -> Self {
        Self {
            memory: UnsafeCell::new(vec![0u8; len]),
            phys_base,
            page_size: 4096,
            fail_from: AtomicUsize::new(0),
            map_calls: AtomicUsize::new(0),
            unmap_calls: AtomicUsize::new(0),
            live: UnsafeCell::new(Vec::new()),
        }
    }

    /// 创建“恒等映射”的模拟区域：物理地址即为模拟内存在宿主上的真实地址
    ///
    /// 用于测试直接读取物理地址的路径。
    pub fn identity(len: usize) -> Self {
        let mut mock = Self::new(0, len);
        mock.phys_base = mock.memory.get_mut().as_ptr() as usize;
        mock
    }

    /// 设置页大小（默认 4096）
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// 模拟区域的起始物理地址
    pub fn phys_base(&self) -> usize {
        self.phys_base
    }

    /// 模拟区域的长度
    pub fn len(&self) -> usize {
        unsafe { (*self.memory.get()).len() }
    }

    /// 模拟区域是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 向模拟区域写入数据（相对区域起始的偏移）
    pub fn write_bytes(&self, offset: usize, bytes: &[u8]) {
        let memory = unsafe { &mut *self.memory.get() };
        memory[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// 读取模拟区域的内容
    pub fn bytes(&self, offset: usize, len: usize) -> Vec<u8> {
        let memory = unsafe { &*self.memory.get() };
        memory[offset..offset + len].to_vec()
    }

    /// 让所有 `ioremap` 调用失败
    pub fn fail_all(&self) {
        self.fail_from.store(1, Ordering::SeqCst);
    }

    /// 让第 `nth` 次（从 1 开始计数）及之后的 `ioremap` 调用失败
    pub fn fail_from_call(&self, nth: usize) {
        self.fail_from.store(nth, Ordering::SeqCst);
    }

    /// `ioremap` 调用次数（包括失败的调用）
    pub fn map_calls(&self) -> usize {
        self.map_calls.load(Ordering::SeqCst)
    }

    /// `iounmap` 调用次数
    pub fn unmap_calls(&self) -> usize {
        self.unmap_calls.load(Ordering::SeqCst)
    }

    /// 当前仍然存在的映射数量
    pub fn live_mappings(&self) -> usize {
        unsafe { (*self.live.get()).len() }
    }

    /// 页大小
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 映射 `[phys, phys + size)`，失败或越界时返回空指针
    pub fn ioremap(&self, phys: usize, size: usize) -> *mut u8 {
        let call = self.map_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let fail_from = self.fail_from.load(Ordering::SeqCst);
        if fail_from != 0 && call >= fail_from {
            return core::ptr::null_mut();
        }

        let Some(offset) = phys.checked_sub(self.phys_base) else {
            return core::ptr::null_mut();
        };
        match offset.checked_add(size) {
            Some(end) if size != 0 && end <= self.len() => {}
            _ => return core::ptr::null_mut(),
        }

        let memory = unsafe { &mut *self.memory.get() };
        let virt = memory[offset..].as_mut_ptr();
        unsafe { (*self.live.get()).push((virt as usize, size)) };
        virt
    }

    /// 解除映射
    ///
    /// # Panics
    /// `(virt, size)` 不对应任何存活映射时（重复释放、地址或大小不匹配）panic。
    pub fn iounmap(&self, virt: *mut u8, size: usize) {
        self.unmap_calls.fetch_add(1, Ordering::SeqCst);
        let live = unsafe { &mut *self.live.get() };
        let Some(pos) = live.iter().position(|&m| m == (virt as usize, size)) else {
            panic!("iounmap({:p}, {:#x}) does not match a live mapping", virt, size);
        };
        live.swap_remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmap_releases_matching_mapping() {
        let iomem = MockIoMem::new(0x1000, 0x100);
        let head = iomem.ioremap(0x1000, 12);
        let body = iomem.ioremap(0x1000, 0x100);
        assert_eq!(iomem.live_mappings(), 2);

        iomem.iounmap(head, 12);
        assert_eq!(iomem.live_mappings(), 1);
        iomem.iounmap(body, 0x100);
        assert_eq!(iomem.live_mappings(), 0);
        assert_eq!(iomem.unmap_calls(), 2);
    }

    #[test]
    #[should_panic(expected = "does not match a live mapping")]
    fn test_unmap_with_wrong_size_panics() {
        let iomem = MockIoMem::new(0x1000, 0x100);
        let virt = iomem.ioremap(0x1000, 0x100);
        iomem.iounmap(virt, 12);
    }

    #[test]
    #[should_panic(expected = "does not match a live mapping")]
    fn test_double_unmap_panics() {
        let iomem = MockIoMem::new(0x1000, 0x100);
        let virt = iomem.ioremap(0x1040, 0x10);
        iomem.iounmap(virt, 0x10);
        iomem.iounmap(virt, 0x10);
    }

    #[test]
    fn test_failed_map_is_not_live() {
        let iomem = MockIoMem::new(0x1000, 0x100);
        assert!(iomem.ioremap(0x1000, 0x200).is_null());
        iomem.fail_all();
        assert!(iomem.ioremap(0x1000, 0x10).is_null());
        assert_eq!(iomem.live_mappings(), 0);
        assert_eq!(iomem.map_calls(), 2);
    }
}
