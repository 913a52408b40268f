//! 宿主内存映射服务 trait 定义

use core::ptr::NonNull;

/// 宿主内存映射服务
///
/// 此 trait 抽象了为物理地址范围建立和释放虚拟窗口的操作。
/// 宿主内核需要为具体架构实现此 trait。
pub trait IoMemOps: Send + Sync {
    /// 页大小（通常为 4096，必须是 2 的幂）
    fn page_size(&self) -> usize;

    /// 为 `[phys, phys + size)` 建立一个不经缓存的虚拟窗口
    ///
    /// # 返回值
    /// 窗口的起始虚拟地址；宿主无法满足请求时返回 `None`
    fn ioremap(&self, phys: usize, size: usize) -> Option<NonNull<u8>>;

    /// 释放由 [`IoMemOps::ioremap`] 建立的窗口
    ///
    /// # Safety
    /// `virt` 和 `size` 必须来自同一次成功的 `ioremap`，且每个窗口只能释放一次。
    /// 释放后不得再访问该窗口。
    unsafe fn iounmap(&self, virt: NonNull<u8>, size: usize);
}
