//! 设备注册表的 Mock 实现
//!
//! 只记录调用，不保存设备；用于验证注册或注销失败时的处理路径。

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock 的 MTD 注册表
pub struct MockRegistry {
    reject: AtomicBool,
    reject_dels: AtomicBool,
    add_calls: AtomicUsize,
    del_calls: AtomicUsize,
}

impl MockRegistry {
    /// 创建一个接受所有注册的注册表
    pub const fn new() -> Self {
        Self {
            reject: AtomicBool::new(false),
            reject_dels: AtomicBool::new(false),
            add_calls: AtomicUsize::new(0),
            del_calls: AtomicUsize::new(0),
        }
    }

    /// 之后的注册请求全部被拒绝
    pub fn reject_all(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    /// 是否拒绝注册
    pub fn rejects(&self) -> bool {
        self.reject.load(Ordering::SeqCst)
    }

    /// 之后的注销请求全部被拒绝
    pub fn reject_dels(&self) {
        self.reject_dels.store(true, Ordering::SeqCst);
    }

    /// 重新接受注销请求
    pub fn accept_dels(&self) {
        self.reject_dels.store(false, Ordering::SeqCst);
    }

    /// 是否拒绝注销
    pub fn rejects_dels(&self) -> bool {
        self.reject_dels.load(Ordering::SeqCst)
    }

    /// 记录一次注册（设备或分区表）
    pub fn record_add(&self) {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录一次注销
    pub fn record_del(&self) {
        self.del_calls.fetch_add(1, Ordering::SeqCst);
    }

    /// 注册调用次数（包括被拒绝的）
    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    /// 注销调用次数
    pub fn del_calls(&self) -> usize {
        self.del_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
