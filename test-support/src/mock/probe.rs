//! 探测后端的 Mock 实现
//!
//! `mtd` crate 为 [`MockProbe`] 实现 `MapProbe`：未设置失败时委托给真实的芯片探测。

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock 的探测后端，记录调用次数并可被设置为拒绝识别
pub struct MockProbe {
    reject: AtomicBool,
    ram_calls: AtomicUsize,
    rom_calls: AtomicUsize,
}

impl MockProbe {
    /// 创建一个正常工作的探测后端
    pub const fn new() -> Self {
        Self {
            reject: AtomicBool::new(false),
            ram_calls: AtomicUsize::new(0),
            rom_calls: AtomicUsize::new(0),
        }
    }

    /// 之后的探测全部失败
    pub fn reject_all(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    /// 是否应拒绝本次探测
    pub fn rejects(&self) -> bool {
        self.reject.load(Ordering::SeqCst)
    }

    /// 记录一次 RAM 探测
    pub fn record_ram(&self) {
        self.ram_calls.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录一次 ROM 探测
    pub fn record_rom(&self) {
        self.rom_calls.fetch_add(1, Ordering::SeqCst);
    }

    /// RAM 探测次数
    pub fn ram_calls(&self) -> usize {
        self.ram_calls.load(Ordering::SeqCst)
    }

    /// ROM 探测次数
    pub fn rom_calls(&self) -> usize {
        self.rom_calls.load(Ordering::SeqCst)
    }

    /// 探测总次数
    pub fn calls(&self) -> usize {
        self.ram_calls() + self.rom_calls()
    }
}

impl Default for MockProbe {
    fn default() -> Self {
        Self::new()
    }
}
