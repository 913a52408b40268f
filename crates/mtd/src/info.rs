//! 设备几何信息与能力标志

use alloc::string::String;
use bitflags::bitflags;
use core::ptr::NonNull;

/// 设备类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtdType {
    /// 可读写的 RAM
    Ram,
    /// 只读的 ROM
    Rom,
}

bitflags! {
    /// 设备能力标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MtdFlags: u32 {
        /// 设备可写
        const WRITEABLE = 1 << 10;
        /// 单个位可以被任意翻转
        const BIT_WRITEABLE = 1 << 11;
        /// 写入前无需擦除
        const NO_ERASE = 1 << 12;
        /// 上电时处于锁定状态
        const POWERUP_LOCK = 1 << 13;
    }
}

impl MtdFlags {
    /// ROM 设备的能力
    pub const CAP_ROM: Self = Self::empty();
    /// RAM 设备的能力
    pub const CAP_RAM: Self = Self::WRITEABLE
        .union(Self::BIT_WRITEABLE)
        .union(Self::NO_ERASE);
}

/// 设备几何信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtdInfo {
    /// 设备名
    pub name: String,
    /// 设备类型
    pub mtd_type: MtdType,
    /// 能力标志
    pub flags: MtdFlags,
    /// 设备总大小（字节）
    pub size: usize,
    /// 擦除块大小（字节）
    pub erasesize: usize,
    /// 最小写入单位（字节）
    pub writesize: usize,
    /// 总线宽度（字节）
    pub bankwidth: usize,
}

/// 一次直接访问的结果
///
/// `virt` 指向映射窗口内部，调用方无需拷贝即可读取 `retlen` 字节。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointMapping {
    /// 映射窗口中的虚拟地址
    pub virt: NonNull<u8>,
    /// 对应的物理地址（调用方请求时才提供）
    pub phys: Option<usize>,
    /// 实际满足的长度
    pub retlen: usize,
}

impl PointMapping {
    /// 以切片形式查看被指向的内存
    ///
    /// # Safety
    /// 调用方必须保证在返回的切片存活期间映射窗口没有被释放，
    /// 并且没有其他写者同时修改这段内存。
    pub unsafe fn as_slice<'a>(&self) -> &'a [u8] {
        unsafe { core::slice::from_raw_parts(self.virt.as_ptr(), self.retlen) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_presets() {
        assert!(MtdFlags::CAP_ROM.is_empty());
        assert!(MtdFlags::CAP_RAM.contains(MtdFlags::WRITEABLE));
        assert!(MtdFlags::CAP_RAM.contains(MtdFlags::NO_ERASE));
        assert!(!MtdFlags::CAP_RAM.contains(MtdFlags::POWERUP_LOCK));
    }
}
