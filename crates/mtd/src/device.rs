//! 设备句柄接口

use crate::error::{MtdError, MtdResult};
use crate::info::{MtdFlags, MtdInfo, PointMapping};

/// MTD 设备句柄
///
/// 由探测后端创建，被注册表持有。所有偏移都相对于设备起始。
pub trait MtdDevice: Send + Sync {
    /// 设备几何信息
    fn info(&self) -> &MtdInfo;

    /// 从 `from` 开始读取数据到 `buf`
    ///
    /// # 返回值
    /// 实际读取的字节数。起点在设备内时，超出设备末尾的部分被截断。
    fn read(&self, from: usize, buf: &mut [u8]) -> MtdResult<usize>;

    /// 从 `to` 开始写入 `buf`
    ///
    /// 默认实现返回 [`MtdError::ReadOnly`]。
    fn write(&self, _to: usize, _buf: &[u8]) -> MtdResult<usize> {
        Err(MtdError::ReadOnly)
    }

    /// 直接访问：返回指向设备内部 `[from, from + len)` 的指针
    ///
    /// 默认实现返回 [`MtdError::NotSupported`]。
    fn point(&self, _from: usize, _len: usize, _want_phys: bool) -> MtdResult<PointMapping> {
        Err(MtdError::NotSupported)
    }

    /// 结束一次直接访问
    fn unpoint(&self, _from: usize, _len: usize) -> MtdResult<()> {
        Ok(())
    }

    /// 设备名
    fn name(&self) -> &str {
        &self.info().name
    }

    /// 设备大小
    fn size(&self) -> usize {
        self.info().size
    }

    /// 设备是否可写
    fn is_writeable(&self) -> bool {
        self.info().flags.contains(MtdFlags::WRITEABLE)
    }
}

/// 检查读请求并返回截断后的长度
pub fn check_read_range(size: usize, from: usize, len: usize) -> MtdResult<usize> {
    if from > size || (from == size && len != 0) {
        return Err(MtdError::OutOfBounds);
    }
    Ok(len.min(size - from))
}

/// 检查 `[from, from + len)` 是否完全位于大小为 `size` 的设备内
///
/// 写入、直接访问和分区定位都要求整个范围有效。
pub fn check_range(size: usize, from: usize, len: usize) -> MtdResult<()> {
    match from.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(MtdError::OutOfBounds),
    }
}
