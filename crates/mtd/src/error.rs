//! MTD 错误类型
//!
//! 定义了设备映射、探测、注册和访问过程中的错误，可通过 [`MtdError::to_errno()`]
//! 转换为内核错误码。

use core::fmt;

/// MTD 错误类型
///
/// 各错误码对应标准 POSIX errno 值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtdError {
    // 初始化相关
    /// 宿主无法建立虚拟映射窗口 (-EIO)
    MappingFailure,
    /// 没有探测后端能识别该映射区域 (-ENXIO)
    ProbeFailure,
    /// 区域大小为零或对齐后溢出 (-EINVAL)
    InvalidSize,

    // 访问相关
    /// 请求超出设备范围 (-EINVAL)
    OutOfBounds,
    /// 设备只读 (-EROFS)
    ReadOnly,
    /// 操作不支持 (-EOPNOTSUPP)
    NotSupported,

    // 注册表相关
    /// 设备仍在使用或已经初始化 (-EBUSY)
    Busy,
    /// 设备不存在 (-ENODEV)
    NoDevice,
    /// 设备已注册 (-EEXIST)
    AlreadyExists,
}

/// MTD 操作结果
pub type MtdResult<T> = Result<T, MtdError>;

impl MtdError {
    /// 转换为内核错误码（负数）
    pub fn to_errno(&self) -> isize {
        match self {
            MtdError::MappingFailure => -5,
            MtdError::ProbeFailure => -6,
            MtdError::Busy => -16,
            MtdError::AlreadyExists => -17,
            MtdError::NoDevice => -19,
            MtdError::InvalidSize => -22,
            MtdError::OutOfBounds => -22,
            MtdError::ReadOnly => -30,
            MtdError::NotSupported => -95,
        }
    }
}

impl fmt::Display for MtdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MtdError::MappingFailure => "mapping failed",
            MtdError::ProbeFailure => "no chip recognized the mapping",
            MtdError::InvalidSize => "invalid region size",
            MtdError::OutOfBounds => "access out of device bounds",
            MtdError::ReadOnly => "device is read-only",
            MtdError::NotSupported => "operation not supported",
            MtdError::Busy => "device busy",
            MtdError::NoDevice => "no such device",
            MtdError::AlreadyExists => "device already registered",
        };
        f.write_str(msg)
    }
}
