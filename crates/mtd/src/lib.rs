//! 内存技术设备（MTD）子系统
//!
//! 此 crate 提供把一段已映射内存发布为存储设备所需的抽象和通用实现，包括：
//!
//! - [`MtdDevice`] trait - 设备句柄接口（读、写、直接访问）
//! - [`MtdInfo`] / [`MtdFlags`] / [`MtdType`] - 设备几何信息与能力标志
//! - [`MapWindow`] - 交给探测后端的映射窗口
//! - [`MapProbe`] / [`ChipProbe`] - RAM / ROM 探测后端
//! - [`MtdPartition`] / [`PartitionDevice`] - 分区描述与分区设备
//! - [`MtdRegistry`] / [`MtdTable`] - 设备注册表
//!
//! # 宿主解耦
//!
//! 通过 trait 抽象与宿主内核组件解耦：
//! - [`IoMemOps`]: 物理地址窗口的映射与释放
//! - [`MapProbe`]: 将映射窗口识别为设备
//! - [`MtdRegistry`]: 设备与分区的注册与注销
//!
//! 这些实现由调用方显式传入，而不是全局注册。

#![no_std]

extern crate alloc;

pub mod chips;
mod device;
mod error;
mod host;
mod info;
mod map;
pub mod partition;
pub mod table;

#[cfg(any(test, feature = "test-mocks"))]
mod mock;

pub use chips::{ChipProbe, MapProbe};
pub use device::{MtdDevice, check_read_range, check_range};
pub use error::{MtdError, MtdResult};
pub use host::IoMemOps;
pub use info::{MtdFlags, MtdInfo, MtdType, PointMapping};
pub use map::MapWindow;
pub use partition::{MtdPartition, PartitionDevice};
pub use table::{MTD_TABLE, MtdRegistry, MtdTable};
