//! 通用 RAM / ROM 映射 MTD 驱动
//!
//! 把驻留在一段固定物理内存中的文件系统镜像发布为单分区 MTD 设备，支持零拷贝的直接访问。
//!
//! # 生命周期
//!
//! 1. 大小解析：未静态配置大小时，从镜像头部偏移 8 处读取大端长度并按页对齐
//! 2. 映射：向宿主申请覆盖整个区域的虚拟窗口
//! 3. 发布：交给探测后端识别，挂上直接访问接口，注册唯一的 `ROMfs` 分区
//! 4. 拆除：按相反顺序注销设备并释放映射，可重复调用
//!
//! [`UclinuxMtd`] 是由调用方持有的生命周期对象，宿主协作者通过 [`HostOps`] 显式传入。

#![no_std]

extern crate alloc;

mod config;
mod driver;
mod mapper;
mod point;
mod publish;
mod region;
mod resolve;

pub use config::{DEFAULT_BANKWIDTH, HeaderAccess, MapMode, Publish, ROMFS_PARTITIONS, RegionConfig};
pub use driver::{HostOps, UclinuxMtd};
pub use mapper::{map_region, unmap_region};
pub use point::PointAccessor;
pub use region::MapInfo;
pub use resolve::{ROMFS_SIZE_OFFSET, page_align, resolve_size};
