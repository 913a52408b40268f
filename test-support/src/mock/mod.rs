//! Mock 实现模块
//!
//! 提供宿主各协作者的 Mock 实现，用于测试

pub mod iomem;
pub mod probe;
pub mod registry;
