//! 测试支持 crate
//!
//! 提供宿主协作者（内存映射服务、探测后端、设备注册表）的 Mock 实现

#![no_std]

extern crate alloc;

pub mod mock;
