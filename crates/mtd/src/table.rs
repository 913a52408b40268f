//! 设备注册表
//!
//! [`MtdRegistry`] 是驱动发布设备时使用的宿主接口；
//! [`MtdTable`] 是它的参考实现，按名字或编号查找已注册的设备。

use alloc::sync::Arc;
use alloc::vec::Vec;
use spin::RwLock;

use crate::device::MtdDevice;
use crate::error::{MtdError, MtdResult};
use crate::partition::{MtdPartition, PartitionDevice};

/// 设备注册表接口
pub trait MtdRegistry: Send + Sync {
    /// 注册整个设备，返回分配的设备编号
    fn add_device(&self, mtd: Arc<dyn MtdDevice>) -> MtdResult<usize>;

    /// 注销整个设备
    fn del_device(&self, mtd: &Arc<dyn MtdDevice>) -> MtdResult<()>;

    /// 在主设备上注册一组分区（全部成功或全部不注册）
    fn add_partitions(&self, master: &Arc<dyn MtdDevice>, parts: &[MtdPartition])
    -> MtdResult<()>;

    /// 注销主设备上的所有分区
    fn del_partitions(&self, master: &Arc<dyn MtdDevice>) -> MtdResult<()>;
}

/// 两个句柄是否指向同一个设备
fn same_device(a: &Arc<dyn MtdDevice>, b: &Arc<dyn MtdDevice>) -> bool {
    core::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

struct MtdEntry {
    index: usize,
    device: Arc<dyn MtdDevice>,
    /// 分区所属的主设备；整设备注册时为 None
    master: Option<Arc<dyn MtdDevice>>,
}

impl MtdEntry {
    fn is_partition_of(&self, master: &Arc<dyn MtdDevice>) -> bool {
        self.master.as_ref().is_some_and(|m| same_device(m, master))
    }
}

/// 设备注册表
pub struct MtdTable {
    // NOTE: 只在设备注册/注销时写，运行时查找均为读
    entries: RwLock<Vec<MtdEntry>>,
}

/// 全局设备注册表
pub static MTD_TABLE: MtdTable = MtdTable::new();

impl MtdTable {
    /// 创建空注册表
    pub const fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// 最小的未使用编号
    fn next_index(entries: &[MtdEntry]) -> usize {
        (0..)
            .find(|i| entries.iter().all(|e| e.index != *i))
            .unwrap_or(entries.len())
    }

    /// 按编号查找设备
    pub fn get(&self, index: usize) -> Option<Arc<dyn MtdDevice>> {
        self.entries
            .read()
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.device.clone())
    }

    /// 按名字查找设备
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn MtdDevice>> {
        self.entries
            .read()
            .iter()
            .find(|e| e.device.name() == name)
            .map(|e| e.device.clone())
    }

    /// 已注册的设备（含分区）数量
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for MtdTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MtdRegistry for MtdTable {
    fn add_device(&self, mtd: Arc<dyn MtdDevice>) -> MtdResult<usize> {
        let mut entries = self.entries.write();
        if entries.iter().any(|e| same_device(&e.device, &mtd)) {
            return Err(MtdError::AlreadyExists);
        }
        let index = Self::next_index(&entries);
        log::info!("mtd{}: registered \"{}\" ({:#x} bytes)", index, mtd.name(), mtd.size());
        entries.push(MtdEntry {
            index,
            device: mtd,
            master: None,
        });
        Ok(index)
    }

    fn del_device(&self, mtd: &Arc<dyn MtdDevice>) -> MtdResult<()> {
        let mut entries = self.entries.write();
        if entries.iter().any(|e| e.is_partition_of(mtd)) {
            return Err(MtdError::Busy);
        }
        let pos = entries
            .iter()
            .position(|e| e.master.is_none() && same_device(&e.device, mtd))
            .ok_or(MtdError::NoDevice)?;
        let entry = entries.remove(pos);
        log::info!("mtd{}: removed \"{}\"", entry.index, entry.device.name());
        Ok(())
    }

    fn add_partitions(
        &self,
        master: &Arc<dyn MtdDevice>,
        parts: &[MtdPartition],
    ) -> MtdResult<()> {
        // 先构造全部分区，任何一个越界都不注册
        let devices = parts
            .iter()
            .map(|part| PartitionDevice::new(master.clone(), part))
            .collect::<MtdResult<Vec<_>>>()?;

        let mut entries = self.entries.write();
        if entries.iter().any(|e| e.is_partition_of(master)) {
            return Err(MtdError::AlreadyExists);
        }
        for dev in devices {
            let index = Self::next_index(&entries);
            log::info!(
                "mtd{}: partition \"{}\" at {:#x} ({:#x} bytes) on \"{}\"",
                index,
                dev.name(),
                dev.offset(),
                dev.size(),
                master.name()
            );
            entries.push(MtdEntry {
                index,
                device: Arc::new(dev),
                master: Some(master.clone()),
            });
        }
        Ok(())
    }

    fn del_partitions(&self, master: &Arc<dyn MtdDevice>) -> MtdResult<()> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| !e.is_partition_of(master));
        if entries.len() == before {
            return Err(MtdError::NoDevice);
        }
        log::info!(
            "mtd: removed {} partition(s) of \"{}\"",
            before - entries.len(),
            master.name()
        );
        Ok(())
    }
}
