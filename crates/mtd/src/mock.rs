//! 为 test-support 中的 Mock 类型实现本 crate 的 trait

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::ptr::NonNull;

use test_support::mock::iomem::MockIoMem;
use test_support::mock::probe::MockProbe;
use test_support::mock::registry::MockRegistry;

use crate::chips::{ChipProbe, MapProbe};
use crate::device::MtdDevice;
use crate::error::{MtdError, MtdResult};
use crate::host::IoMemOps;
use crate::map::MapWindow;
use crate::partition::MtdPartition;
use crate::table::MtdRegistry;

impl IoMemOps for MockIoMem {
    fn page_size(&self) -> usize {
        MockIoMem::page_size(self)
    }

    fn ioremap(&self, phys: usize, size: usize) -> Option<NonNull<u8>> {
        NonNull::new(MockIoMem::ioremap(self, phys, size))
    }

    unsafe fn iounmap(&self, virt: NonNull<u8>, size: usize) {
        MockIoMem::iounmap(self, virt.as_ptr(), size)
    }
}

impl MapProbe for MockProbe {
    fn probe_ram(&self, map: &MapWindow) -> Option<Box<dyn MtdDevice>> {
        self.record_ram();
        if self.rejects() {
            return None;
        }
        ChipProbe::new(4096).probe_ram(map)
    }

    fn probe_rom(&self, map: &MapWindow) -> Option<Box<dyn MtdDevice>> {
        self.record_rom();
        if self.rejects() {
            return None;
        }
        ChipProbe::new(4096).probe_rom(map)
    }
}

impl MtdRegistry for MockRegistry {
    fn add_device(&self, _mtd: Arc<dyn MtdDevice>) -> MtdResult<usize> {
        self.record_add();
        if self.rejects() {
            return Err(MtdError::Busy);
        }
        Ok(0)
    }

    fn del_device(&self, _mtd: &Arc<dyn MtdDevice>) -> MtdResult<()> {
        self.record_del();
        if self.rejects_dels() {
            return Err(MtdError::Busy);
        }
        Ok(())
    }

    fn add_partitions(
        &self,
        _master: &Arc<dyn MtdDevice>,
        _parts: &[MtdPartition],
    ) -> MtdResult<()> {
        self.record_add();
        if self.rejects() {
            return Err(MtdError::Busy);
        }
        Ok(())
    }

    fn del_partitions(&self, _master: &Arc<dyn MtdDevice>) -> MtdResult<()> {
        self.record_del();
        if self.rejects_dels() {
            return Err(MtdError::Busy);
        }
        Ok(())
    }
}
