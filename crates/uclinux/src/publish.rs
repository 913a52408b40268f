//! 设备发布与注销

use alloc::sync::Arc;

use mtd::{MapProbe, MapWindow, MtdDevice, MtdError, MtdRegistry, MtdResult};

use crate::config::{MapMode, Publish, ROMFS_PARTITIONS};
use crate::point::PointAccessor;

/// 探测映射窗口、挂上直接访问并注册
///
/// 失败时已创建的设备被丢弃；映射的释放由调用方负责。
pub(crate) fn publish(
    window: MapWindow,
    mode: MapMode,
    how: Publish,
    probe: &dyn MapProbe,
    registry: &dyn MtdRegistry,
) -> MtdResult<Arc<dyn MtdDevice>> {
    let chip = match mode {
        MapMode::Ram => probe.probe_ram(&window),
        MapMode::Rom => probe.probe_rom(&window),
    };
    let Some(chip) = chip else {
        log::error!(
            "uclinux[mtd]: failed to find a mapping for {} address={:#x} size={:#x}",
            window.name(),
            window.phys(),
            window.size()
        );
        return Err(MtdError::ProbeFailure);
    };

    let mtd: Arc<dyn MtdDevice> = Arc::new(PointAccessor::attach(chip, window));
    let registered = match how {
        Publish::Partitions => registry.add_partitions(&mtd, &ROMFS_PARTITIONS),
        Publish::WholeDevice => registry.add_device(mtd.clone()).map(|_| ()),
    };
    if let Err(err) = registered {
        log::error!(
            "uclinux[mtd]: cannot register {} address={:#x}: {}",
            window.name(),
            window.phys(),
            err
        );
        return Err(err);
    }

    Ok(mtd)
}

/// 从注册表中移除设备
///
/// 整设备模式下先移除其他人挂在该设备上的分区，再移除设备本身。
/// 已经不在注册表中的设备视为移除成功；其他错误原样返回，
/// 此时注册表中仍有指向映射窗口的设备，调用方不得释放映射。
pub(crate) fn unpublish(
    mtd: &Arc<dyn MtdDevice>,
    how: Publish,
    registry: &dyn MtdRegistry,
) -> MtdResult<()> {
    let removed = match how {
        Publish::Partitions => registry.del_partitions(mtd),
        Publish::WholeDevice => match registry.del_partitions(mtd) {
            Ok(()) | Err(MtdError::NoDevice) => registry.del_device(mtd),
            Err(err) => Err(err),
        },
    };
    match removed {
        Ok(()) => {
            log::debug!("uclinux[mtd]: unregistered {}", mtd.name());
            Ok(())
        }
        Err(MtdError::NoDevice) => {
            log::warn!("uclinux[mtd]: {} was already unregistered", mtd.name());
            Ok(())
        }
        Err(err) => {
            log::error!("uclinux[mtd]: cannot unregister {}: {}", mtd.name(), err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::ptr::NonNull;
    use mtd::MtdTable;
    use test_support::mock::probe::MockProbe;
    use test_support::mock::registry::MockRegistry;

    #[test]
    fn test_publish_dispatches_on_mode() {
        let mut backing = vec![0u8; 0x1000];
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let window = unsafe { MapWindow::new("RAM", 0x8000_0000, virt, 0x1000, 4) };
        let probe = MockProbe::new();
        let table = MtdTable::new();

        let mtd = publish(window, MapMode::Ram, Publish::WholeDevice, &probe, &table).unwrap();
        assert_eq!(probe.ram_calls(), 1);
        assert_eq!(probe.rom_calls(), 0);
        assert!(mtd.is_writeable());
        assert!(table.get_by_name("RAM").is_some());

        assert_eq!(unpublish(&mtd, Publish::WholeDevice, &table), Ok(()));
        assert!(table.is_empty());
    }

    #[test]
    fn test_registry_rejection_is_reported() {
        let mut backing = vec![0u8; 0x1000];
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let window = unsafe { MapWindow::new("ROM", 0x4000_0000, virt, 0x1000, 4) };
        let probe = MockProbe::new();
        let registry = MockRegistry::new();
        registry.reject_all();

        let result = publish(window, MapMode::Rom, Publish::Partitions, &probe, &registry);
        assert_eq!(result.err(), Some(MtdError::Busy));
        assert_eq!(registry.add_calls(), 1);
    }

    #[test]
    fn test_unpublish_whole_device_removes_foreign_partitions() {
        let mut backing = vec![0u8; 0x2000];
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let window = unsafe { MapWindow::new("ROM", 0x4000_0000, virt, 0x2000, 4) };
        let probe = MockProbe::new();
        let table = MtdTable::new();

        let mtd = publish(window, MapMode::Rom, Publish::WholeDevice, &probe, &table).unwrap();
        let parts = [mtd::MtdPartition::new("kernel").with_size(0x1000)];
        table.add_partitions(&mtd, &parts).unwrap();
        assert_eq!(table.len(), 2);

        assert_eq!(unpublish(&mtd, Publish::WholeDevice, &table), Ok(()));
        assert!(table.is_empty());
        // 再次注销时设备已不在注册表中
        assert_eq!(unpublish(&mtd, Publish::WholeDevice, &table), Ok(()));
    }

    #[test]
    fn test_unpublish_reports_refused_removal() {
        let mut backing = vec![0u8; 0x1000];
        let virt = NonNull::new(backing.as_mut_ptr()).unwrap();
        let window = unsafe { MapWindow::new("ROM", 0x4000_0000, virt, 0x1000, 4) };
        let probe = MockProbe::new();
        let registry = MockRegistry::new();

        let mtd = publish(window, MapMode::Rom, Publish::Partitions, &probe, &registry).unwrap();
        registry.reject_dels();
        assert_eq!(
            unpublish(&mtd, Publish::Partitions, &registry),
            Err(MtdError::Busy)
        );
        assert_eq!(registry.del_calls(), 1);
    }
}
