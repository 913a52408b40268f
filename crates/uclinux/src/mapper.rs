//! 区域映射

use mtd::{IoMemOps, MapWindow, MtdError, MtdResult};

use crate::region::MapInfo;

/// 为已解析大小的区域建立虚拟窗口
///
/// 失败时描述符保持未映射状态。
pub fn map_region(map: &mut MapInfo, iomem: &dyn IoMemOps) -> MtdResult<MapWindow> {
    if map.is_mapped() {
        return Err(MtdError::Busy);
    }
    if map.size() == 0 {
        return Err(MtdError::InvalidSize);
    }
    if map.phys().checked_add(map.size()).is_none() {
        log::error!(
            "uclinux[mtd]: region address={:#x} size={:#x} wraps the address space",
            map.phys(),
            map.size()
        );
        return Err(MtdError::InvalidSize);
    }

    let Some(virt) = iomem.ioremap(map.phys(), map.size()) else {
        log::error!(
            "uclinux[mtd]: ioremap failed address={:#x} size={:#x}",
            map.phys(),
            map.size()
        );
        return Err(MtdError::MappingFailure);
    };
    map.virt = Some(virt);

    map.window().ok_or(MtdError::MappingFailure)
}

/// 释放区域的虚拟窗口；未映射时什么也不做
///
/// 调用前必须销毁所有持有该窗口的设备。
pub fn unmap_region(map: &mut MapInfo, iomem: &dyn IoMemOps) {
    if let Some(virt) = map.virt.take() {
        log::debug!("uclinux[mtd]: unmapping {} at {:#x}", map.name(), map.phys());
        // SAFETY: virt 来自 map_region 中对 size 字节的成功映射，take() 保证只释放一次
        unsafe { iomem.iounmap(virt, map.size()) };
    }
}
