//! 区域大小解析
//!
//! 未静态配置大小时，从镜像头部读取长度字段。romfs 头部的布局是
//! 8 字节魔数后跟一个 32 位大端的镜像总长度。

use mtd::{IoMemOps, MtdError, MtdResult};

use crate::config::HeaderAccess;
use crate::region::MapInfo;

/// 长度字段相对区域起始的偏移
pub const ROMFS_SIZE_OFFSET: usize = 8;

const SIZE_FIELD_LEN: usize = 4;

/// 把 `len` 向上对齐到 `page_size`
///
/// `page_size` 必须是 2 的幂。溢出时返回 `None`。
pub fn page_align(len: usize, page_size: usize) -> Option<usize> {
    debug_assert!(page_size.is_power_of_two());
    let mask = page_size - 1;
    len.checked_add(mask).map(|v| v & !mask)
}

/// 从 `field` 处按字节读取一个大端 u32
///
/// # Safety
/// `field` 必须指向至少 4 个可读字节。
unsafe fn read_be32(field: *const u8) -> u32 {
    let mut bytes = [0u8; SIZE_FIELD_LEN];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = unsafe { field.add(i).read_volatile() };
    }
    u32::from_be_bytes(bytes)
}

/// 读取镜像头部中的长度字段
fn read_header_len(phys: usize, access: HeaderAccess, iomem: &dyn IoMemOps) -> MtdResult<u32> {
    let len = ROMFS_SIZE_OFFSET + SIZE_FIELD_LEN;
    if phys.checked_add(len).is_none() {
        log::error!("uclinux[mtd]: header at address={:#x} wraps the address space", phys);
        return Err(MtdError::InvalidSize);
    }

    match access {
        HeaderAccess::Direct => {
            let field = (phys + ROMFS_SIZE_OFFSET) as *const u8;
            // SAFETY: RegionConfig::assume_flat_physical 要求 phys 可以直接解引用
            Ok(unsafe { read_be32(field) })
        }
        HeaderAccess::TemporaryMapping => {
            let Some(virt) = iomem.ioremap(phys, len) else {
                log::error!("uclinux[mtd]: cannot map header at address={:#x}", phys);
                return Err(MtdError::MappingFailure);
            };
            // SAFETY: 窗口覆盖 len 字节，读取后立即释放且只释放一次
            let value = unsafe { read_be32(virt.as_ptr().add(ROMFS_SIZE_OFFSET)) };
            unsafe { iomem.iounmap(virt, len) };
            Ok(value)
        }
    }
}

/// 解析区域大小
///
/// 已静态配置的大小总是优先，不会读取头部。
/// 头部长度为 0、对齐后溢出或头部本身越过地址空间末尾时返回 [`MtdError::InvalidSize`]。
pub fn resolve_size(map: &mut MapInfo, access: HeaderAccess, iomem: &dyn IoMemOps) -> MtdResult<()> {
    if map.size != 0 {
        return Ok(());
    }

    let raw = read_header_len(map.phys(), access, iomem)?;
    let size = usize::try_from(raw)
        .ok()
        .filter(|len| *len != 0)
        .and_then(|len| page_align(len, iomem.page_size()))
        .ok_or_else(|| {
            log::error!(
                "uclinux[mtd]: bad image length {:#x} at address={:#x}",
                raw,
                map.phys()
            );
            MtdError::InvalidSize
        })?;

    map.size = size;
    Ok(())
}
