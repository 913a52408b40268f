//! 驱动生命周期对象

use alloc::sync::Arc;

use mtd::{IoMemOps, MapProbe, MtdDevice, MtdError, MtdRegistry, MtdResult, PointMapping};

use crate::config::RegionConfig;
use crate::mapper::{map_region, unmap_region};
use crate::publish::{publish, unpublish};
use crate::region::MapInfo;
use crate::resolve::resolve_size;

/// 驱动使用的宿主协作者
#[derive(Clone, Copy)]
pub struct HostOps<'a> {
    /// 内存映射服务
    pub iomem: &'a dyn IoMemOps,
    /// 探测后端
    pub probe: &'a dyn MapProbe,
    /// 设备注册表
    pub registry: &'a dyn MtdRegistry,
}

/// RAM / ROM 映射 MTD 驱动
///
/// 由宿主的组合根在模块加载时创建并持有，卸载时销毁（`Drop` 会执行拆除）。
/// 加载与卸载由宿主串行化；初始化完成后，直接访问可以被并发调用。
pub struct UclinuxMtd<'a> {
    config: RegionConfig,
    map: MapInfo,
    mtd: Option<Arc<dyn MtdDevice>>,
    host: HostOps<'a>,
}

impl<'a> UclinuxMtd<'a> {
    /// 按配置创建驱动，此时不访问任何硬件
    pub fn new(config: RegionConfig, host: HostOps<'a>) -> Self {
        let map = MapInfo::new(config.name(), config.phys(), config.size(), config.bankwidth());
        Self {
            config,
            map,
            mtd: None,
            host,
        }
    }

    /// 解析大小、映射区域并发布设备
    ///
    /// 任何一步失败都会回滚之前已完成的步骤，不留下部分注册的状态。
    /// 已经初始化（且未拆除）时返回 [`MtdError::Busy`]。
    pub fn init(&mut self) -> MtdResult<()> {
        if self.is_active() {
            return Err(MtdError::Busy);
        }

        resolve_size(&mut self.map, self.config.header_access(), self.host.iomem)?;

        log::info!(
            "uclinux[mtd]: {} probe address={:#x} size={:#x}",
            self.map.name(),
            self.map.phys(),
            self.map.size()
        );

        let window = map_region(&mut self.map, self.host.iomem)?;

        match publish(
            window,
            self.config.mode(),
            self.config.publish(),
            self.host.probe,
            self.host.registry,
        ) {
            Ok(mtd) => {
                self.mtd = Some(mtd);
                Ok(())
            }
            Err(err) => {
                unmap_region(&mut self.map, self.host.iomem);
                Err(err)
            }
        }
    }

    /// 注销设备并释放映射
    ///
    /// 可以重复调用，也可以在初始化失败后调用。调用方在拆除之后不得继续使用
    /// 之前通过 [`UclinuxMtd::point`] 或注册表取得的指针和设备句柄。
    ///
    /// 注册表拒绝注销时保留设备和映射，驱动仍处于活动状态，返回注册表的错误；
    /// 之后可以再次调用拆除。
    pub fn teardown(&mut self) -> MtdResult<()> {
        if let Some(mtd) = self.mtd.take() {
            if let Err(err) = unpublish(&mtd, self.config.publish(), self.host.registry) {
                log::error!(
                    "uclinux[mtd]: keeping {} mapped at {:#x}, device still registered",
                    self.map.name(),
                    self.map.phys()
                );
                self.mtd = Some(mtd);
                return Err(err);
            }
        }
        unmap_region(&mut self.map, self.host.iomem);
        Ok(())
    }

    /// 直接访问 `[from, from + len)`，同时返回对应的物理地址
    pub fn point(&self, from: usize, len: usize) -> MtdResult<PointMapping> {
        self.mtd
            .as_ref()
            .ok_or(MtdError::NoDevice)?
            .point(from, len, true)
    }

    /// 是否持有映射或设备
    pub fn is_active(&self) -> bool {
        self.map.is_mapped() || self.mtd.is_some()
    }

    /// 已发布的设备句柄
    pub fn device(&self) -> Option<&Arc<dyn MtdDevice>> {
        self.mtd.as_ref()
    }

    /// 区域描述符
    pub fn map(&self) -> &MapInfo {
        &self.map
    }

    /// 驱动配置
    pub fn config(&self) -> &RegionConfig {
        &self.config
    }
}

impl Drop for UclinuxMtd<'_> {
    fn drop(&mut self) {
        // 注销失败时映射被有意泄漏，注册表中的设备仍可安全访问
        let _ = self.teardown();
    }
}
