//! 驱动配置
//!
//! 配置在部署时确定，运行期间不再改变。每个驱动实例只有一种映射模式。

use mtd::MtdPartition;

/// 默认总线宽度（字节）
pub const DEFAULT_BANKWIDTH: usize = 4;

/// 唯一的静态分区：覆盖整个设备
pub static ROMFS_PARTITIONS: [MtdPartition; 1] = [MtdPartition::new("ROMfs")];

/// 映射模式，决定探测后端和日志措辞
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    /// 镜像被搬移到内核映像之后的 RAM 中
    Ram,
    /// 镜像位于固定地址的 ROM 中
    Rom,
}

impl MapMode {
    /// 区域名
    pub fn name(&self) -> &'static str {
        match self {
            MapMode::Ram => "RAM",
            MapMode::Rom => "ROM",
        }
    }
}

/// 大小解析时读取镜像头部的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAccess {
    /// 直接按物理地址读取，只适用于物理内存平坦可寻址的架构
    Direct,
    /// 临时映射头部，读取后立即释放
    TemporaryMapping,
}

/// 设备的发布方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    /// 以 [`ROMFS_PARTITIONS`] 分区表注册
    Partitions,
    /// 注册整个设备
    WholeDevice,
}

/// 区域配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionConfig {
    mode: MapMode,
    phys: usize,
    size: usize,
    bankwidth: usize,
    header_access: HeaderAccess,
    publish: Publish,
}

impl RegionConfig {
    const fn new(mode: MapMode, phys: usize) -> Self {
        Self {
            mode,
            phys,
            size: 0,
            bankwidth: DEFAULT_BANKWIDTH,
            header_access: HeaderAccess::TemporaryMapping,
            publish: Publish::Partitions,
        }
    }

    /// 位于固定物理地址 `phys` 的 ROM 区域
    pub const fn rom(phys: usize) -> Self {
        Self::new(MapMode::Rom, phys)
    }

    /// 紧跟在内核映像末尾 `image_end` 之后的 RAM 区域
    pub const fn ram(image_end: usize) -> Self {
        Self::new(MapMode::Ram, image_end)
    }

    /// 静态指定区域大小；0 表示从镜像头部解析
    pub const fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// 设置总线宽度
    pub const fn with_bankwidth(mut self, bankwidth: usize) -> Self {
        self.bankwidth = bankwidth;
        self
    }

    /// 设置发布方式
    pub const fn with_publish(mut self, publish: Publish) -> Self {
        self.publish = publish;
        self
    }

    /// 大小解析时直接读取物理地址，而不是临时映射
    ///
    /// # Safety
    /// 调用方必须保证 `phys` 在当前地址空间中可以直接解引用（平坦物理内存，
    /// 或者宿主已将其恒等映射），并且头部至少有 12 字节可读。
    pub const unsafe fn assume_flat_physical(mut self) -> Self {
        self.header_access = HeaderAccess::Direct;
        self
    }

    /// 映射模式
    pub fn mode(&self) -> MapMode {
        self.mode
    }

    /// 区域名
    pub fn name(&self) -> &'static str {
        self.mode.name()
    }

    /// 区域起始物理地址
    pub fn phys(&self) -> usize {
        self.phys
    }

    /// 静态配置的大小
    pub fn size(&self) -> usize {
        self.size
    }

    /// 总线宽度
    pub fn bankwidth(&self) -> usize {
        self.bankwidth
    }

    /// 头部读取方式
    pub fn header_access(&self) -> HeaderAccess {
        self.header_access
    }

    /// 发布方式
    pub fn publish(&self) -> Publish {
        self.publish
    }
}
