//! 区域描述符

use core::ptr::NonNull;
use mtd::MapWindow;

/// 描述一段作为存储设备发布的物理内存
///
/// 大小一旦解析即不再改变；`virt` 在映射成功后、拆除之前非空。
#[derive(Debug)]
pub struct MapInfo {
    name: &'static str,
    phys: usize,
    pub(crate) virt: Option<NonNull<u8>>,
    pub(crate) size: usize,
    bankwidth: usize,
}

impl MapInfo {
    /// 创建尚未映射的描述符，`size` 为 0 表示待解析
    pub fn new(name: &'static str, phys: usize, size: usize, bankwidth: usize) -> Self {
        Self {
            name,
            phys,
            virt: None,
            size,
            bankwidth,
        }
    }

    /// 区域名
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 起始物理地址
    pub fn phys(&self) -> usize {
        self.phys
    }

    /// 映射后的虚拟地址
    pub fn virt(&self) -> Option<NonNull<u8>> {
        self.virt
    }

    /// 区域大小，0 表示尚未解析
    pub fn size(&self) -> usize {
        self.size
    }

    /// 总线宽度
    pub fn bankwidth(&self) -> usize {
        self.bankwidth
    }

    /// 是否已映射
    pub fn is_mapped(&self) -> bool {
        self.virt.is_some()
    }

    /// 当前映射的窗口视图
    pub fn window(&self) -> Option<MapWindow> {
        let virt = self.virt?;
        // SAFETY: virt 来自覆盖 size 字节的成功映射，
        // 驱动在释放映射前先销毁所有持有窗口的设备
        Some(unsafe { MapWindow::new(self.name, self.phys, virt, self.size, self.bankwidth) })
    }
}
