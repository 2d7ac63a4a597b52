//! # 块设备接口
//!
//! 磁盘镜像以固定大小的**块**为单位读写，块号即镜像内的块序号。
//! 实现了 [`BlockDevice`] 的类型称为块设备驱动：
//! 宿主机上可以是一个镜像文件，测试里可以是一段内存。
//!
//! 驱动只搬运整块数据，不理解块内容；块的含义由上层文件系统决定。

#![no_std]

use core::any::Any;
use core::fmt::Debug;

/// 块设备驱动特质
pub trait BlockDevice: Debug + Send + Sync + Any {
    /// 把第 `block_id` 块读入 `buf`，`buf` 的长度恰为一块
    fn read_block(&self, block_id: usize, buf: &mut [u8]);

    /// 把 `buf` 写到第 `block_id` 块
    fn write_block(&self, block_id: usize, buf: &[u8]);
}
