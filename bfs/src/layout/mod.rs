//! # 磁盘数据结构层
//!
//! | 块号 | 内容 |
//! |------|------|
//! | 0    | 超级块 |
//! | 1    | inode 表 |
//! | 2    | 目录，按 inode 号索引的文件名槽位 |
//! | 3    | 空闲块位图 |
//! | 4..  | 数据区 |
//!
//! 0 号块永远不是数据块，所以 inode 中的块号以 0 表示“未分配”。

mod bitmap;
mod dir_entry;
mod inode;
mod super_block;

pub use self::{
    bitmap::Bitmap,
    dir_entry::{DirEntry, Directory},
    inode::{DiskInode, InodeTable},
    super_block::SuperBlock,
};

use crate::NUM_BLOCKS;

pub const SUPER_BLOCK: usize = 0;
pub const INODE_BLOCK: usize = 1;
pub const DIR_BLOCK: usize = 2;
pub const FREE_LIST_BLOCK: usize = 3;
pub const DATA_AREA_START: usize = 4;
pub const DATA_AREA_BLOCKS: usize = NUM_BLOCKS - DATA_AREA_START;
