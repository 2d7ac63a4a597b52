#![no_std]

extern crate alloc;

/* bfs 的整体架构，自上而下 */

// 文件读写层：描述符、游标，以及按块拆分的字节读写
mod fs;

// 块存储层：文件名、inode、空闲块与打开文件表的管理
mod store;

// 打开文件表：记录每个打开文件的游标
mod oft;

// 磁盘数据结构层：表示磁盘文件系统的数据结构
mod layout;

// 块缓存层：内存上的磁盘块数据缓存
mod block_cache;

mod error;
mod id;

pub use block_dev::BlockDevice;

pub use self::{
    error::{Error, Result},
    fs::{FileInfo, FileSystem, Whence},
    id::{Dbn, Fd, Inum},
    store::{Bfs, BlockStore},
};

pub const MAGIC: u32 = 0x4246_5331;
pub const BLOCK_SIZE: usize = 512;
pub const BLOCK_BITS: usize = BLOCK_SIZE * 8;
/// 磁盘镜像的总块数
pub const NUM_BLOCKS: usize = 100;
/// inode 总数，也是目录的槽位数
pub const NUM_INODES: usize = 16;
/// 文件名占用的字节数，含结尾的 NUL
pub const NAME_LEN: usize = 16;
/// 打开文件表的容量
pub const NUM_OFT_ENTRIES: usize = 8;
/// 每个 inode 的直接索引块数
pub const DIRECT_BLOCKS: usize = 5;
/// 单个文件最多可占用的数据块数：直接索引加一个一级索引块
pub const MAX_FILE_BLOCKS: usize = DIRECT_BLOCKS + BLOCK_SIZE / 4;
pub const MAX_FILE_SIZE: usize = MAX_FILE_BLOCKS * BLOCK_SIZE;

pub type DataBlock = [u8; BLOCK_SIZE];
