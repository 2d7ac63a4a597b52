//! 磁盘 inode
//!
//! - 直接索引：前 [`DIRECT_BLOCKS`] 个文件块的块号直接存于 inode
//! - 一级索引：整个块连续存储**块编号**，每个编号都指向一个**数据块**
//!
//! 块号为 0 表示该文件块尚未分配。

use alloc::vec::Vec;

use crate::block_cache::BlockCacheManager;
use crate::{BLOCK_SIZE, DIRECT_BLOCKS, MAX_FILE_BLOCKS, NUM_INODES};

/// 间接索引块的编号容量
const INDIRECT_COUNT: usize = BLOCK_SIZE / 4;
/// 间接索引块
type IndirectBlock = [u32; INDIRECT_COUNT];

/// inode 块：第 `inum` 项即 `inum` 号文件的 inode
pub type InodeTable = [DiskInode; NUM_INODES];

#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct DiskInode {
    // 不用usize是为了严控布局
    pub size: u32,
    /// 直接索引块
    direct: [u32; DIRECT_BLOCKS],
    /// 指向一个一级索引块
    indirect: u32,
}

impl DiskInode {
    #[inline]
    pub fn init(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn has_indirect(&self) -> bool {
        self.indirect != 0
    }

    #[inline]
    pub fn set_indirect(&mut self, block_id: u32) {
        self.indirect = block_id;
    }

    /// 文件块 `block_index` 所在的设备块号；未分配则为空
    pub fn block_id(&self, block_index: usize, cache: &mut BlockCacheManager) -> Option<u32> {
        let block_id = if block_index < DIRECT_BLOCKS {
            self.direct[block_index]
        } else if block_index < MAX_FILE_BLOCKS && self.has_indirect() {
            cache
                .get(self.indirect as usize)
                .lock()
                .map(0, |indirect: &IndirectBlock| {
                    // 剔去直接索引的部分
                    indirect[block_index - DIRECT_BLOCKS]
                })
        } else {
            0
        };

        (block_id != 0).then_some(block_id)
    }

    /// 记录文件块 `block_index` 的设备块号。
    /// 超出直接索引时，一级索引块必须已经就位。
    pub fn set_block_id(&mut self, block_index: usize, block_id: u32, cache: &mut BlockCacheManager) {
        assert!(block_index < MAX_FILE_BLOCKS);

        if block_index < DIRECT_BLOCKS {
            self.direct[block_index] = block_id;
        } else {
            assert!(self.has_indirect());
            cache
                .get(self.indirect as usize)
                .lock()
                .map_mut(0, |indirect: &mut IndirectBlock| {
                    indirect[block_index - DIRECT_BLOCKS] = block_id;
                });
        }
    }

    /// 收集文件占用的全部块：数据块以及一级索引块
    pub fn blocks(&self, cache: &mut BlockCacheManager) -> Vec<u32> {
        let mut blocks: Vec<u32> = self.direct.iter().copied().filter(|&id| id != 0).collect();

        if self.has_indirect() {
            cache
                .get(self.indirect as usize)
                .lock()
                .map(0, |indirect: &IndirectBlock| {
                    blocks.extend(indirect.iter().copied().filter(|&id| id != 0));
                });
            blocks.push(self.indirect);
        }

        blocks
    }
}
