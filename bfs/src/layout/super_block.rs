use crate::layout::{DATA_AREA_BLOCKS, DATA_AREA_START, DIR_BLOCK, FREE_LIST_BLOCK, INODE_BLOCK};
use crate::{MAGIC, NUM_BLOCKS, NUM_INODES};

/// 超级块，记录磁盘布局
#[derive(Debug, Default)]
#[repr(C)]
pub struct SuperBlock {
    magic: u32,
    pub num_blocks: u32,
    pub num_inodes: u32,
    pub inode_block: u32,
    pub dir_block: u32,
    pub free_list_block: u32,
    pub data_area_start: u32,
    pub data_area_blocks: u32,
}

impl SuperBlock {
    pub fn init(&mut self) {
        *self = Self {
            magic: MAGIC,
            num_blocks: NUM_BLOCKS as u32,
            num_inodes: NUM_INODES as u32,
            inode_block: INODE_BLOCK as u32,
            dir_block: DIR_BLOCK as u32,
            free_list_block: FREE_LIST_BLOCK as u32,
            data_area_start: DATA_AREA_START as u32,
            data_area_blocks: DATA_AREA_BLOCKS as u32,
        }
    }

    /// 魔数与布局都须与当前实现一致
    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC
            && self.num_blocks as usize == NUM_BLOCKS
            && self.num_inodes as usize == NUM_INODES
            && self.data_area_start as usize == DATA_AREA_START
    }
}
