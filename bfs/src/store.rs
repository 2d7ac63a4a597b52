//! # 块存储层
//!
//! [`BlockStore`] 是文件读写层所依赖的全部能力：
//! 文件名解析、描述符与 inode 号的互换、打开文件表、文件大小、
//! 文件块到设备块的映射与分配，以及按整块读写。
//!
//! [`Bfs`] 是它在块设备上的实现，磁盘布局见 `layout` 模块。

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use block_dev::BlockDevice;

use crate::block_cache::BlockCacheManager;
use crate::layout::*;
use crate::oft::OpenFileTable;
use crate::{DIRECT_BLOCKS, MAX_FILE_BLOCKS, NAME_LEN, NUM_INODES};
use crate::{DataBlock, Dbn, Error, Fd, Inum, Result};

pub trait BlockStore {
    /// 创建文件；同名文件已存在时将其清空
    fn create_file(&mut self, name: &str) -> Result<Inum>;
    fn lookup_file(&mut self, name: &str) -> Result<Inum>;

    fn fd_to_inum(&mut self, fd: Fd) -> Result<Inum>;
    /// 同时在打开文件表中引用该文件
    fn inum_to_fd(&mut self, inum: Inum) -> Result<Fd>;

    /// 打开文件表中 `inum` 的表项
    fn find_open_entry(&self, inum: Inum) -> Result<usize>;
    fn release_open_entry(&mut self, inum: Inum) -> Result<()>;

    fn size(&mut self, inum: Inum) -> usize;
    /// inode 记录不下的大小报 [`Error::FileTooBig`]
    fn set_size(&mut self, inum: Inum, size: usize) -> Result<()>;
    fn cursor(&self, inum: Inum) -> Result<usize>;
    fn set_cursor(&mut self, inum: Inum, cursor: usize) -> Result<()>;

    /// 未分配时为空
    fn fbn_to_dbn(&mut self, inum: Inum, fbn: usize) -> Option<Dbn>;
    /// 为文件块分配一个全零的设备块
    fn alloc_block(&mut self, inum: Inum, fbn: usize) -> Result<Dbn>;
    fn read_block(&mut self, dbn: Dbn, buf: &mut DataBlock) -> Result<()>;
    fn write_block(&mut self, dbn: Dbn, buf: &DataBlock) -> Result<()>;

    fn init_super_block(&mut self) -> Result<()>;
    fn init_inodes(&mut self) -> Result<()>;
    fn init_directory(&mut self) -> Result<()>;
    fn init_free_list(&mut self) -> Result<()>;
    fn init_open_file_table(&mut self) -> Result<()>;

    /// 确认介质已经格式化
    fn check_super_block(&mut self) -> Result<()>;
    /// 目录中的全部文件
    fn entries(&mut self) -> Vec<(String, Inum)>;
    /// 把缓存的修改写回介质
    fn sync(&mut self);
}

#[derive(Debug)]
pub struct Bfs {
    cache: BlockCacheManager,
    free_list: Bitmap,
    oft: OpenFileTable,
}

impl Bfs {
    pub fn new(block_device: Arc<dyn BlockDevice>) -> Self {
        Self {
            cache: BlockCacheManager::new(block_device),
            free_list: Bitmap::new(FREE_LIST_BLOCK, DATA_AREA_BLOCKS),
            oft: OpenFileTable::new(),
        }
    }
}

impl BlockStore for Bfs {
    fn create_file(&mut self, name: &str) -> Result<Inum> {
        if name.is_empty() {
            return Err(Error::NotFound);
        }
        if name.len() >= NAME_LEN {
            return Err(Error::NameTooLong);
        }

        if let Ok(inum) = self.lookup_file(name) {
            log::debug!("create: overwriting {name:?} (inum {inum})");
            self.truncate(inum);
            if let Some(entry) = self.oft.entry_mut(inum) {
                entry.cursor = 0;
            }
            self.cache.sync_all();
            return Ok(inum);
        }

        let slot = self
            .on_dir(|dir| dir.iter().position(DirEntry::is_empty))
            .ok_or(Error::DirectoryFull)?;
        let inum = Inum::from(slot as u32);

        self.on_dir_mut(|dir| dir[slot] = DirEntry::new(name));
        self.on_inode_mut(inum, DiskInode::init);
        self.cache.sync_all();

        log::debug!("create: {name:?} -> inum {inum}");
        Ok(inum)
    }

    fn lookup_file(&mut self, name: &str) -> Result<Inum> {
        if name.is_empty() {
            return Err(Error::NotFound);
        }

        self.on_dir(|dir| {
            dir.iter()
                .position(|entry| !entry.is_empty() && entry.name() == name)
        })
        .map(|slot| Inum::from(slot as u32))
        .ok_or(Error::NotFound)
    }

    fn fd_to_inum(&mut self, fd: Fd) -> Result<Inum> {
        let inum = u32::from(fd)
            .checked_sub(Fd::RESERVED)
            .map(Inum::from)
            .filter(|&inum| usize::from(inum) < NUM_INODES)
            .ok_or(Error::BadDescriptor)?;

        if self.on_dir(|dir| dir[usize::from(inum)].is_empty()) {
            return Err(Error::BadDescriptor);
        }

        Ok(inum)
    }

    fn inum_to_fd(&mut self, inum: Inum) -> Result<Fd> {
        self.oft.reference(inum)?;
        Ok(Fd::from(u32::from(inum) + Fd::RESERVED))
    }

    fn find_open_entry(&self, inum: Inum) -> Result<usize> {
        self.oft.find(inum).ok_or(Error::BadDescriptor)
    }

    fn release_open_entry(&mut self, inum: Inum) -> Result<()> {
        self.oft.dereference(inum)
    }

    fn size(&mut self, inum: Inum) -> usize {
        self.on_inode(inum, |inode| inode.size as usize)
    }

    fn set_size(&mut self, inum: Inum, size: usize) -> Result<()> {
        let size = u32::try_from(size).map_err(|_| Error::FileTooBig)?;
        self.on_inode_mut(inum, |inode| inode.size = size);
        Ok(())
    }

    fn cursor(&self, inum: Inum) -> Result<usize> {
        self.oft
            .entry(inum)
            .map(|entry| entry.cursor)
            .ok_or(Error::BadDescriptor)
    }

    fn set_cursor(&mut self, inum: Inum, cursor: usize) -> Result<()> {
        let entry = self.oft.entry_mut(inum).ok_or(Error::BadDescriptor)?;
        entry.cursor = cursor;
        Ok(())
    }

    fn fbn_to_dbn(&mut self, inum: Inum, fbn: usize) -> Option<Dbn> {
        let inode = self.on_inode(inum, |inode| *inode);
        inode.block_id(fbn, &mut self.cache).map(Dbn::from)
    }

    fn alloc_block(&mut self, inum: Inum, fbn: usize) -> Result<Dbn> {
        if fbn >= MAX_FILE_BLOCKS {
            return Err(Error::FileTooBig);
        }
        if let Some(dbn) = self.fbn_to_dbn(inum, fbn) {
            return Ok(dbn);
        }

        let mut inode = self.on_inode(inum, |inode| *inode);
        let block_id = self.alloc_data()?;

        if fbn >= DIRECT_BLOCKS && !inode.has_indirect() {
            match self.alloc_data() {
                Ok(indirect) => inode.set_indirect(indirect),
                Err(err) => {
                    self.dealloc_data(block_id);
                    return Err(err);
                }
            }
        }

        inode.set_block_id(fbn, block_id, &mut self.cache);
        self.on_inode_mut(inum, |disk_inode| *disk_inode = inode);

        log::trace!("alloc: inum {inum} fbn {fbn} -> dbn {block_id}");
        Ok(Dbn::from(block_id))
    }

    fn read_block(&mut self, dbn: Dbn, buf: &mut DataBlock) -> Result<()> {
        let block_id = Self::data_block(dbn)?;
        self.cache
            .get(block_id)
            .lock()
            .map(0, |data_block: &DataBlock| buf.copy_from_slice(data_block));
        Ok(())
    }

    fn write_block(&mut self, dbn: Dbn, buf: &DataBlock) -> Result<()> {
        let block_id = Self::data_block(dbn)?;
        self.cache
            .get(block_id)
            .lock()
            .map_mut(0, |data_block: &mut DataBlock| data_block.copy_from_slice(buf));
        Ok(())
    }

    fn init_super_block(&mut self) -> Result<()> {
        self.cache
            .get(SUPER_BLOCK)
            .lock()
            .map_mut(0, SuperBlock::init);
        Ok(())
    }

    fn init_inodes(&mut self) -> Result<()> {
        self.cache
            .get(INODE_BLOCK)
            .lock()
            .map_mut(0, |table: &mut InodeTable| table.fill(DiskInode::default()));
        Ok(())
    }

    fn init_directory(&mut self) -> Result<()> {
        self.on_dir_mut(|dir| dir.fill(DirEntry::default()));
        Ok(())
    }

    fn init_free_list(&mut self) -> Result<()> {
        self.free_list.init(&mut self.cache);
        Ok(())
    }

    fn init_open_file_table(&mut self) -> Result<()> {
        self.oft.init();
        Ok(())
    }

    fn check_super_block(&mut self) -> Result<()> {
        self.cache
            .get(SUPER_BLOCK)
            .lock()
            .map(0, |super_block: &SuperBlock| super_block.is_valid())
            .then_some(())
            .ok_or(Error::NoDisk)
    }

    fn entries(&mut self) -> Vec<(String, Inum)> {
        self.on_dir(|dir| {
            dir.iter()
                .enumerate()
                .filter(|(_, entry)| !entry.is_empty())
                .map(|(slot, entry)| (entry.name().to_owned(), Inum::from(slot as u32)))
                .collect()
        })
    }

    fn sync(&mut self) {
        self.cache.sync_all();
    }
}

impl Bfs {
    /// 读取 inode 并处理
    fn on_inode<V>(&mut self, inum: Inum, f: impl FnOnce(&DiskInode) -> V) -> V {
        self.cache
            .get(INODE_BLOCK)
            .lock()
            .map(0, |table: &InodeTable| f(&table[usize::from(inum)]))
    }

    /// 以某种方式修改 inode
    fn on_inode_mut<V>(&mut self, inum: Inum, f: impl FnOnce(&mut DiskInode) -> V) -> V {
        self.cache
            .get(INODE_BLOCK)
            .lock()
            .map_mut(0, |table: &mut InodeTable| f(&mut table[usize::from(inum)]))
    }

    fn on_dir<V>(&mut self, f: impl FnOnce(&Directory) -> V) -> V {
        self.cache.get(DIR_BLOCK).lock().map(0, f)
    }

    fn on_dir_mut<V>(&mut self, f: impl FnOnce(&mut Directory) -> V) -> V {
        self.cache.get(DIR_BLOCK).lock().map_mut(0, f)
    }

    /// 数据区以外的块号不可由文件读写
    fn data_block(dbn: Dbn) -> Result<usize> {
        let block_id = usize::from(dbn);
        (DATA_AREA_START..DATA_AREA_START + DATA_AREA_BLOCKS)
            .contains(&block_id)
            .then_some(block_id)
            .ok_or(Error::BadRead)
    }

    /// 从空闲位图分配一个数据块并清零
    fn alloc_data(&mut self) -> Result<u32> {
        let index = self
            .free_list
            .alloc(&mut self.cache)
            .ok_or(Error::DiskFull)?;
        let block_id = DATA_AREA_START + index;
        self.cache
            .get(block_id)
            .lock()
            .map_mut(0, |data_block: &mut DataBlock| data_block.fill(0));
        Ok(block_id as u32)
    }

    fn dealloc_data(&mut self, block_id: u32) {
        let block_id = block_id as usize;
        self.cache
            .get(block_id)
            .lock()
            .map_mut(0, |data_block: &mut DataBlock| data_block.fill(0));
        self.free_list
            .dealloc(&mut self.cache, block_id - DATA_AREA_START);
    }

    /// 释放文件的全部块，大小归零
    fn truncate(&mut self, inum: Inum) {
        let inode = self.on_inode(inum, |inode| *inode);
        let blocks = inode.blocks(&mut self.cache);
        self.on_inode_mut(inum, DiskInode::init);
        for block_id in blocks {
            self.dealloc_data(block_id);
        }
    }
}
