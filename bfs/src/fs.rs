//! # 文件读写层
//!
//! 以字节为单位的文件接口：调用方持有描述符，
//! 本层把 (游标, 字节数) 拆分成若干次整块读写交给块存储层，
//! 并维护游标与文件大小。
//!
//! 无效描述符、磁盘已满等致命错误同样以 [`Error`] 返回，
//! 由调用方决定是否终止进程。

use alloc::string::String;
use alloc::vec::Vec;

use crate::{BLOCK_SIZE, DataBlock, Error, Fd, Inum, MAX_FILE_SIZE, Result};
use crate::{Bfs, BlockStore};

/// `seek` 的基准位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// 从文件开头
    Set,
    /// 从当前游标
    Cur,
    /// 从文件末尾
    End,
}

impl TryFrom<i32> for Whence {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(Self::Set),
            1 => Ok(Self::Cur),
            2 => Ok(Self::End),
            _ => Err(Error::BadWhence),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub inum: Inum,
    pub size: usize,
}

#[derive(Debug)]
pub struct FileSystem<S: BlockStore = Bfs> {
    store: S,
}

impl<S: BlockStore> FileSystem<S> {
    /// 依次初始化超级块、inode、目录、空闲块与打开文件表。
    /// 介质上原有的内容全部作废。
    pub fn format(mut store: S) -> Result<Self> {
        store.init_super_block()?;
        store.init_inodes()?;
        store.init_directory()?;
        store.init_free_list()?;
        store.init_open_file_table()?;
        store.sync();

        log::debug!("format: done");
        Ok(Self { store })
    }

    /// 挂载已经格式化的介质，不改动其内容
    pub fn mount(mut store: S) -> Result<Self> {
        store.check_super_block()?;

        log::debug!("mount: done");
        Ok(Self { store })
    }

    /// 创建文件并打开；同名文件已存在时将其清空而不是追加
    pub fn create(&mut self, name: &str) -> Result<Fd> {
        let inum = self.store.create_file(name)?;
        self.store.inum_to_fd(inum)
    }

    pub fn open(&mut self, name: &str) -> Result<Fd> {
        let inum = self.store.lookup_file(name)?;
        let fd = self.store.inum_to_fd(inum)?;

        log::debug!("open: {name:?} -> fd {fd}");
        Ok(fd)
    }

    pub fn close(&mut self, fd: Fd) -> Result<()> {
        let inum = self.store.fd_to_inum(fd)?;
        self.store.release_open_entry(inum)
    }

    /// 从游标处读出至多 `buf.len()` 字节，返回实际读取的字节数。
    /// 游标位于文件末尾或之后时返回 0，游标不动。
    pub fn read(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        let inum = self.resolve(fd)?;
        let cursor = self.store.cursor(inum)?;
        let size = self.store.size(inum);

        if cursor >= size {
            return Ok(0);
        }

        let total = buf.len().min(size - cursor);
        let mut block: DataBlock = [0; BLOCK_SIZE];
        let mut read_size = 0;

        while read_size < total {
            let pos = cursor + read_size;
            // 文件块号，以及块内偏移
            let fbn = pos / BLOCK_SIZE;
            let offset = pos % BLOCK_SIZE;
            let block_read_size = (BLOCK_SIZE - offset).min(total - read_size);

            // 未分配的文件块位于写入留下的空洞中，读出全零
            match self.store.fbn_to_dbn(inum, fbn) {
                Some(dbn) => self.store.read_block(dbn, &mut block)?,
                None => block.fill(0),
            }

            buf[read_size..read_size + block_read_size]
                .copy_from_slice(&block[offset..offset + block_read_size]);
            read_size += block_read_size;

            log::trace!("read: fd {fd} fbn {fbn} [{offset}, +{block_read_size})");
        }

        self.store.set_cursor(inum, cursor + read_size)?;
        Ok(read_size)
    }

    /// 从游标处写入 `buf` 的全部字节。成功时总是写完，
    /// 文件大小随之增长，但不会缩小。
    /// 写完后的游标超出 [`MAX_FILE_SIZE`] 时什么也不写。
    pub fn write(&mut self, fd: Fd, buf: &[u8]) -> Result<usize> {
        let inum = self.resolve(fd)?;
        let cursor = self.store.cursor(inum)?;
        cursor
            .checked_add(buf.len())
            .filter(|&end| end <= MAX_FILE_SIZE)
            .ok_or(Error::FileTooBig)?;

        let mut block: DataBlock = [0; BLOCK_SIZE];
        let mut written_size = 0;

        while written_size < buf.len() {
            let pos = cursor + written_size;
            let fbn = pos / BLOCK_SIZE;
            let offset = pos % BLOCK_SIZE;
            let block_write_size = (BLOCK_SIZE - offset).min(buf.len() - written_size);

            let dbn = match self.store.fbn_to_dbn(inum, fbn) {
                Some(dbn) => dbn,
                None => self.store.alloc_block(inum, fbn)?,
            };

            // 整块读出、改写、写回，块内其余字节保持原样
            self.store.read_block(dbn, &mut block)?;
            block[offset..offset + block_write_size]
                .copy_from_slice(&buf[written_size..written_size + block_write_size]);
            self.store.write_block(dbn, &block)?;
            written_size += block_write_size;

            log::trace!("write: fd {fd} fbn {fbn} -> dbn {dbn} [{offset}, +{block_write_size})");
        }

        let cursor = cursor + written_size;
        self.store.set_cursor(inum, cursor)?;
        if cursor > self.store.size(inum) {
            self.store.set_size(inum, cursor)?;
        }
        self.store.sync();

        Ok(written_size)
    }

    /// 移动游标。`offset` 为负总是错误；越过文件末尾是允许的，
    /// 但只有随后的写入才会让文件变大。
    /// 相加溢出的游标同样视为越界，报 [`Error::NegativeCursor`]。
    pub fn seek(&mut self, fd: Fd, offset: i64, whence: Whence) -> Result<()> {
        let offset = usize::try_from(offset).map_err(|_| Error::NegativeCursor)?;
        let inum = self.resolve(fd)?;

        let cursor = match whence {
            Whence::Set => Some(offset),
            Whence::Cur => self.store.cursor(inum)?.checked_add(offset),
            Whence::End => self.store.size(inum).checked_add(offset),
        }
        .ok_or(Error::NegativeCursor)?;

        self.store.set_cursor(inum, cursor)
    }

    pub fn tell(&mut self, fd: Fd) -> Result<usize> {
        let inum = self.store.fd_to_inum(fd)?;
        self.store.cursor(inum)
    }

    /// 文件大小，即写入过的最大偏移
    pub fn size(&mut self, fd: Fd) -> Result<usize> {
        let inum = self.store.fd_to_inum(fd)?;
        Ok(self.store.size(inum))
    }

    pub fn list(&mut self) -> Vec<FileInfo> {
        self.store
            .entries()
            .into_iter()
            .map(|(name, inum)| FileInfo {
                name,
                inum,
                size: self.store.size(inum),
            })
            .collect()
    }
}

impl<S: BlockStore> FileSystem<S> {
    /// 描述符 -> inode 号 -> 打开文件表项
    fn resolve(&mut self, fd: Fd) -> Result<Inum> {
        let inum = self.store.fd_to_inum(fd)?;
        self.store.find_open_entry(inum)?;
        Ok(inum)
    }
}
