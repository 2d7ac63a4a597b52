//! # 打开文件表
//!
//! 每个打开的文件占一项，记录其游标与引用计数。
//! 描述符由 inode 号推得，同一文件的多次打开共享同一项和同一个游标。

use crate::{Error, Inum, NUM_OFT_ENTRIES, Result};

#[derive(Debug, Clone, Copy)]
pub struct OpenFile {
    pub inum: Inum,
    /// **文件**内的偏移量，可以越过文件末尾
    pub cursor: usize,
    /// 尚未关闭的打开次数
    refs: u32,
}

#[derive(Debug)]
pub struct OpenFileTable {
    entries: [Option<OpenFile>; NUM_OFT_ENTRIES],
}

impl OpenFileTable {
    pub const fn new() -> Self {
        Self {
            entries: [None; NUM_OFT_ENTRIES],
        }
    }

    /// 清空整张表
    pub fn init(&mut self) {
        self.entries.fill(None);
    }

    pub fn find(&self, inum: Inum) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.is_some_and(|entry| entry.inum == inum))
    }

    #[inline]
    pub fn entry(&self, inum: Inum) -> Option<&OpenFile> {
        self.entries.iter().flatten().find(|entry| entry.inum == inum)
    }

    #[inline]
    pub fn entry_mut(&mut self, inum: Inum) -> Option<&mut OpenFile> {
        self.entries
            .iter_mut()
            .flatten()
            .find(|entry| entry.inum == inum)
    }

    /// 引用 `inum` 的表项，必要时新建一项，游标从 0 开始
    pub fn reference(&mut self, inum: Inum) -> Result<usize> {
        if let Some(index) = self.find(inum) {
            if let Some(entry) = &mut self.entries[index] {
                entry.refs += 1;
            }
            return Ok(index);
        }

        let index = self
            .entries
            .iter()
            .position(Option::is_none)
            .ok_or(Error::OpenFileTableFull)?;
        self.entries[index] = Some(OpenFile {
            inum,
            cursor: 0,
            refs: 1,
        });

        Ok(index)
    }

    /// 解除一次引用，引用归零时释放表项
    pub fn dereference(&mut self, inum: Inum) -> Result<()> {
        let index = self.find(inum).ok_or(Error::BadDescriptor)?;
        let released = match &mut self.entries[index] {
            Some(entry) => {
                entry.refs -= 1;
                entry.refs == 0
            }
            None => false,
        };

        if released {
            self.entries[index] = None;
        }

        Ok(())
    }
}
