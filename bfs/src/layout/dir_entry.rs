use core::str;

use crate::{NAME_LEN, NUM_INODES};

/// 目录块：第 `inum` 个槽位存放 `inum` 号文件的名字
pub type Directory = [DirEntry; NUM_INODES];

/// 目录项，名字为空表示槽位空闲
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct DirEntry {
    /// NUL 结尾的文件名
    name: [u8; NAME_LEN],
}

impl DirEntry {
    /// 调用方须保证 `name` 短于 `NAME_LEN`
    pub fn new(name: &str) -> Self {
        let mut entry = Self::default();
        entry.name[..name.len()].copy_from_slice(name.as_bytes());
        entry
    }

    pub fn name(&self) -> &str {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_LEN);
        str::from_utf8(&self.name[..len]).unwrap_or_default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name[0] == 0
    }
}
