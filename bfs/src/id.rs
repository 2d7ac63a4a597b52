//! 各类编号的新类型，避免 inode 号、描述符与块号相互混用

use derive_more::{Display, From, Into};

/// inode 号，同时是目录槽位的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[repr(transparent)]
pub struct Inum(u32);

/// 文件描述符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[repr(transparent)]
pub struct Fd(u32);

/// 设备块号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[repr(transparent)]
pub struct Dbn(u32);

impl From<Inum> for usize {
    #[inline]
    fn from(inum: Inum) -> Self {
        inum.0 as usize
    }
}

impl From<Dbn> for usize {
    #[inline]
    fn from(dbn: Dbn) -> Self {
        dbn.0 as usize
    }
}

impl Fd {
    /// 0、1、2 留给标准输入、输出与错误
    pub const RESERVED: u32 = 3;
}
