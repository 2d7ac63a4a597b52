use core::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// 找不到文件，或无法以该名字创建文件
    NotFound,
    NameTooLong,
    /// 目录槽位（即 inode）已用尽
    DirectoryFull,
    /// 磁盘镜像不存在或未经格式化
    NoDisk,
    DiskCreate,
    BadDescriptor,
    OpenFileTableFull,
    /// 访问了数据区以外的块
    BadRead,
    DiskFull,
    NegativeCursor,
    BadWhence,
    /// 文件块号超出了 inode 的索引范围
    FileTooBig,
}

impl Error {
    /// 致命错误意味着调用方或运行环境有误，不应重试
    pub fn is_fatal(self) -> bool {
        !matches!(self, Self::NotFound | Self::NameTooLong | Self::DirectoryFull)
    }

    /// 命令行前端以此作为进程退出码
    pub fn code(self) -> i32 {
        match self {
            Self::NotFound | Self::NameTooLong | Self::DirectoryFull => 1,
            Self::NoDisk => 10,
            Self::DiskCreate => 11,
            Self::BadDescriptor => 12,
            Self::OpenFileTableFull => 13,
            Self::BadRead => 14,
            Self::DiskFull => 15,
            Self::NegativeCursor => 16,
            Self::BadWhence => 17,
            Self::FileTooBig => 18,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NotFound => "file not found",
            Self::NameTooLong => "file name too long",
            Self::DirectoryFull => "directory full",
            Self::NoDisk => "disk image not found or not formatted",
            Self::DiskCreate => "cannot create disk image",
            Self::BadDescriptor => "bad file descriptor",
            Self::OpenFileTableFull => "open file table full",
            Self::BadRead => "block out of range",
            Self::DiskFull => "disk full",
            Self::NegativeCursor => "negative cursor offset",
            Self::BadWhence => "bad whence",
            Self::FileTooBig => "file too big",
        };
        f.write_str(msg)
    }
}
