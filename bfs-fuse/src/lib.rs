
mod block_file;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use bfs::{BLOCK_SIZE, Bfs, Error, FileSystem, NUM_BLOCKS};
use block_dev::BlockDevice;
use typed_bytesize::ByteSizeIec;

pub use self::block_file::BlockFile;

/// 默认的磁盘镜像路径
pub const BFSDISK: &str = "BFSDISK";

/// 磁盘镜像的字节数
pub const DISK_SIZE: u64 = (NUM_BLOCKS * BLOCK_SIZE) as u64;

/// 新建（或清空）镜像文件并格式化
pub fn format(path: &Path) -> Result<FileSystem, Error> {
    let fd = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .and_then(|fd| fd.set_len(DISK_SIZE).map(|_| fd))
        .map_err(|err| {
            log::error!("cannot create {}: {err}", path.display());
            Error::DiskCreate
        })?;

    log::info!("format {} ({})", path.display(), ByteSizeIec(DISK_SIZE));
    let block_dev: Arc<dyn BlockDevice> = Arc::new(BlockFile::new(fd));
    FileSystem::format(Bfs::new(block_dev))
}

/// 挂载已有的镜像文件，它必须存在且经过格式化
pub fn mount(path: &Path) -> Result<FileSystem, Error> {
    let fd = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|err| {
            log::error!("cannot open {}: {err}", path.display());
            Error::NoDisk
        })?;

    // 过短的文件读不出完整的块
    let len = fd.metadata().map_err(|_| Error::NoDisk)?.len();
    if len < DISK_SIZE {
        log::error!(
            "{} holds {}, expected {}",
            path.display(),
            ByteSizeIec(len),
            ByteSizeIec(DISK_SIZE)
        );
        return Err(Error::NoDisk);
    }

    let block_dev: Arc<dyn BlockDevice> = Arc::new(BlockFile::new(fd));
    FileSystem::mount(Bfs::new(block_dev))
}

/// 命令行里的 whence：名字或原始数值，无法识别时交给 [`bfs::Whence`] 报错
pub fn raw_whence(whence: &str) -> i32 {
    match whence.to_ascii_lowercase().as_str() {
        "set" => 0,
        "cur" => 1,
        "end" => 2,
        raw => raw.parse().unwrap_or(-1),
    }
}
