#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bfs::{BLOCK_SIZE, Bfs, BlockDevice, FileSystem, NUM_BLOCKS};

/// 内存中的磁盘镜像
#[derive(Debug)]
pub struct MemDisk(Mutex<Vec<u8>>);

impl MemDisk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(vec![0; NUM_BLOCKS * BLOCK_SIZE])))
    }
}

impl BlockDevice for MemDisk {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) {
        let disk = self.0.lock().unwrap();
        let start = block_id * BLOCK_SIZE;
        buf.copy_from_slice(&disk[start..start + BLOCK_SIZE]);
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) {
        let mut disk = self.0.lock().unwrap();
        let start = block_id * BLOCK_SIZE;
        disk[start..start + BLOCK_SIZE].copy_from_slice(buf);
    }
}

pub fn formatted() -> FileSystem {
    FileSystem::format(Bfs::new(MemDisk::new())).unwrap()
}

/// 内容随位置变化，便于发现错位
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
