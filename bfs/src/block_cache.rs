//! # 块缓存层
//!
//! 对磁盘镜像的所有块访问都经过这里：块在首次访问时读入内存，
//! 可变访问后记为脏块，在被换出、`sync_all` 或析构时写回块设备。
//!
//! 缓存管理器归属于某个块存储实例，而非全局状态，
//! 因此同一进程内可以同时挂载多个互不相干的镜像。

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use core::mem;

use block_dev::BlockDevice;
use spin::Mutex;

use crate::{BLOCK_SIZE, DataBlock};

/// 缓冲区按 8 字节对齐，块内结构体才能直接映射
#[derive(Debug)]
#[repr(C, align(8))]
struct CacheData(DataBlock);

/// 内存中的块缓存
#[derive(Debug)]
pub struct BlockCache {
    /// 缓存的数据
    data: CacheData,
    /// 对应的块ID
    block_id: usize,
    /// 底层块设备的引用
    block_device: Arc<dyn BlockDevice>,
    /// 是否为脏块
    modified: bool,
}

impl BlockCache {
    pub fn new(block_id: usize, block_device: Arc<dyn BlockDevice>) -> Self {
        let mut data = CacheData([0; BLOCK_SIZE]);
        block_device.read_block(block_id, &mut data.0);

        Self {
            data,
            block_id,
            block_device,
            modified: false,
        }
    }

    pub fn sync(&mut self) {
        if self.modified {
            self.modified = false;
            self.block_device.write_block(self.block_id, &self.data.0);
        }
    }

    /// `T` 必须是任意位模式都合法的 `repr(C)` 结构
    pub fn get<T: Sized>(&self, offset: usize) -> &T {
        Self::check::<T>(offset);
        let addr = self.data.0[offset..].as_ptr().cast::<T>();
        unsafe { &*addr }
    }

    pub fn get_mut<T: Sized>(&mut self, offset: usize) -> &mut T {
        Self::check::<T>(offset);
        self.modified = true;
        let addr = self.data.0[offset..].as_mut_ptr().cast::<T>();
        unsafe { &mut *addr }
    }

    #[inline]
    pub fn map<T: Sized, V>(&self, offset: usize, f: impl FnOnce(&T) -> V) -> V {
        f(self.get(offset))
    }

    #[inline]
    pub fn map_mut<T: Sized, V>(&mut self, offset: usize, f: impl FnOnce(&mut T) -> V) -> V {
        f(self.get_mut(offset))
    }

    #[inline]
    fn check<T>(offset: usize) {
        assert!(mem::size_of::<T>() + offset <= BLOCK_SIZE);
        assert_eq!(offset % mem::align_of::<T>(), 0);
    }
}

impl Drop for BlockCache {
    fn drop(&mut self) {
        self.sync();
    }
}

/// 块缓存管理器，缓存、调度块缓存
#[derive(Debug)]
pub struct BlockCacheManager {
    block_device: Arc<dyn BlockDevice>,
    queue: VecDeque<(usize, Arc<Mutex<BlockCache>>)>,
}

impl BlockCacheManager {
    /// 块缓存个数的上限
    const CAPACITY: usize = 16;

    pub fn new(block_device: Arc<dyn BlockDevice>) -> Self {
        Self {
            block_device,
            queue: VecDeque::with_capacity(Self::CAPACITY),
        }
    }

    // 块缓存调度策略：踢走最早缓存且闲置的块
    pub fn get(&mut self, block_id: usize) -> Arc<Mutex<BlockCache>> {
        if let Some(cache) = self
            .queue
            .iter()
            .find_map(|(id, cache)| (block_id == *id).then_some(cache))
        {
            return Arc::clone(cache);
        }

        if self.queue.len() >= Self::CAPACITY {
            // 没有其它引用的才能写回；全都在用时暂时超出上限
            if let Some(index) = self
                .queue
                .iter()
                .position(|(_, cache)| Arc::strong_count(cache) == 1)
            {
                self.queue.remove(index);
            }
        }

        let block_cache = Arc::new(Mutex::new(BlockCache::new(
            block_id,
            self.block_device.clone(),
        )));
        self.queue.push_back((block_id, block_cache.clone()));

        block_cache
    }

    pub fn sync_all(&self) {
        self.queue.iter().for_each(|(_, cache)| cache.lock().sync());
    }
}
