use crate::BLOCK_BITS;
use crate::block_cache::BlockCacheManager;

/// 位图块的结构
type BitmapBlock = [u64; BLOCK_BITS / 64];

/// 空闲块位图，占一整块，第 i 位指示其区域内第 i 块是否已分配
#[derive(Debug)]
pub struct Bitmap {
    /// 位图所在块
    block_id: usize,
    /// 位图所指示区域的总块数
    capacity: usize,
}

impl Bitmap {
    #[inline]
    pub const fn new(block_id: usize, capacity: usize) -> Self {
        assert!(capacity <= BLOCK_BITS);
        Self { block_id, capacity }
    }

    /// 标记所有块为空闲
    pub fn init(&self, cache: &mut BlockCacheManager) {
        cache
            .get(self.block_id)
            .lock()
            .map_mut(0, |bitmap_block: &mut BitmapBlock| bitmap_block.fill(0));
    }

    /// 在指示区域内分配新的块，返回其区域内编号。
    /// 若位图的空间用尽，则返回空。
    pub fn alloc(&self, cache: &mut BlockCacheManager) -> Option<usize> {
        cache
            .get(self.block_id)
            .lock()
            .map_mut(0, |bitmap_block: &mut BitmapBlock| {
                // 第一个还有 0 的 bit 组，其最低的 0 位即空闲块
                let (group_index, ingroup_index) =
                    bitmap_block
                        .iter()
                        .enumerate()
                        .find_map(|(group_index, &bits)| {
                            (bits != u64::MAX)
                                .then_some((group_index, bits.trailing_ones() as usize))
                        })?;

                let index = group_index * 64 + ingroup_index;
                if index >= self.capacity {
                    return None;
                }

                bitmap_block[group_index] |= 1u64 << ingroup_index;
                Some(index)
            })
    }

    pub fn dealloc(&self, cache: &mut BlockCacheManager, index: usize) {
        let (group_index, ingroup_index) = (index / 64, index % 64);
        cache
            .get(self.block_id)
            .lock()
            .map_mut(0, |bitmap_block: &mut BitmapBlock| {
                // 编号一定得有对应的位
                assert_ne!(bitmap_block[group_index] & (1u64 << ingroup_index), 0);
                bitmap_block[group_index] &= !(1u64 << ingroup_index);
            });
    }
}
