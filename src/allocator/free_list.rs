//! 空き領域のリスト.
use std::collections::BTreeSet;
#[cfg(test)]
use std::collections::HashSet;
use std::collections::Bound::{Excluded, Included, Unbounded};

use super::free_range::{FreeRange, PositionBasedFreeRange, SizeBasedFreeRange};
use super::page::PageId;
use crate::metrics::AllocatorMetrics;

/// 全ページの空き領域を管理するための二重インデックス.
///
/// 同じ空き領域の集合を、以下の二つの順序で保持している:
///
/// - サイズ順: 割当時の"BestFit"探索用
/// - 位置順(ページ、開始位置): 解放時の隣接領域の結合用
///
/// 要素の追加・削除は`add`と`delete`を通してのみ行われ、両者は常に同じ集合を保持する.
#[derive(Debug)]
pub(crate) struct FreeList {
    size_to_free: BTreeSet<SizeBasedFreeRange>,
    position_to_free: BTreeSet<PositionBasedFreeRange>,
    metrics: AllocatorMetrics,
}
impl FreeList {
    pub fn new(metrics: AllocatorMetrics) -> Self {
        FreeList {
            size_to_free: BTreeSet::new(),
            position_to_free: BTreeSet::new(),
            metrics,
        }
    }

    pub fn add(&mut self, range: FreeRange) {
        assert!(self.size_to_free.insert(SizeBasedFreeRange(range)));
        assert!(self.position_to_free.insert(PositionBasedFreeRange(range)));
        self.metrics.inserted_free_ranges.increment();
    }

    pub fn delete(&mut self, range: FreeRange) {
        assert!(self.size_to_free.remove(&SizeBasedFreeRange(range)));
        assert!(self.position_to_free.remove(&PositionBasedFreeRange(range)));
        self.metrics.removed_free_ranges.increment();
    }

    /// `size`以上かつ最小の空き領域を返す.
    ///
    /// 該当する領域が複数ある場合には、より古いページの、より先頭に近いものが選ばれる.
    pub fn best_fit(&self, size: u64) -> Option<FreeRange> {
        let key = SizeBasedFreeRange(FreeRange::new(PageId::new(0), 0, size));
        self.size_to_free
            .range((Included(&key), Unbounded))
            .next()
            .map(|r| r.0)
    }

    /// `page`上で、終端が`offset`に一致する空き領域を返す.
    pub fn prev(&self, page: PageId, offset: u64) -> Option<FreeRange> {
        let key = PositionBasedFreeRange(FreeRange::new(page, offset, 0));
        self.position_to_free
            .range((Unbounded, Excluded(&key)))
            .next_back()
            .map(|r| r.0)
            .filter(|r| r.page == page && r.end() == offset)
    }

    /// `page`上で、始端が`offset`に一致する空き領域を返す.
    pub fn next(&self, page: PageId, offset: u64) -> Option<FreeRange> {
        let key = PositionBasedFreeRange(FreeRange::new(page, offset, 0));
        self.position_to_free
            .range((Included(&key), Unbounded))
            .next()
            .map(|r| r.0)
            .filter(|r| r.page == page && r.offset == offset)
    }

    /// `page`上の空き領域を位置順に返す.
    pub fn ranges_of(&self, page: PageId) -> Vec<FreeRange> {
        let start = PositionBasedFreeRange(FreeRange::new(page, 0, 0));
        let end = PositionBasedFreeRange(FreeRange::new(page, u64::max_value(), 0));
        self.position_to_free
            .range((Included(&start), Included(&end)))
            .map(|r| r.0)
            .collect()
    }

    /// 全ての空き領域を位置順に走査するイテレータを返す.
    pub fn iter(&self) -> impl Iterator<Item = FreeRange> + '_ {
        self.position_to_free.iter().map(|r| r.0)
    }

    pub fn len(&self) -> usize {
        self.position_to_free.len()
    }

    /// `range`と隣接する空き領域がリスト内に存在する場合には、それらを取り除いた上で一つにまとめる.
    ///
    /// `range`自体はリストに含まれていない必要があり、結合後の領域もリストには追加されない.
    pub fn merge_neighbours(&mut self, mut range: FreeRange) -> FreeRange {
        // 「`range`の始端」に一致する終端を持つ`prev`が存在するなら、 prev range の並びで結合可能
        if let Some(prev) = self.prev(range.page, range.offset) {
            self.delete(prev);
            range = FreeRange::new(range.page, prev.offset, prev.len + range.len);
        }

        // 「`range`の終端」に一致する始端を持つ`next`が存在するなら、 range next の並びで結合可能
        if let Some(next) = self.next(range.page, range.end()) {
            self.delete(next);
            range.len += next.len;
        }
        range
    }

    #[cfg(test)]
    pub fn assert_consistent(&self) {
        let by_size = self.size_to_free.iter().map(|r| r.0).collect::<HashSet<_>>();
        let by_position = self
            .position_to_free
            .iter()
            .map(|r| r.0)
            .collect::<HashSet<_>>();
        assert_eq!(by_size, by_position);
        assert_eq!(self.metrics.free_list_len(), self.len());
    }
}
