//! Free Range

use std::cmp;

use super::page::PageId;
use super::partition::Partition;

/// 空き(割当可能)領域を表現するための構造体.
///
/// 同じページ上の他の空き領域および割当済みパーティションとは決して重ならない.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FreeRange {
    /// 空き領域が属するページ.
    pub page: PageId,

    /// ページ内での開始位置(バイト単位).
    pub offset: u64,

    /// 空き領域の長さ(バイト単位).
    pub len: u64,
}
impl FreeRange {
    /// 新しい`FreeRange`インスタンスを生成する.
    pub fn new(page: PageId, offset: u64, len: u64) -> Self {
        FreeRange { page, offset, len }
    }

    /// 空き領域の終端位置を返す.
    ///
    /// **注意**: 空き領域は [offset, end) の範囲を表す.
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }

    /// 先頭から`size`分だけ割り当てを行う.
    ///
    /// # Panics
    ///
    /// `size`が`self.len`を超えている場合には、現在のスレッドがパニックする.
    pub(crate) fn allocate(&mut self, size: u64) -> Partition {
        assert!(size <= self.len, "size={}, free={:?}", size, self);
        let allocated = Partition {
            page: self.page,
            offset: self.offset,
            len: size,
        };
        self.offset += size;
        self.len -= size;
        allocated
    }
}
impl From<Partition> for FreeRange {
    fn from(f: Partition) -> Self {
        FreeRange::new(f.page, f.offset, f.len)
    }
}

/// 比較が"空き領域のサイズ順"で行われる`FreeRange`.
///
/// サイズが等しい場合には、ページ(古い順)、開始位置の順で比較される.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeBasedFreeRange(pub FreeRange);
impl PartialOrd for SizeBasedFreeRange {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for SizeBasedFreeRange {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        (self.0.len, self.0.page, self.0.offset).cmp(&(other.0.len, other.0.page, other.0.offset))
    }
}

/// 比較が"物理的な位置順"(ページ、開始位置)で行われる`FreeRange`.
///
/// 空き領域同士は重ならないので、長さが比較に使われることは無い.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionBasedFreeRange(pub FreeRange);
impl PartialOrd for PositionBasedFreeRange {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for PositionBasedFreeRange {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        (self.0.page, self.0.offset).cmp(&(other.0.page, other.0.offset))
    }
}
