//! Partition と Partition Table
use std::collections::{btree_map, BTreeMap};
use std::fmt;

use super::page::PageId;

/// パーティションの識別子.
///
/// 識別子は割当の度に単調増加で払い出され、解放後も再利用されることは無い.
/// 解放済みの識別子は、単に「未知の識別子」として扱われる.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionId(u64);
impl PartitionId {
    /// 識別子を`u64`に変換して返す.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}
impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 割当済みのパーティションを示すための構造体.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Partition {
    /// パーティションが属するページ.
    pub page: PageId,

    /// ページ内での開始位置(バイト単位).
    pub offset: u64,

    /// パーティションの長さ(バイト単位、アライメント後).
    pub len: u64,
}
impl Partition {
    /// パーティションの終端位置を返す.
    ///
    /// **注意**: パーティションは [offset, end) の範囲を用いる.
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// 割当済みパーティション群を保持するテーブル.
#[derive(Debug, Clone, Default)]
pub(crate) struct PartitionTable {
    // 識別子順に列挙できるように`BTreeMap`を採用
    map: BTreeMap<PartitionId, Partition>,
    next_id: u64,
}
impl PartitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// パーティションを登録し、新しく払い出した識別子を返す.
    pub fn insert(&mut self, partition: Partition) -> PartitionId {
        let id = PartitionId(self.next_id);
        self.next_id += 1;
        self.map.insert(id, partition);
        id
    }

    pub fn get(&self, id: PartitionId) -> Option<Partition> {
        self.map.get(&id).cloned()
    }

    pub fn remove(&mut self, id: PartitionId) -> Option<Partition> {
        self.map.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> btree_map::Iter<PartitionId, Partition> {
        self.map.iter()
    }
}
