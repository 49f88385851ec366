//! Page

use std::collections::{btree_map, BTreeMap};

/// ページの識別子.
///
/// 識別子はアロケータの生存中に単調増加で払い出され、再利用されることは無い.
/// そのため、他のページの生成・破棄によって、既存のページの識別子が無効になることは無い.
///
/// 識別子の大小は、そのままページの生成順序を表す.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(u64);
impl PageId {
    pub(crate) fn new(id: u64) -> Self {
        PageId(id)
    }

    /// 識別子を`u64`に変換して返す.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// バックエンドが保持するリージョンと、その容量の組.
#[derive(Debug)]
pub struct Page<R> {
    capacity: u64,
    region: R,
}
impl<R> Page<R> {
    /// ページの容量(バイト単位)を返す.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// ページの実体となるリージョンを返す.
    pub fn region(&self) -> &R {
        &self.region
    }

    pub(crate) fn into_region(self) -> R {
        self.region
    }
}

/// ページ群を保持するアリーナ.
#[derive(Debug)]
pub(crate) struct Pages<R> {
    pages: BTreeMap<PageId, Page<R>>,
    next_id: u64,
}
impl<R> Pages<R> {
    pub fn new() -> Self {
        Pages {
            pages: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn insert(&mut self, capacity: u64, region: R) -> PageId {
        let id = PageId(self.next_id);
        self.next_id += 1;
        self.pages.insert(id, Page { capacity, region });
        id
    }

    pub fn get(&self, id: PageId) -> Option<&Page<R>> {
        self.pages.get(&id)
    }

    /// ページを取り除いて返す.
    pub fn remove(&mut self, id: PageId) -> Option<Page<R>> {
        self.pages.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn iter(&self) -> btree_map::Iter<PageId, Page<R>> {
        self.pages.iter()
    }

    pub fn into_regions(self) -> impl Iterator<Item = R> {
        self.pages.into_iter().map(|(_, page)| page.into_region())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut pages = Pages::new();
        let a = pages.insert(10, "a");
        let b = pages.insert(20, "b");
        assert!(a < b);

        assert_eq!(pages.remove(a).map(|p| *p.region()), Some("a"));
        assert!(pages.remove(a).is_none());

        let c = pages.insert(30, "c");
        assert!(b < c);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages.get(b).map(|p| p.capacity()), Some(20));
        assert_eq!(pages.get(c).map(|p| p.capacity()), Some(30));
        assert_eq!(
            pages.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            vec![b, c]
        );
    }
}
