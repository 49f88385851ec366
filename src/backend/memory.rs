use std::collections::BTreeMap;

use crate::backend::{AccessProfile, MemoryProfile, RegionBackend};
use crate::{ErrorKind, Result};

/// `MemoryBackend`が払い出すリージョンのハンドル.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemoryRegion(u64);
impl MemoryRegion {
    /// ハンドルの識別番号を返す.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct RegionEntry {
    bytes: Vec<u8>,
    memory_profile: MemoryProfile,
    access_profile: AccessProfile,
}

/// メモリベースの`RegionBackend`の実装.
///
/// 各リージョンはゼロ埋めされた`Vec<u8>`として保持される.
///
/// # 注意
///
/// これは主にテストや性能計測、CPU側でのステージング用途を意図した実装であり、
/// GPUのメモリは一切扱わない.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    regions: BTreeMap<MemoryRegion, RegionEntry>,
    next_region: u64,
    limit_bytes: Option<u64>,
    writes: u64,
}
impl MemoryBackend {
    /// 新しい`MemoryBackend`インスタンスを生成する.
    ///
    /// 確保可能なリージョンの合計サイズに上限は無い.
    pub fn new() -> Self {
        Self::default()
    }

    /// 生存中のリージョンの合計サイズが`limit_bytes`以下に制限された`MemoryBackend`を生成する.
    ///
    /// 上限を超える確保要求は`ErrorKind::BackendExhausted`で失敗する.
    pub fn with_limit(limit_bytes: u64) -> Self {
        MemoryBackend {
            limit_bytes: Some(limit_bytes),
            ..Self::default()
        }
    }

    /// 指定リージョンの内容を返す.
    ///
    /// 破棄済み(ないし未知)のリージョンの場合には`None`が返される.
    pub fn region_bytes(&self, region: &MemoryRegion) -> Option<&[u8]> {
        self.regions.get(region).map(|r| &r.bytes[..])
    }

    /// 指定リージョンの生成時に渡されたプロファイルを返す.
    pub fn region_profiles(&self, region: &MemoryRegion) -> Option<(MemoryProfile, AccessProfile)> {
        self.regions
            .get(region)
            .map(|r| (r.memory_profile, r.access_profile))
    }

    /// 生存中のリージョンの数を返す.
    pub fn live_regions(&self) -> usize {
        self.regions.len()
    }

    /// 生存中のリージョンの合計サイズを返す.
    pub fn live_bytes(&self) -> u64 {
        self.regions.values().map(|r| r.bytes.len() as u64).sum()
    }

    /// これまでに発行された書き込み命令の数を返す(長さ`0`の書き込みも含む).
    pub fn writes(&self) -> u64 {
        self.writes
    }
}
impl RegionBackend for MemoryBackend {
    type Region = MemoryRegion;

    fn create_region(
        &mut self,
        capacity: u64,
        memory_profile: MemoryProfile,
        access_profile: AccessProfile,
    ) -> Result<Self::Region> {
        if let Some(limit) = self.limit_bytes {
            let live = self.live_bytes();
            track_assert!(
                live.checked_add(capacity).map_or(false, |n| n <= limit),
                ErrorKind::BackendExhausted; live, capacity, limit
            );
        }
        track_assert!(
            capacity <= usize::max_value() as u64,
            ErrorKind::BackendExhausted; capacity
        );

        let region = MemoryRegion(self.next_region);
        self.next_region += 1;
        self.regions.insert(
            region,
            RegionEntry {
                bytes: vec![0; capacity as usize],
                memory_profile,
                access_profile,
            },
        );
        Ok(region)
    }

    fn write_region(&mut self, region: &Self::Region, offset: u64, data: &[u8]) -> Result<()> {
        let entry = track_assert_some!(
            self.regions.get_mut(region),
            ErrorKind::InvalidInput,
            "Unknown region: {:?}",
            region
        );
        let capacity = entry.bytes.len() as u64;
        let end = offset.checked_add(data.len() as u64);
        track_assert!(
            end.map_or(false, |end| end <= capacity),
            ErrorKind::InvalidInput; offset, data.len(), capacity
        );

        let start = offset as usize;
        entry.bytes[start..start + data.len()].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }

    fn destroy_region(&mut self, region: Self::Region) {
        self.regions.remove(&region);
    }
}
