//! Paged Buffer.
use slog::Logger;
use std::cmp;

use super::builder::PagedBufferBuilder;
use super::free_list::FreeList;
use super::free_range::FreeRange;
use super::page::{Page, PageId, Pages};
use super::partition::{Partition, PartitionId, PartitionTable};
use crate::align::Alignment;
use crate::backend::{AccessProfile, MemoryProfile, RegionBackend};
use crate::metrics::AllocatorMetrics;
use crate::{ErrorKind, Result};

/// ページ単位のパーティションアロケータ.
///
/// 大きなリージョン(ページ)群を保持し、その中から可変長のパーティションを切り出して払い出す.
/// 多数の小さなGPUリソースを、少数の物理バッファに詰め込むことが目的.
///
/// この実装自体は、完全にメモリ上のデータ構造であり、状態は永続化されない.
/// また内部で排他制御は行わないため、複数スレッドから利用する場合には外部で直列化する必要がある.
///
/// # 割当戦略
///
/// このアロケータは"BestFit"戦略を採用している.
///
/// 新規割当要求が発行された際には、全ページの空き領域の中から、
/// 要求サイズを満たすもののうち一番サイズが小さいものが選択される.
/// 選択された空き領域は、その中から要求サイズ分だけの割当を行い、
/// もしまだ余剰分がある場合には、再び空き領域リストに戻される.
///
/// 要求を満たす空き領域が存在しない場合には、新しいページが生成される.
///
/// 解放されたパーティションは、同じページ上で隣接する空き領域と結合される.
/// その結果、ページ全体が空になった場合には、そのページは破棄される(ただし最後の一ページは除く).
///
/// # 存在しない識別子の扱い
///
/// 未知ないし解放済みの`PartitionId`を渡してもエラーにはならない.
/// 参照系のメソッドは番兵値(`0`や`None`)を返し、更新系のメソッドは何も行わない.
///
/// # Examples
///
/// ```
/// use paged_buffer::align::Alignment;
/// use paged_buffer::allocator::PagedBufferBuilder;
/// use paged_buffer::backend::MemoryBackend;
///
/// # fn main() -> Result<(), paged_buffer::Error> {
/// let mut buffer = PagedBufferBuilder::new()
///     .default_page_size(1024)
///     .partition_alignment(Alignment::new(16)?)
///     .finish(MemoryBackend::new())?;
///
/// let id = buffer.allocate(100)?;
/// assert_eq!(buffer.partition_size(id), 112);
/// assert_eq!(buffer.partition_offset(id), 0);
///
/// buffer.write_partition(id, b"hello")?;
///
/// assert!(buffer.free(id));
/// assert_eq!(buffer.partition_size(id), 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PagedBuffer<B: RegionBackend> {
    backend: B,
    pages: Pages<B::Region>,
    free_list: FreeList,
    partitions: PartitionTable,
    default_page_size: u64,
    alignment: Alignment,
    memory_profile: MemoryProfile,
    access_profile: AccessProfile,
    metrics: AllocatorMetrics,
    logger: Logger,
}
impl<B: RegionBackend> PagedBuffer<B> {
    pub(crate) fn new(backend: B, builder: &PagedBufferBuilder) -> Result<Self> {
        track_assert!(builder.default_page_size != 0, ErrorKind::InvalidInput);

        let metrics = AllocatorMetrics::new(&builder.metrics);
        let mut buffer = PagedBuffer {
            backend,
            pages: Pages::new(),
            free_list: FreeList::new(metrics.clone()),
            partitions: PartitionTable::new(),
            default_page_size: builder.default_page_size,
            alignment: builder.alignment,
            memory_profile: builder.memory_profile,
            access_profile: builder.access_profile,
            metrics,
            logger: builder.logger.clone(),
        };

        // 最初のページは構築時に生成しておく
        track!(buffer.create_page(builder.default_page_size))?;
        Ok(buffer)
    }

    /// `size`バイト分のパーティションの割当を行い、その識別子を返す.
    ///
    /// 実際に割り当てられるサイズは、アライメント粒度の倍数に切り上げられる.
    /// `size`が`0`の場合には、一粒度分が割り当てられる.
    ///
    /// 十分な空き領域が存在しない場合には、`max(切り上げ後のサイズ, デフォルトのページサイズ)`の
    /// 容量を持つ新しいページが生成される.
    ///
    /// # Errors
    ///
    /// - ページの生成に失敗した場合には、バックエンドが返したエラーがそのまま返される
    /// - 切り上げ後のサイズが`u64`の範囲を超える場合には、種類が`ErrorKind::InvalidInput`のエラーが返される
    pub fn allocate(&mut self, size: u64) -> Result<PartitionId> {
        let size = track_assert_some!(
            self.alignment.partition_size(size),
            ErrorKind::InvalidInput,
            "Too large partition: size={}, alignment={:?}",
            size,
            self.alignment
        );

        let mut free = if let Some(free) = self.free_list.best_fit(size) {
            free
        } else {
            let capacity = cmp::max(size, self.default_page_size);
            let page = track!(self.create_page(capacity))?;
            track_assert_some!(
                self.free_list.best_fit(size),
                ErrorKind::InconsistentState,
                "No free range on the new page: page={:?}, capacity={}, size={}",
                page,
                capacity,
                size
            )
        };

        self.free_list.delete(free);
        let allocated = free.allocate(size);
        if free.len > 0 {
            // まだ空き領域に余りがある場合は再利用する
            self.free_list.add(free);
        }
        self.metrics.count_allocation(size);
        Ok(self.partitions.insert(allocated))
    }

    /// パーティションの解放を行う.
    ///
    /// 解放された領域は、同じページ上で隣接する空き領域と結合される.
    /// 結合の結果、ページ全体が空き領域となり、かつ他にもページが存在する場合には、そのページは破棄される.
    ///
    /// `id`が未知(ないし解放済み)の場合には何も行わず、`false`を返す.
    pub fn free(&mut self, id: PartitionId) -> bool {
        let partition = match self.partitions.remove(id) {
            Some(partition) => partition,
            None => return false,
        };
        self.metrics.count_releasion(partition.len);

        let free = self.free_list.merge_neighbours(FreeRange::from(partition));
        self.free_list.add(free);

        let is_empty_page = self
            .pages
            .get(free.page)
            .map_or(false, |page| free.offset == 0 && free.len == page.capacity());
        if is_empty_page && self.pages.len() > 1 {
            self.destroy_page(free.page);
        }
        true
    }

    /// パーティションの先頭から`data`を書き込む.
    ///
    /// 書き込まれるのは`min(パーティションのサイズ, data.len())`バイトで、その値が返される.
    ///
    /// `id`が未知の場合には何も行わず、`0`を返す.
    ///
    /// # Errors
    ///
    /// バックエンドの書き込みが失敗した場合には、そのエラーが返される.
    /// その場合でもパーティションの割当状態は変化しない.
    pub fn write_partition(&mut self, id: PartitionId, data: &[u8]) -> Result<usize> {
        track!(self.write_partition_region(id, data, 0))
    }

    /// パーティションの`data_offset`の位置から`data`を書き込む.
    ///
    /// 書き込み範囲はパーティションの境界で切り詰められる:
    ///
    /// - `data_offset`はパーティションのサイズ以下に切り詰められる
    /// - 書き込み長は、切り詰め後の位置からパーティションの終端までに切り詰められる
    ///
    /// そのため、隣接するパーティションの内容が上書きされることは無い.
    /// 実際に書き込まれたバイト数が返される(長さ`0`の書き込みもバックエンドには発行される).
    ///
    /// `id`が未知の場合には何も行わず、`0`を返す.
    ///
    /// # Errors
    ///
    /// バックエンドの書き込みが失敗した場合には、そのエラーが返される.
    pub fn write_partition_region(
        &mut self,
        id: PartitionId,
        data: &[u8],
        data_offset: u64,
    ) -> Result<usize> {
        let partition = match self.partitions.get(id) {
            Some(partition) => partition,
            None => return Ok(0),
        };
        let offset = cmp::min(data_offset, partition.len);
        let len = cmp::min(data.len() as u64, partition.len - offset) as usize;

        let page = track_assert_some!(
            self.pages.get(partition.page),
            ErrorKind::InconsistentState,
            "Unknown page: id={}, partition={:?}",
            id,
            partition
        );
        track!(self
            .backend
            .write_region(page.region(), partition.offset + offset, &data[..len]))?;
        Ok(len)
    }

    /// パーティションが属するページのリージョンを返す.
    ///
    /// `id`が未知の場合には`None`が返される.
    pub fn partition_buffer(&self, id: PartitionId) -> Option<&B::Region> {
        self.partitions
            .get(id)
            .and_then(|p| self.pages.get(p.page))
            .map(|page| page.region())
    }

    /// パーティションのサイズ(アライメント後)を返す.
    ///
    /// `id`が未知の場合には`0`が返される.
    pub fn partition_size(&self, id: PartitionId) -> u64 {
        self.partitions.get(id).map_or(0, |p| p.len)
    }

    /// パーティションのページ内での開始位置を返す.
    ///
    /// `id`が未知の場合には`0`が返される.
    pub fn partition_offset(&self, id: PartitionId) -> u64 {
        self.partitions.get(id).map_or(0, |p| p.offset)
    }

    /// パーティションの情報を返す.
    ///
    /// 番兵値ではなく、識別子の有効性を明示的に確認したい場合に使用する.
    pub fn partition(&self, id: PartitionId) -> Option<Partition> {
        self.partitions.get(id)
    }

    /// 指定されたパーティションが割当中かどうかを判定する.
    pub fn contains(&self, id: PartitionId) -> bool {
        self.partitions.get(id).is_some()
    }

    /// 割当中のパーティション群を識別子順に返す.
    pub fn partitions(&self) -> impl Iterator<Item = (PartitionId, Partition)> + '_ {
        self.partitions.iter().map(|(id, p)| (*id, *p))
    }

    /// 割当中のパーティションの数を返す.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// 現存するページ群を生成順に返す.
    pub fn pages(&self) -> impl Iterator<Item = (PageId, &Page<B::Region>)> + '_ {
        self.pages.iter().map(|(id, page)| (*id, page))
    }

    /// 現存するページの数を返す.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 全ページの空き領域を位置順(ページ、開始位置)に返す.
    pub fn free_ranges(&self) -> impl Iterator<Item = FreeRange> + '_ {
        self.free_list.iter()
    }

    /// 新規ページの生成時に使われるデフォルトのサイズを返す.
    pub fn default_page_size(&self) -> u64 {
        self.default_page_size
    }

    /// パーティションサイズのアライメント粒度を返す.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// バックエンドへの参照を返す.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// アロケータ用のメトリクスを返す.
    pub fn metrics(&self) -> &AllocatorMetrics {
        &self.metrics
    }

    /// 全てのページを破棄した上で、バックエンドを返す.
    ///
    /// 全てのパーティションの識別子は無効となる.
    pub fn into_backend(self) -> B {
        let PagedBuffer {
            mut backend,
            pages,
            metrics,
            logger,
            ..
        } = self;
        for (id, page) in pages.iter() {
            metrics.count_page_destruction(page.capacity());
            debug!(logger, "Page is destroyed"; "page" => id.as_u64(), "capacity" => page.capacity());
        }
        for region in pages.into_regions() {
            backend.destroy_region(region);
        }
        backend
    }

    fn create_page(&mut self, capacity: u64) -> Result<PageId> {
        let region = track!(self.backend.create_region(
            capacity,
            self.memory_profile,
            self.access_profile
        ))?;
        let page = self.pages.insert(capacity, region);
        self.free_list.add(FreeRange::new(page, 0, capacity));
        self.metrics.count_page_creation(capacity);
        debug!(self.logger, "New page is created"; "page" => page.as_u64(), "capacity" => capacity);
        Ok(page)
    }

    fn destroy_page(&mut self, page: PageId) {
        for free in self.free_list.ranges_of(page) {
            self.free_list.delete(free);
        }
        if let Some(page_info) = self.pages.remove(page) {
            let capacity = page_info.capacity();
            self.backend.destroy_region(page_info.into_region());
            self.metrics.count_page_destruction(capacity);
            debug!(self.logger, "Page is destroyed"; "page" => page.as_u64(), "capacity" => capacity);
        }
    }
}
