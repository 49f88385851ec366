//! [Prometheus][prometheus]用のメトリクス.
//!
//! [prometheus]: https://prometheus.io/
use prometrics::metrics::{Counter, MetricBuilder};

/// [`PagedBuffer`]のメトリクス.
///
/// [`PagedBuffer`]: ../allocator/struct.PagedBuffer.html
#[derive(Debug, Clone)]
pub struct AllocatorMetrics {
    pub(crate) inserted_free_ranges: Counter,
    pub(crate) removed_free_ranges: Counter,
    pub(crate) allocated_partitions: Counter,
    pub(crate) allocated_bytes: Counter,
    pub(crate) released_partitions: Counter,
    pub(crate) released_bytes: Counter,
    pub(crate) created_pages: Counter,
    pub(crate) created_page_bytes: Counter,
    pub(crate) destroyed_pages: Counter,
    pub(crate) destroyed_page_bytes: Counter,
}
impl AllocatorMetrics {
    /// フリーリストに挿入された要素の数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_inserted_free_ranges_total <COUNTER>
    /// ```
    pub fn inserted_free_ranges(&self) -> u64 {
        self.inserted_free_ranges.value() as u64
    }

    /// フリーリストから削除された要素の数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_removed_free_ranges_total <COUNTER>
    /// ```
    pub fn removed_free_ranges(&self) -> u64 {
        self.removed_free_ranges.value() as u64
    }

    /// フリーリストの長さ.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_inserted_free_ranges_total - paged_buffer_allocator_removed_free_ranges_total
    /// ```
    pub fn free_list_len(&self) -> usize {
        // NOTE: 以下の順番で値を取得しないとアンダーフローする可能性がある
        let dec = self.removed_free_ranges();
        let inc = self.inserted_free_ranges();
        (inc - dec) as usize
    }

    /// パーティションの割当回数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_allocated_partitions_total <COUNTER>
    /// ```
    pub fn allocated_partitions(&self) -> u64 {
        self.allocated_partitions.value() as u64
    }

    /// これまでに割り当てたパーティションのバイト数(アライメント後).
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_allocated_bytes_total <COUNTER>
    /// ```
    pub fn allocated_bytes(&self) -> u64 {
        self.allocated_bytes.value() as u64
    }

    /// パーティションの解放回数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_released_partitions_total <COUNTER>
    /// ```
    pub fn released_partitions(&self) -> u64 {
        self.released_partitions.value() as u64
    }

    /// これまでに解放されたパーティションのバイト数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_released_bytes_total <COUNTER>
    /// ```
    pub fn released_bytes(&self) -> u64 {
        self.released_bytes.value() as u64
    }

    /// 生成されたページの数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_created_pages_total <COUNTER>
    /// ```
    pub fn created_pages(&self) -> u64 {
        self.created_pages.value() as u64
    }

    /// 破棄されたページの数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_destroyed_pages_total <COUNTER>
    /// ```
    pub fn destroyed_pages(&self) -> u64 {
        self.destroyed_pages.value() as u64
    }

    /// 現在のページ数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_created_pages_total - paged_buffer_allocator_destroyed_pages_total
    /// ```
    pub fn page_count(&self) -> usize {
        let dec = self.destroyed_pages();
        let inc = self.created_pages();
        (inc - dec) as usize
    }

    /// 現在の全ページの容量の合計.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_created_page_bytes_total - paged_buffer_allocator_destroyed_page_bytes_total
    /// ```
    pub fn capacity_bytes(&self) -> u64 {
        let dec = self.destroyed_page_bytes.value() as u64;
        let inc = self.created_page_bytes.value() as u64;
        inc - dec
    }

    /// 現在割当中のパーティションのバイト数の合計.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// paged_buffer_allocator_allocated_bytes_total - paged_buffer_allocator_released_bytes_total
    /// ```
    pub fn usage_bytes(&self) -> u64 {
        let dec = self.released_bytes();
        let inc = self.allocated_bytes();
        inc - dec
    }

    pub(crate) fn new(builder: &MetricBuilder) -> Self {
        let mut builder = builder.clone();
        builder.namespace("paged_buffer").subsystem("allocator");
        AllocatorMetrics {
            inserted_free_ranges: builder
                .counter("inserted_free_ranges_total")
                .help("Number of inserted ranges into free list")
                .finish()
                .expect("Never fails"),
            removed_free_ranges: builder
                .counter("removed_free_ranges_total")
                .help("Number of removed ranges from free list")
                .finish()
                .expect("Never fails"),
            allocated_partitions: builder
                .counter("allocated_partitions_total")
                .help("Number of allocated partitions")
                .finish()
                .expect("Never fails"),
            allocated_bytes: builder
                .counter("allocated_bytes_total")
                .help("Number of allocated bytes")
                .finish()
                .expect("Never fails"),
            released_partitions: builder
                .counter("released_partitions_total")
                .help("Number of released partitions")
                .finish()
                .expect("Never fails"),
            released_bytes: builder
                .counter("released_bytes_total")
                .help("Number of released bytes")
                .finish()
                .expect("Never fails"),
            created_pages: builder
                .counter("created_pages_total")
                .help("Number of created pages")
                .finish()
                .expect("Never fails"),
            created_page_bytes: builder
                .counter("created_page_bytes_total")
                .help("Number of bytes of created pages")
                .finish()
                .expect("Never fails"),
            destroyed_pages: builder
                .counter("destroyed_pages_total")
                .help("Number of destroyed pages")
                .finish()
                .expect("Never fails"),
            destroyed_page_bytes: builder
                .counter("destroyed_page_bytes_total")
                .help("Number of bytes of destroyed pages")
                .finish()
                .expect("Never fails"),
        }
    }

    pub(crate) fn count_allocation(&self, size: u64) {
        self.allocated_partitions.increment();
        self.allocated_bytes.add_u64(size);
    }

    pub(crate) fn count_releasion(&self, size: u64) {
        self.released_partitions.increment();
        self.released_bytes.add_u64(size);
    }

    pub(crate) fn count_page_creation(&self, capacity: u64) {
        self.created_pages.increment();
        self.created_page_bytes.add_u64(capacity);
    }

    pub(crate) fn count_page_destruction(&self, capacity: u64) {
        self.destroyed_pages.increment();
        self.destroyed_page_bytes.add_u64(capacity);
    }
}
