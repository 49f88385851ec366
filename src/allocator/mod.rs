//! ページ単位のパーティションアロケータ.
//!
//! アロケータは、バックエンドが確保した固定長のリージョン(ページ)群を保持し、
//! 個々の利用者に対して、その中から必要なサイズの部分領域(パーティション)を割り当てる責務を負っている.
//!
//! アロケータが担当するのは、領域の計算処理のみで、リージョンの内容を読むことは無い.
//! 書き込みは、パーティションを(ページ、オフセット)の組に解決した上で、バックエンドに委譲される.
pub use self::builder::PagedBufferBuilder;
pub use self::free_range::FreeRange;
pub use self::page::{Page, PageId};
pub use self::paged_buffer::PagedBuffer;
pub use self::partition::{Partition, PartitionId};

mod builder;
mod free_list;
mod free_range;
mod page;
mod paged_buffer;
mod partition;
