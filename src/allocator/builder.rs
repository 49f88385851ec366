use prometrics::metrics::MetricBuilder;
use slog::{Discard, Logger};

use super::PagedBuffer;
use crate::align::Alignment;
use crate::backend::{AccessProfile, MemoryProfile, RegionBackend};
use crate::Result;

/// `PagedBuffer`のビルダ.
#[derive(Debug, Clone)]
pub struct PagedBufferBuilder {
    pub(crate) default_page_size: u64,
    pub(crate) alignment: Alignment,
    pub(crate) memory_profile: MemoryProfile,
    pub(crate) access_profile: AccessProfile,
    pub(crate) metrics: MetricBuilder,
    pub(crate) logger: Logger,
}
impl PagedBufferBuilder {
    /// デフォルトのページサイズ(1MiB).
    pub const DEFAULT_PAGE_SIZE: u64 = 1024 * 1024;

    /// デフォルト設定で`PagedBufferBuilder`インスタンスを生成する.
    pub fn new() -> Self {
        PagedBufferBuilder {
            default_page_size: Self::DEFAULT_PAGE_SIZE,
            alignment: Alignment::default(),
            memory_profile: MemoryProfile::default(),
            access_profile: AccessProfile::default(),
            metrics: MetricBuilder::new(),
            logger: Logger::root(Discard, o!()),
        }
    }

    /// 新規ページのデフォルトのサイズ(バイト単位)を設定する.
    ///
    /// 割当要求サイズがこの値を超える場合には、要求サイズちょうどのページが生成される.
    /// `0`が指定された場合には、`finish()`の呼び出し時にエラーとなる.
    ///
    /// デフォルト値は`PagedBufferBuilder::DEFAULT_PAGE_SIZE`.
    pub fn default_page_size(&mut self, size: u64) -> &mut Self {
        self.default_page_size = size;
        self
    }

    /// パーティションサイズのアライメント粒度を設定する.
    ///
    /// デフォルト値は`Alignment::default()`.
    pub fn partition_alignment(&mut self, alignment: Alignment) -> &mut Self {
        self.alignment = alignment;
        self
    }

    /// ページ用メモリの配置に関するヒントを設定する.
    ///
    /// この値はページ生成時にバックエンドにそのまま渡される.
    ///
    /// デフォルト値は`MemoryProfile::DeviceLocal`.
    pub fn memory_profile(&mut self, profile: MemoryProfile) -> &mut Self {
        self.memory_profile = profile;
        self
    }

    /// ページへのアクセス頻度に関するヒントを設定する.
    ///
    /// この値はページ生成時にバックエンドにそのまま渡される.
    ///
    /// デフォルト値は`AccessProfile::Static`.
    pub fn access_profile(&mut self, profile: AccessProfile) -> &mut Self {
        self.access_profile = profile;
        self
    }

    /// メトリクス用の共通設定を登録する.
    ///
    /// デフォルト値は`MetricBuilder::new()`.
    pub fn metrics(&mut self, metrics: MetricBuilder) -> &mut Self {
        self.metrics = metrics;
        self
    }

    /// ページの生成・破棄を記録する logger を登録する
    pub fn logger(&mut self, logger: Logger) -> &mut Self {
        self.logger = logger;
        self
    }

    /// 指定されたバックエンドを使う`PagedBuffer`を生成する.
    ///
    /// 構築時に、デフォルトサイズのページが一つ生成される.
    ///
    /// # Errors
    ///
    /// - デフォルトのページサイズが`0`の場合には、種類が`ErrorKind::InvalidInput`のエラーが返される
    /// - 最初のページの生成に失敗した場合には、バックエンドが返したエラーがそのまま返される
    pub fn finish<B>(&self, backend: B) -> Result<PagedBuffer<B>>
    where
        B: RegionBackend,
    {
        track!(PagedBuffer::new(backend, self))
    }
}
impl Default for PagedBufferBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use prometrics::metrics::MetricBuilder;
    use slog::{Discard, Logger};
    use trackable::result::TestResult;

    use super::*;
    use crate::backend::MemoryBackend;
    use crate::ErrorKind;

    #[test]
    fn defaults_work() -> TestResult {
        let buffer = track!(PagedBufferBuilder::default().finish(MemoryBackend::new()))?;
        assert_eq!(buffer.default_page_size(), PagedBufferBuilder::DEFAULT_PAGE_SIZE);
        assert_eq!(buffer.alignment(), Alignment::default());
        assert_eq!(buffer.page_count(), 1);
        assert_eq!(
            buffer.backend().live_bytes(),
            PagedBufferBuilder::DEFAULT_PAGE_SIZE
        );
        Ok(())
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let e = PagedBufferBuilder::new()
            .default_page_size(0)
            .finish(MemoryBackend::new())
            .err();
        assert_eq!(e.map(|e| *e.kind()), Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn metrics_and_logger_are_used() -> TestResult {
        let metrics = MetricBuilder::new();
        let mut buffer = track!(PagedBufferBuilder::new()
            .default_page_size(128)
            .metrics(metrics)
            .logger(Logger::root(Discard, o!("component" => "paged_buffer")))
            .finish(MemoryBackend::new()))?;
        track!(buffer.allocate(512))?;
        assert_eq!(buffer.metrics().created_pages(), 2);
        assert_eq!(buffer.metrics().capacity_bytes(), 128 + 512);
        Ok(())
    }
}
