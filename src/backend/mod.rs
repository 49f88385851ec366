//! ページの実体となるメモリリージョンのインターフェース定義と実装群.
//!
//! このモジュールは[PagedBuffer](../allocator/struct.PagedBuffer.html)が
//! ページの生成・書き込み・破棄に使用するバックエンドを提供する.
pub use self::memory::{MemoryBackend, MemoryRegion};

use std::fmt;

use crate::Result;

mod memory;

/// ページの実体となる固定長のメモリリージョンを扱うバックエンドを表すトレイト.
///
/// 典型的な実装はGPUのバッファ生成・書き込み命令のラッパーとなる.
///
/// アロケータはリージョンの内容を読むことは無く、
/// 「どのバイト範囲がどのページに属するか」を決めるのみで、実際の書き込みはこのトレイトに委譲する.
pub trait RegionBackend {
    /// リージョンのハンドル.
    type Region: fmt::Debug;

    /// `capacity`バイトの新しいリージョンを生成する.
    ///
    /// `memory_profile`と`access_profile`は、アロケータの構築時に指定された値がそのまま渡される.
    ///
    /// # Errors
    ///
    /// リージョンの確保に失敗した場合には、エラーを返す必要がある.
    /// 容量不足が原因の場合には、種類が`ErrorKind::BackendExhausted`のエラーを返すことが推奨される.
    fn create_region(
        &mut self,
        capacity: u64,
        memory_profile: MemoryProfile,
        access_profile: AccessProfile,
    ) -> Result<Self::Region>;

    /// `region`の`offset`の位置から`data`を書き込む.
    ///
    /// 呼び出し側(アロケータ)は`offset + data.len()`がリージョンの容量を超えないことを保証する.
    ///
    /// 実際の書き込みが、他のバックエンド処理との間でいつ順序付けられるか
    /// (e.g., コマンドバッファへの記録)は実装に任される.
    fn write_region(&mut self, region: &Self::Region, offset: u64, data: &[u8]) -> Result<()>;

    /// 不要になったリージョンを解放する.
    fn destroy_region(&mut self, region: Self::Region);
}

/// ページ用メモリの配置に関するヒント.
///
/// アロケータ自体はこの値を解釈せず、バックエンドにそのまま渡す.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryProfile {
    /// デバイスローカルなメモリを優先する.
    DeviceLocal,

    /// ホストから直接書き込み可能なメモリを優先する.
    HostVisible,

    /// ホスト側のメモリを優先する(主にステージング用途).
    HostCached,
}
impl Default for MemoryProfile {
    fn default() -> Self {
        MemoryProfile::DeviceLocal
    }
}

/// ページへのアクセス頻度に関するヒント.
///
/// アロケータ自体はこの値を解釈せず、バックエンドにそのまま渡す.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessProfile {
    /// 一度書き込まれた後は、ほとんど更新されない.
    Static,

    /// 時々更新される.
    Dynamic,

    /// 毎フレームのように頻繁に更新される.
    Stream,
}
impl Default for AccessProfile {
    fn default() -> Self {
        AccessProfile::Static
    }
}
