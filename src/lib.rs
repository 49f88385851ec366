//! Paged Buffer.
//!
//! `paged_buffer`は、少数の大きなバッファ(ページ)を可変長のパーティションに細かく分割して払い出す、
//! ページ単位のパーティションアロケータ.
//! 多数の小さなGPUリソース(頂点データ、ユニフォーム等)を、少数の物理的な確保にまとめることを目的としている.
//!
//! # 特徴
//!
//! - "BestFit"戦略による割当 (要求サイズを満たす最小の空き領域を選択)
//! - 解放時には、同じページ上で隣接する空き領域を結合
//! - 空き領域が足りない場合には、新しいページを生成してプールを拡張
//! - 完全に空になったページは破棄 (ただし最後の一ページは常に保持)
//! - パーティションのサイズは、設定されたアライメント粒度の倍数に切り上げ
//! - 未知ないし解放済みの識別子に対する操作はエラーにならず、番兵値の返却ないし何もしない
//! - 内部で排他制御は行わない (単一の所有者から直列に操作されることを想定)
//!
//! # モジュールの依存関係
//!
//! ```text
//! allocator => backend
//! ```
//!
//! - [allocator]モジュール:
//!   - 主に[PagedBuffer]構造体を提供
//!   - `paged_buffer`の利用者が直接触るのはこの構造体
//!   - どのバイト範囲がどのページに属するかを決定する
//! - [backend]モジュール:
//!   - 主に[RegionBackend]トレイトとその実装である[MemoryBackend]を提供
//!   - ページの実体(リージョン)の生成・書き込み・破棄を担当する
//!
//! [allocator]: ./allocator/index.html
//! [PagedBuffer]: ./allocator/struct.PagedBuffer.html
//! [backend]: ./backend/index.html
//! [RegionBackend]: ./backend/trait.RegionBackend.html
//! [MemoryBackend]: ./backend/struct.MemoryBackend.html
#![warn(missing_docs)]
extern crate prometrics;
#[macro_use]
extern crate trackable;
#[macro_use]
extern crate slog;

pub use crate::error::{Error, ErrorKind};

pub mod align;
pub mod allocator;
pub mod backend;
pub mod metrics;

mod error;

/// crate固有の`Result`型.
pub type Result<T> = std::result::Result<T, Error>;
