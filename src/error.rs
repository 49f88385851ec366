/// crate固有のエラー型.
#[derive(Debug, Clone, TrackableError)]
pub struct Error(trackable::error::TrackableError<ErrorKind>);

/// 発生し得るエラーの種別.
///
/// 存在しない(ないし解放済みの)パーティションIDの操作は、エラーとしては扱われない.
/// その場合、参照系のメソッドは番兵値(e.g., サイズ`0`)を返し、更新系のメソッドは何も行わない.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// バックエンドが新しいリージョン(ページ)を確保できなかった.
    ///
    /// アロケータ側にはフォールバック手段が無いため、割当要求はそのまま失敗する.
    ///
    /// # 典型的な対応策
    ///
    /// - 利用者が不要なパーティションを解放する
    /// - デフォルトのページサイズを小さくした上で、アロケータを再構築する
    BackendExhausted,

    /// 入力が不正.
    ///
    /// # 典型的な対応策
    ///
    /// - 利用者側のプログラムを修正して入力を正しくする
    InvalidInput,

    /// 内部状態が不整合に陥っている.
    ///
    /// プログラムにバグがあることを示している.
    ///
    /// # 典型的な対応策
    ///
    /// - バグ修正を行ってプログラムを更新する
    InconsistentState,

    /// その他エラー.
    ///
    /// E.g., バックエンド固有の書き込み失敗
    Other,
}
impl trackable::error::ErrorKind for ErrorKind {}
