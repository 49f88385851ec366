//! パーティションサイズのアライメント関連の構成要素.
use crate::{ErrorKind, Result};

/// パーティションサイズのアライメント粒度を表現するための構造体.
///
/// アロケータが割り当てる全てのパーティションの長さは、この値の倍数に切り上げられる.
///
/// 二の冪である必要はなく、`0`以外の任意の値を指定可能.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alignment(u64);
impl Alignment {
    /// `Alignment::default()`で使われる値.
    pub const DEFAULT: u64 = 256;

    /// 指定された粒度を表現する`Alignment`インスタンスを生成する.
    ///
    /// # Errors
    ///
    /// `alignment`が`0`の場合には、種類が`ErrorKind::InvalidInput`のエラーが返される.
    ///
    /// # Examples
    ///
    /// ```
    /// use paged_buffer::ErrorKind;
    /// use paged_buffer::align::Alignment;
    ///
    /// assert_eq!(Alignment::new(16).ok().map(|a| a.as_u64()), Some(16));
    /// assert_eq!(Alignment::new(24).ok().map(|a| a.as_u64()), Some(24));
    ///
    /// assert_eq!(Alignment::new(0).err().map(|e| *e.kind()), Some(ErrorKind::InvalidInput));
    /// ```
    #[allow(clippy::new_ret_no_self)]
    pub fn new(alignment: u64) -> Result<Self> {
        track_assert!(alignment != 0, ErrorKind::InvalidInput);
        Ok(Alignment(alignment))
    }

    /// 指定サイズ以上の、最小の粒度の倍数を返す.
    ///
    /// 結果が`u64`の範囲を超える場合には`None`が返される.
    ///
    /// # Examples
    ///
    /// ```
    /// use paged_buffer::align::Alignment;
    ///
    /// let alignment = Alignment::new(16).unwrap();
    /// assert_eq!(alignment.checked_ceil_align(0), Some(0));
    /// assert_eq!(alignment.checked_ceil_align(1), Some(16));
    /// assert_eq!(alignment.checked_ceil_align(100), Some(112));
    /// assert_eq!(alignment.checked_ceil_align(112), Some(112));
    /// assert_eq!(alignment.checked_ceil_align(u64::max_value()), None);
    /// ```
    pub fn checked_ceil_align(self, size: u64) -> Option<u64> {
        match size % self.0 {
            0 => Some(size),
            rem => size.checked_add(self.0 - rem),
        }
    }

    /// 指定サイズ以下の、最大の粒度の倍数を返す.
    ///
    /// # Examples
    ///
    /// ```
    /// use paged_buffer::align::Alignment;
    ///
    /// let alignment = Alignment::new(16).unwrap();
    /// assert_eq!(alignment.floor_align(0), 0);
    /// assert_eq!(alignment.floor_align(15), 0);
    /// assert_eq!(alignment.floor_align(100), 96);
    /// ```
    pub fn floor_align(self, size: u64) -> u64 {
        (size / self.0) * self.0
    }

    /// 割当要求サイズをパーティションの長さに変換する.
    ///
    /// 長さ`0`の要求は、一粒度分に切り上げられる.
    pub(crate) fn partition_size(self, requested: u64) -> Option<u64> {
        self.checked_ceil_align(requested.max(1))
    }

    /// 粒度を`u64`に変換して返す.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// 指定サイズが粒度の倍数かどうかを判定する.
    ///
    /// # Examples
    ///
    /// ```
    /// use paged_buffer::align::Alignment;
    ///
    /// let alignment = Alignment::new(16).unwrap();
    /// assert!(alignment.is_aligned(0));
    /// assert!(alignment.is_aligned(32));
    /// assert!(!alignment.is_aligned(33));
    /// ```
    pub fn is_aligned(self, size: u64) -> bool {
        size % self.0 == 0
    }
}
impl Default for Alignment {
    fn default() -> Self {
        Alignment(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use trackable::result::TestResult;

    use super::*;

    #[test]
    fn zero_sized_request_takes_one_granule() -> TestResult {
        let alignment = track!(Alignment::new(16))?;
        assert_eq!(alignment.partition_size(0), Some(16));
        assert_eq!(alignment.partition_size(1), Some(16));
        assert_eq!(alignment.partition_size(17), Some(32));
        Ok(())
    }

    #[test]
    fn non_power_of_two_works() -> TestResult {
        let alignment = track!(Alignment::new(24))?;
        assert_eq!(alignment.partition_size(25), Some(48));
        assert_eq!(alignment.floor_align(47), 24);
        assert!(alignment.is_aligned(72));
        Ok(())
    }

    #[test]
    fn overflow_is_detected() -> TestResult {
        let alignment = track!(Alignment::new(16))?;
        assert_eq!(alignment.partition_size(u64::max_value() - 1), None);
        Ok(())
    }
}
