//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum shared by every crate of the minting client.

use serde::Serialize;

/// エラー種別の列挙体
///
/// ミント処理の各段階で発生するエラーを分類します。
/// リトライ可否の判定やログレベルの決定に使用します。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Timeout;
/// assert!(kind.is_retryable());
/// assert_eq!(kind.as_str(), "Timeout");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 接続失敗などのネットワークエラー
    Network,
    /// リクエストタイムアウト
    Timeout,
    /// サーバーが明確に拒否した（新しいチャレンジが必要）
    Rejected,
    /// 既に消費済みの解答に対する重複受理
    Duplicate,
    /// 戦略内の全試行が失敗した
    Exhausted,
    /// 署名の失敗（鍵の不備、PSBT の不正）
    Signing,
    /// 探索が予算内に完了しなかった、または中断された
    Cancelled,
    /// 解答ログの読み書き失敗
    Storage,
    /// 設定の不備
    Config,
    /// サーバー応答の形式が不正
    InvalidResponse,
    /// 内部エラー
    Internal,
}

impl ErrorKind {
    /// ユーザー向けの文字列表現を取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Exhausted.as_str(), "Exhausted");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "Network",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Rejected => "Rejected",
            ErrorKind::Duplicate => "Duplicate",
            ErrorKind::Exhausted => "Exhausted",
            ErrorKind::Signing => "Signing",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::Storage => "Storage",
            ErrorKind::Config => "Config",
            ErrorKind::InvalidResponse => "Invalid Response",
            ErrorKind::Internal => "Internal",
        }
    }

    /// 同じ入力でリトライする価値があるかどうかを判定
    ///
    /// 一時的なネットワーク障害のみ `true` を返します。
    /// `Rejected` は新しいチャレンジでのみ再試行可能なので `false` です。
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Timeout)
    }

    /// 呼び出し元に必ず伝播すべき致命的エラーかどうかを判定
    #[inline]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            ErrorKind::Signing | ErrorKind::Config | ErrorKind::Internal
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
