//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// データ品質の問題（未一致・上書き候補の欠落など）はエラーにしない。
/// ここに来るのは読み込み失敗と呼び出し側の契約違反のみ。
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Dictionary conflict: {}", .0.join("; "))]
    DictionaryConflict(Vec<String>),

    #[error("Excel error: {0}")]
    Excel(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
