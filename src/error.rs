use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuMatchError {
    #[error(transparent)]
    Common(#[from] menu_match_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("カタログが不正: {0}")]
    InvalidCatalog(String),

    #[error("画像が見つかりません: {0}")]
    NoAssetsFound(String),

    #[error("エクスポートエラー: {0}")]
    Export(String),

    #[error("レビューエラー: {0}")]
    Review(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MenuMatchError>;
