//! Menu Match Common Library
//!
//! メニュー項目と画像ファイル名の照合エンジン。CLIから利用される。
//!
//! ```text
//! カタログ + 画像名 + 上書き表
//!   → [正規化, 翻字] → 照合キー
//!   → 照合（上書き, スコア, 一意化, しきい値）
//!   → MatchResult[] → MatchReport
//! ```

pub mod category;
pub mod error;
pub mod export;
pub mod keys;
pub mod normalizer;
pub mod overrides;
pub mod pool;
pub mod reconciler;
pub mod report;
pub mod scorer;
pub mod translator;
pub mod types;

pub use error::{Error, Result};
pub use keys::{asset_stem, ItemKeys, KeyDeriver};
pub use normalizer::{normalize, TextNormalizer};
pub use overrides::{OverrideEntry, OverrideFile, OverrideLookup, OverrideTable};
pub use pool::{AssetCandidate, AssetPool};
pub use reconciler::{reconcile, Reconciler, Reconciliation};
pub use report::{build_report, MatchCounts, MatchReport, MatchTypeCounts, ReportWarning};
pub use scorer::{score, Score};
pub use translator::{Dictionary, DictionaryFile, PLACEHOLDER_SLUG};
pub use types::{CatalogItem, LocalizedNames, MatchResult, MatchType, ReconcileOptions};
