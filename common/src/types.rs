//! 照合データモデル
//!
//! CLIとライブラリで共有される型:
//! - CatalogItem: メニュー項目（照合の入力）
//! - MatchType: 一致の種類（優先順位つきの閉じた列挙）
//! - MatchResult: 項目ごとの照合結果
//! - ReconcileOptions: 照合オプション

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 言語別の名称
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedNames {
    pub ar: String,
    pub tr: String,
    pub en: String,
}

/// メニュー項目
///
/// 照合中は読み取り専用。同一性は `id` のみで判定する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,

    #[serde(default, alias = "names")]
    pub names_by_locale: LocalizedNames,

    #[serde(default)]
    pub category: String,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, ar: &str, en: &str, category: &str) -> Self {
        Self {
            id: id.into(),
            names_by_locale: LocalizedNames {
                ar: ar.to_string(),
                tr: String::new(),
                en: en.to_string(),
            },
            category: category.to_string(),
        }
    }
}

/// 一致の種類
///
/// 宣言順が優先順位（上ほど強い）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchType {
    /// 手動上書きテーブルによる割り当て
    Override,
    /// キー完全一致
    Exact,
    /// 部分文字列一致
    Substring,
    /// 単語の重なり
    WordOverlap,
    /// カテゴリからの推測（語彙的一致ではない）
    CategoryGuess,
    /// 一致なし
    None,
}

impl MatchType {
    pub const ALL: [MatchType; 6] = [
        MatchType::Override,
        MatchType::Exact,
        MatchType::Substring,
        MatchType::WordOverlap,
        MatchType::CategoryGuess,
        MatchType::None,
    ];

    /// 優先度（大きいほど強い）
    pub fn precedence(self) -> u8 {
        match self {
            MatchType::Override => 5,
            MatchType::Exact => 4,
            MatchType::Substring => 3,
            MatchType::WordOverlap => 2,
            MatchType::CategoryGuess => 1,
            MatchType::None => 0,
        }
    }

    /// 名称の語彙比較から得られた一致か
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            MatchType::Exact | MatchType::Substring | MatchType::WordOverlap
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Override => "override",
            MatchType::Exact => "exact",
            MatchType::Substring => "substring",
            MatchType::WordOverlap => "wordOverlap",
            MatchType::CategoryGuess => "categoryGuess",
            MatchType::None => "none",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 項目ごとの照合結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub item_id: String,

    /// 正規化済みの項目キー（アラビア語名、無ければ英語名）
    #[serde(default)]
    pub item_key: String,

    pub asset_filename: Option<String>,

    /// 0〜100
    pub score: f64,

    pub match_type: MatchType,
}

impl MatchResult {
    pub fn unmatched(item_id: impl Into<String>, item_key: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            item_key: item_key.into(),
            asset_filename: None,
            score: 0.0,
            match_type: MatchType::None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.asset_filename.is_some()
    }
}

/// 照合オプション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconcileOptions {
    /// 自動一致として採用する最低スコア
    pub score_threshold: f64,
    /// これ未満の割り当ては低信頼として報告
    pub confidence_threshold: f64,
    /// 同じ画像を複数項目に割り当てない
    pub enforce_unique_assets: bool,
    /// 語彙的一致が無い場合にカテゴリから推測する
    pub allow_fallback_category_guess: bool,
    /// 重複解消ラウンドの上限
    pub max_resolution_rounds: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            score_threshold: 40.0,
            confidence_threshold: 60.0,
            enforce_unique_assets: true,
            allow_fallback_category_guess: false,
            max_resolution_rounds: 100,
        }
    }
}

impl ReconcileOptions {
    /// 契約違反のオプションを検出
    pub fn validate(&self) -> Result<()> {
        check_score_range("scoreThreshold", self.score_threshold)?;
        check_score_range("confidenceThreshold", self.confidence_threshold)?;
        if self.max_resolution_rounds == 0 {
            return Err(Error::InvalidOptions(
                "maxResolutionRounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_score_range(name: &str, value: f64) -> Result<()> {
    if value.is_nan() || !(0.0..=100.0).contains(&value) {
        return Err(Error::InvalidOptions(format!(
            "{} must be within 0..=100 (got {})",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_type_precedence_is_strictly_ordered() {
        let ranks: Vec<u8> = MatchType::ALL.iter().map(|t| t.precedence()).collect();
        assert!(ranks.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_match_type_serializes_camel_case() {
        let json = serde_json::to_string(&MatchType::WordOverlap).unwrap();
        assert_eq!(json, "\"wordOverlap\"");
        let back: MatchType = serde_json::from_str("\"categoryGuess\"").unwrap();
        assert_eq!(back, MatchType::CategoryGuess);
    }

    #[test]
    fn test_catalog_item_accepts_database_shape() {
        let json = r#"{"id":"42","names":{"ar":"قهوة تركية","en":"Turkish Coffee"},"category":"hot"}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.names_by_locale.ar, "قهوة تركية");
        assert_eq!(item.names_by_locale.tr, "");
        assert_eq!(item.category, "hot");
    }

    #[test]
    fn test_default_options_are_valid() {
        assert!(ReconcileOptions::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let nan = ReconcileOptions {
            score_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(nan.validate(), Err(Error::InvalidOptions(_))));

        let too_high = ReconcileOptions {
            confidence_threshold: 120.0,
            ..Default::default()
        };
        assert!(too_high.validate().is_err());

        let no_rounds = ReconcileOptions {
            max_resolution_rounds: 0,
            ..Default::default()
        };
        assert!(no_rounds.validate().is_err());
    }
}
