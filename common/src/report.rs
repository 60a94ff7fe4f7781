//! 照合レポート
//!
//! 照合結果を集計し、確定・低信頼・未一致・未使用画像に振り分ける。
//! レビューとCIのスナップショット用にJSONへ書き出せる。

use crate::error::Result;
use crate::pool::AssetPool;
use crate::types::{MatchResult, MatchType, ReconcileOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 致命的でないデータ品質の警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReportWarning {
    /// 上書きエントリの候補がどれもプールに無い
    #[serde(rename_all = "camelCase")]
    OverrideUnavailable {
        item_id: String,
        item_key: String,
        candidate_filenames: Vec<String>,
    },
    /// 一意化の反復上限に達し、未一致に落とした
    #[serde(rename_all = "camelCase")]
    ResolutionCapReached {
        item_id: String,
        item_key: String,
        rounds: usize,
    },
}

impl ReportWarning {
    pub fn item_id(&self) -> &str {
        match self {
            ReportWarning::OverrideUnavailable { item_id, .. }
            | ReportWarning::ResolutionCapReached { item_id, .. } => item_id,
        }
    }
}

impl std::fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportWarning::OverrideUnavailable {
                item_id,
                item_key,
                candidate_filenames,
            } => write!(
                f,
                "[{}] {}: 上書き候補がプールにありません ({})",
                item_id,
                item_key,
                candidate_filenames.join(", ")
            ),
            ReportWarning::ResolutionCapReached {
                item_id,
                item_key,
                rounds,
            } => write!(
                f,
                "[{}] {}: 一意化が{}回で収束せず未一致にしました",
                item_id, item_key, rounds
            ),
        }
    }
}

/// 一致種別ごとの件数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTypeCounts {
    #[serde(rename = "override")]
    pub overrides: usize,
    pub exact: usize,
    pub substring: usize,
    pub word_overlap: usize,
    pub category_guess: usize,
    pub none: usize,
}

impl MatchTypeCounts {
    fn add(&mut self, match_type: MatchType) {
        let slot = match match_type {
            MatchType::Override => &mut self.overrides,
            MatchType::Exact => &mut self.exact,
            MatchType::Substring => &mut self.substring,
            MatchType::WordOverlap => &mut self.word_overlap,
            MatchType::CategoryGuess => &mut self.category_guess,
            MatchType::None => &mut self.none,
        };
        *slot += 1;
    }

    pub fn get(&self, match_type: MatchType) -> usize {
        match match_type {
            MatchType::Override => self.overrides,
            MatchType::Exact => self.exact,
            MatchType::Substring => self.substring,
            MatchType::WordOverlap => self.word_overlap,
            MatchType::CategoryGuess => self.category_guess,
            MatchType::None => self.none,
        }
    }
}

/// 件数サマリー
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCounts {
    pub items: usize,
    pub assigned: usize,
    pub unmatched: usize,
    pub low_confidence: usize,
    pub unused_assets: usize,
    pub by_type: MatchTypeCounts,
}

/// 照合レポート
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub counts: MatchCounts,
    /// 全項目の結果（カタログ順）
    pub results: Vec<MatchResult>,
    /// 画像が割り当てられた結果（カタログ順）
    pub assignments: Vec<MatchResult>,
    /// 未一致の項目ID
    pub unmatched: Vec<String>,
    /// 0 < score < confidenceThreshold の結果
    pub low_confidence: Vec<MatchResult>,
    /// どの結果にも使われなかった画像（プール順）
    pub unused_assets: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<ReportWarning>,
    pub options: ReconcileOptions,
}

/// 結果を集計してレポートを作る
pub fn build_report(
    results: &[MatchResult],
    pool: &AssetPool,
    options: &ReconcileOptions,
    warnings: Vec<ReportWarning>,
) -> MatchReport {
    let mut counts = MatchCounts {
        items: results.len(),
        ..Default::default()
    };
    let mut assignments = Vec::new();
    let mut unmatched = Vec::new();
    let mut low_confidence = Vec::new();

    for result in results {
        counts.by_type.add(result.match_type);

        if result.is_matched() {
            assignments.push(result.clone());
        } else {
            unmatched.push(result.item_id.clone());
        }

        if result.score > 0.0 && result.score < options.confidence_threshold {
            low_confidence.push(result.clone());
        }
    }

    let used: HashSet<&str> = results
        .iter()
        .filter_map(|r| r.asset_filename.as_deref())
        .collect();
    let unused_assets: Vec<String> = pool
        .filenames()
        .filter(|f| !used.contains(f))
        .map(String::from)
        .collect();

    counts.assigned = assignments.len();
    counts.unmatched = unmatched.len();
    counts.low_confidence = low_confidence.len();
    counts.unused_assets = unused_assets.len();

    MatchReport {
        counts,
        results: results.to_vec(),
        assignments,
        unmatched,
        low_confidence,
        unused_assets,
        warnings,
        options: options.clone(),
    }
}

impl MatchReport {
    /// 整形済みJSON（同じ入力なら同じバイト列）
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// 人の確認が必要な結果（低信頼 → 未一致の順）
    pub fn review_targets(&self) -> Vec<&MatchResult> {
        self.low_confidence
            .iter()
            .chain(self.results.iter().filter(|r| !r.is_matched()))
            .collect()
    }

    /// 自信を持って書き戻せる割り当て（低信頼・カテゴリ推測を除く）
    pub fn confident_assignments(&self) -> impl Iterator<Item = &MatchResult> {
        let threshold = self.options.confidence_threshold;
        self.assignments
            .iter()
            .filter(move |r| r.match_type != MatchType::CategoryGuess && r.score >= threshold)
    }
}
