//! 段階的類似度スコア
//!
//! 完全一致 → 部分文字列 → 単語の重なり → なし の順に判定し、
//! 最初に該当した段のスコアをそのまま使う（段をまたいだ合成はしない）。

use crate::keys::ItemKeys;
use crate::normalizer::split_words;
use crate::pool::{AssetCandidate, AssetPool};
use crate::translator::PLACEHOLDER_SLUG;
use crate::types::MatchType;
use std::cmp::Ordering;

pub const EXACT_SCORE: f64 = 100.0;
pub const SUBSTRING_SCORE: f64 = 80.0;
/// 単語の重なり率に掛ける上限値
pub const WORD_OVERLAP_SCALE: f64 = 60.0;

/// スコアと、そのスコアを出した段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub value: f64,
    pub match_type: MatchType,
}

impl Score {
    pub const NONE: Score = Score {
        value: 0.0,
        match_type: MatchType::None,
    };

    /// 高い方を残す（同値なら優先度の高い段）
    fn max(self, other: Score) -> Score {
        match other.value.total_cmp(&self.value) {
            Ordering::Greater => other,
            Ordering::Equal if other.match_type.precedence() > self.match_type.precedence() => other,
            _ => self,
        }
    }
}

fn is_comparable(key: &str) -> bool {
    !key.is_empty() && key != PLACEHOLDER_SLUG
}

/// 2つのキーの類似度（0〜100）
///
/// どちらかが空またはプレースホルダーなら比較しない。
pub fn score(item_key: &str, asset_key: &str) -> Score {
    if !is_comparable(item_key) || !is_comparable(asset_key) {
        return Score::NONE;
    }

    if item_key == asset_key {
        return Score {
            value: EXACT_SCORE,
            match_type: MatchType::Exact,
        };
    }

    if item_key.contains(asset_key) || asset_key.contains(item_key) {
        return Score {
            value: SUBSTRING_SCORE,
            match_type: MatchType::Substring,
        };
    }

    let (matching, total) = word_overlap(item_key, asset_key);
    if matching > 0 {
        return Score {
            // 割ってから掛けると 2/3*60 などで誤差が出る
            value: matching as f64 * WORD_OVERLAP_SCALE / total as f64,
            match_type: MatchType::WordOverlap,
        };
    }

    Score::NONE
}

/// （一致した項目側の単語数, 多い方の単語数）
///
/// 片方の単語がもう片方を含めば一致とみなす。
fn word_overlap(item_key: &str, asset_key: &str) -> (usize, usize) {
    let item_words: Vec<&str> = split_words(item_key).collect();
    let asset_words: Vec<&str> = split_words(asset_key).collect();

    let matching = item_words
        .iter()
        .filter(|w| {
            asset_words
                .iter()
                .any(|a| a.contains(**w) || w.contains(*a))
        })
        .count();

    (matching, item_words.len().max(asset_words.len()))
}

/// 単語の重なり率（0.0〜1.0）
pub fn word_overlap_ratio(item_key: &str, asset_key: &str) -> f64 {
    match word_overlap(item_key, asset_key) {
        (_, 0) => 0.0,
        (matching, total) => matching as f64 / total as f64,
    }
}

/// 項目キー群と候補画像のスコア
///
/// 同じ表記同士だけを比較する:
/// - 正規化アラビア語名 ↔ 正規化ファイル名
/// - 翻字アラビア語名 ↔ 翻字ファイル名
/// - 英語名スラッグ ↔ 翻字ファイル名
pub fn score_keys(keys: &ItemKeys, asset: &AssetCandidate) -> Score {
    [
        (keys.arabic.as_str(), asset.normalized_key.as_str()),
        (keys.arabic_translated.as_str(), asset.translated_key.as_str()),
        (keys.english_translated.as_str(), asset.translated_key.as_str()),
    ]
    .into_iter()
    .map(|(item_key, asset_key)| score(item_key, asset_key))
    .fold(Score::NONE, Score::max)
}

/// 順位づけされた候補
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    /// プール内のインデックス
    pub asset_index: usize,
    pub score: Score,
}

/// しきい値以上の候補をスコア降順で返す
///
/// 同点はプールの入力順（先勝ち）。
pub fn rank_candidates(keys: &ItemKeys, pool: &AssetPool, threshold: f64) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = pool
        .iter()
        .enumerate()
        .filter_map(|(asset_index, asset)| {
            let score = score_keys(keys, asset);
            (score.value > 0.0 && score.value >= threshold).then_some(RankedCandidate {
                asset_index,
                score,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .value
            .total_cmp(&a.score.value)
            .then_with(|| {
                b.score
                    .match_type
                    .precedence()
                    .cmp(&a.score.match_type.precedence())
            })
            .then_with(|| a.asset_index.cmp(&b.asset_index))
    });
    ranked
}

/// 最高スコアの候補（しきい値なし）
pub fn best_match(keys: &ItemKeys, pool: &AssetPool) -> Option<RankedCandidate> {
    rank_candidates(keys, pool, 0.0).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyDeriver;
    use crate::types::CatalogItem;

    #[test]
    fn test_exact() {
        let s = score("mango-mojito", "mango-mojito");
        assert_eq!(s.value, 100.0);
        assert_eq!(s.match_type, MatchType::Exact);
    }

    #[test]
    fn test_substring_either_direction() {
        assert_eq!(score("latte", "iced-latte").match_type, MatchType::Substring);
        assert_eq!(score("iced-latte", "latte").value, 80.0);
    }

    #[test]
    fn test_word_overlap() {
        let s = score("strawberry-smoothie", "smoothie-strawberry");
        assert_eq!(s.match_type, MatchType::WordOverlap);
        assert_eq!(s.value, 60.0);

        // 1語一致 / 多い方3語
        let s = score("mango-juice", "orange-juice-fresh");
        assert_eq!(s.value, 20.0);
        assert!((word_overlap_ratio("mango-juice", "orange-juice-fresh") - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_overlap_counts_partial_words() {
        // crepes は crepe を含む
        let s = score("crepe-lotus", "crepes-nutella");
        assert_eq!(s.match_type, MatchType::WordOverlap);
        assert_eq!(s.value, 30.0);
    }

    #[test]
    fn test_none() {
        assert_eq!(score("tea", "waffle"), Score::NONE);
        assert_eq!(score("", "waffle"), Score::NONE);
    }

    #[test]
    fn test_placeholder_never_scores() {
        assert_eq!(score(PLACEHOLDER_SLUG, PLACEHOLDER_SLUG), Score::NONE);
        assert_eq!(score(PLACEHOLDER_SLUG, "item-special"), Score::NONE);
        assert_eq!(score("mango", PLACEHOLDER_SLUG), Score::NONE);
    }

    #[test]
    fn test_score_keys_compares_like_with_like() {
        let keys = KeyDeriver::builtin();
        let item = keys.item_keys(&CatalogItem::new("1", "موهيتو مانجو", "Mango Mojito", ""));
        let pool = AssetPool::new(["mango-mojito.jpg", "موهيتو مانجو.jpg"], &keys);

        // 英語スラッグ ↔ 翻字ファイル名
        assert_eq!(score_keys(&item, pool.get(0).unwrap()).match_type, MatchType::Exact);
        // 正規化アラビア語 ↔ 正規化ファイル名
        assert_eq!(score_keys(&item, pool.get(1).unwrap()).match_type, MatchType::Exact);
    }

    #[test]
    fn test_rank_prefers_exact_over_earlier_substring() {
        let keys = KeyDeriver::builtin();
        let item = keys.item_keys(&CatalogItem::new("1", "", "Latte", ""));
        let pool = AssetPool::new(["iced-latte.jpg", "latte.jpg"], &keys);

        let best = best_match(&item, &pool).unwrap();
        assert_eq!(best.asset_index, 1);
        assert_eq!(best.score.match_type, MatchType::Exact);
    }

    #[test]
    fn test_rank_ties_follow_pool_order() {
        let keys = KeyDeriver::builtin();
        let item = keys.item_keys(&CatalogItem::new("1", "", "Latte", ""));
        let pool = AssetPool::new(["latte-2.jpg", "latte.png", "tea.jpg"], &keys);

        let ranked = rank_candidates(&item, &pool, 0.0);
        let indices: Vec<usize> = ranked.iter().map(|c| c.asset_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_rank_applies_threshold() {
        let keys = KeyDeriver::builtin();
        let item = keys.item_keys(&CatalogItem::new("1", "", "Mango Juice", ""));
        let pool = AssetPool::new(["orange-juice-fresh.jpg"], &keys);

        assert_eq!(rank_candidates(&item, &pool, 0.0).len(), 1);
        assert!(rank_candidates(&item, &pool, 40.0).is_empty());
    }
}
