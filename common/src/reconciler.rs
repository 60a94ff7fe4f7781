//! 照合エンジン
//!
//! 1. 項目ごとに候補列を作る（上書き → 語彙スコア → カテゴリ推測）
//! 2. 一意化が有効なら、取り合いになった画像を強い順に割り当て直す
//!
//! 1は項目間で独立しているので並列に計算し、2だけを逐次で行う。
//! 入力が同じなら結果も同じ（同点は常に入力順で決める）。

use crate::category::{group_assets, guess_group, CATEGORY_GUESS_SCORE};
use crate::error::Result;
use crate::keys::KeyDeriver;
use crate::overrides::{OverrideEntry, OverrideTable};
use crate::pool::AssetPool;
use crate::report::{build_report, MatchReport, ReportWarning};
use crate::scorer::{rank_candidates, EXACT_SCORE};
use crate::types::{CatalogItem, MatchResult, MatchType, ReconcileOptions};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// 項目が割り当てを受けうる画像
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    asset_index: usize,
    score: f64,
    match_type: MatchType,
}

/// 項目ごとの候補列（強い順）
#[derive(Debug, Clone)]
struct ItemPlan {
    item_id: String,
    item_key: String,
    candidates: Vec<Candidate>,
    warning: Option<ReportWarning>,
}

impl ItemPlan {
    fn push(&mut self, candidate: Candidate) {
        if !self
            .candidates
            .iter()
            .any(|c| c.asset_index == candidate.asset_index)
        {
            self.candidates.push(candidate);
        }
    }
}

/// レポート化する前の照合結果
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// カタログと同じ順序
    pub results: Vec<MatchResult>,
    pub warnings: Vec<ReportWarning>,
}

/// 照合エンジン
#[derive(Debug, Clone)]
pub struct Reconciler {
    keys: KeyDeriver,
    options: ReconcileOptions,
}

impl Reconciler {
    /// オプションが不正ならエラー
    pub fn new(keys: KeyDeriver, options: ReconcileOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { keys, options })
    }

    pub fn keys(&self) -> &KeyDeriver {
        &self.keys
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    pub fn build_pool<I, S>(&self, filenames: I, exclusions: &[String]) -> AssetPool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        AssetPool::with_exclusions(filenames, &self.keys, exclusions)
    }

    pub fn override_table(&self, entries: Vec<OverrideEntry>) -> OverrideTable {
        OverrideTable::new(entries, self.keys.normalizer())
    }

    fn plan_item(&self, item: &CatalogItem, pool: &AssetPool, overrides: &OverrideTable) -> ItemPlan {
        let keys = self.keys.item_keys(item);
        let mut plan = ItemPlan {
            item_id: item.id.clone(),
            item_key: keys.primary().to_string(),
            candidates: Vec::new(),
            warning: None,
        };

        // 上書き（アラビア語名 → 英語名）
        let mut unavailable: Option<&OverrideEntry> = None;
        for key in [keys.arabic.as_str(), keys.english.as_str()] {
            if key.is_empty() {
                continue;
            }
            let present = overrides.present_candidates(key, pool);
            if present.is_empty() {
                unavailable = unavailable.or_else(|| overrides.entry(key));
                continue;
            }
            for asset_index in present {
                plan.push(Candidate {
                    asset_index,
                    score: EXACT_SCORE,
                    match_type: MatchType::Override,
                });
            }
        }

        if let (true, Some(entry)) = (plan.candidates.is_empty(), unavailable) {
            log::warn!(
                "上書き候補がプールにありません: [{}] {} ({})",
                item.id,
                entry.item_key,
                entry.candidate_filenames.join(", ")
            );
            plan.warning = Some(ReportWarning::OverrideUnavailable {
                item_id: item.id.clone(),
                item_key: plan.item_key.clone(),
                candidate_filenames: entry.candidate_filenames.clone(),
            });
        }

        // 語彙スコア
        let ranked = rank_candidates(&keys, pool, self.options.score_threshold);
        let has_lexical = !ranked.is_empty();
        for candidate in ranked {
            plan.push(Candidate {
                asset_index: candidate.asset_index,
                score: candidate.score.value,
                match_type: candidate.score.match_type,
            });
        }

        // カテゴリ推測
        if !has_lexical && self.options.allow_fallback_category_guess {
            let category_key = self.keys.normalize(&item.category);
            if let Some(group) = guess_group(&category_key, &keys) {
                log::debug!("[{}] カテゴリ推測: {}", item.id, group.name);
                for asset_index in group_assets(group, pool) {
                    plan.push(Candidate {
                        asset_index,
                        score: CATEGORY_GUESS_SCORE,
                        match_type: MatchType::CategoryGuess,
                    });
                }
            }
        }

        plan
    }

    #[cfg(feature = "parallel")]
    fn plan_items(&self, catalog: &[CatalogItem], pool: &AssetPool, overrides: &OverrideTable) -> Vec<ItemPlan> {
        catalog
            .par_iter()
            .map(|item| self.plan_item(item, pool, overrides))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn plan_items(&self, catalog: &[CatalogItem], pool: &AssetPool, overrides: &OverrideTable) -> Vec<ItemPlan> {
        catalog
            .iter()
            .map(|item| self.plan_item(item, pool, overrides))
            .collect()
    }

    /// 項目ごとの結果（カタログ順）と警告を返す
    pub fn reconcile_items(
        &self,
        catalog: &[CatalogItem],
        pool: &AssetPool,
        overrides: &OverrideTable,
    ) -> Reconciliation {
        let plans = self.plan_items(catalog, pool, overrides);
        let mut cursors = vec![0usize; plans.len()];

        let forced = if self.options.enforce_unique_assets {
            resolve_unique(&plans, &mut cursors, self.options.max_resolution_rounds)
        } else {
            Vec::new()
        };

        let results: Vec<MatchResult> = plans
            .iter()
            .zip(&cursors)
            .map(|(plan, &cursor)| {
                let result = match plan.candidates.get(cursor) {
                    Some(candidate) => MatchResult {
                        item_id: plan.item_id.clone(),
                        item_key: plan.item_key.clone(),
                        asset_filename: pool
                            .get(candidate.asset_index)
                            .map(|a| a.filename.clone()),
                        score: candidate.score,
                        match_type: candidate.match_type,
                    },
                    None => MatchResult::unmatched(&plan.item_id, &plan.item_key),
                };
                log::debug!(
                    "[{}] {} → {} ({}, {:.1})",
                    result.item_id,
                    result.item_key,
                    result.asset_filename.as_deref().unwrap_or("-"),
                    result.match_type,
                    result.score
                );
                result
            })
            .collect();

        let mut warnings: Vec<ReportWarning> =
            plans.iter().filter_map(|p| p.warning.clone()).collect();
        warnings.extend(forced.into_iter().map(|item| {
            log::warn!(
                "一意化が収束しないため未一致にしました: [{}] {}",
                plans[item].item_id,
                plans[item].item_key
            );
            ReportWarning::ResolutionCapReached {
                item_id: plans[item].item_id.clone(),
                item_key: plans[item].item_key.clone(),
                rounds: self.options.max_resolution_rounds,
            }
        }));

        Reconciliation { results, warnings }
    }

    /// 照合してレポートを作る
    pub fn reconcile(
        &self,
        catalog: &[CatalogItem],
        pool: &AssetPool,
        overrides: &OverrideTable,
    ) -> MatchReport {
        let Reconciliation { results, warnings } = self.reconcile_items(catalog, pool, overrides);
        let report = build_report(&results, pool, &self.options, warnings);
        log::info!(
            "照合完了: {}件中 {}件割り当て, 未一致 {}件, 低信頼 {}件, 未使用画像 {}件",
            report.counts.items,
            report.counts.assigned,
            report.counts.unmatched,
            report.counts.low_confidence,
            report.counts.unused_assets
        );
        report
    }
}

/// 組み込み辞書でカタログと画像名を照合する
pub fn reconcile(
    catalog: &[CatalogItem],
    asset_pool: &[String],
    overrides: &[OverrideEntry],
    options: &ReconcileOptions,
) -> Result<MatchReport> {
    let reconciler = Reconciler::new(KeyDeriver::builtin(), options.clone())?;
    let pool = reconciler.build_pool(asset_pool, &[]);
    let table = reconciler.override_table(overrides.to_vec());
    Ok(reconciler.reconcile(catalog, &pool, &table))
}

/// 取り合いの強さ（上書き → スコア → カタログ順）
fn claim_order(plans: &[ItemPlan], cursors: &[usize], a: usize, b: usize) -> Ordering {
    let ca = &plans[a].candidates[cursors[a]];
    let cb = &plans[b].candidates[cursors[b]];
    let is_override = |c: &Candidate| c.match_type == MatchType::Override;

    is_override(cb)
        .cmp(&is_override(ca))
        .then_with(|| cb.score.total_cmp(&ca.score))
        .then_with(|| a.cmp(&b))
}

/// 複数項目が取り合っている画像 → 強い順の項目
fn contested_claims(plans: &[ItemPlan], cursors: &[usize]) -> BTreeMap<usize, Vec<usize>> {
    let mut claims: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (item, plan) in plans.iter().enumerate() {
        if let Some(candidate) = plan.candidates.get(cursors[item]) {
            claims.entry(candidate.asset_index).or_default().push(item);
        }
    }

    claims.retain(|_, claimers| claimers.len() > 1);
    for claimers in claims.values_mut() {
        claimers.sort_by(|&a, &b| claim_order(plans, cursors, a, b));
    }
    claims
}

/// 取り合いが無くなるまで敗者を次の候補へ進める
///
/// 上限ラウンドに達した時点でまだ取り合っている敗者は未一致にし、
/// その項目インデックスを返す。
fn resolve_unique(plans: &[ItemPlan], cursors: &mut [usize], max_rounds: usize) -> Vec<usize> {
    let mut rounds = 0;

    loop {
        let contested = contested_claims(plans, cursors);
        if contested.is_empty() {
            return Vec::new();
        }

        let losers = contested.values().flat_map(|claimers| claimers[1..].iter().copied());

        if rounds == max_rounds {
            let mut forced: Vec<usize> = losers.collect();
            forced.sort_unstable();
            for &item in &forced {
                cursors[item] = plans[item].candidates.len();
            }
            return forced;
        }

        let losers: Vec<usize> = losers.collect();
        for item in losers {
            cursors[item] += 1;
        }
        rounds += 1;
    }
}
