//! 書き戻し計画・SQL生成
//!
//! 割り当て結果を画像URLに変換する。実際の書き込み（PATCHやSQL実行）は外部ツールが行う。

use menu_match_common::{MatchReport, MatchResult, MatchType};
use serde::Serialize;

/// 書き戻し1件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteBackEntry {
    pub item_id: String,
    pub asset_filename: String,
    pub image_url: String,
    pub match_type: MatchType,
    pub score: f64,
}

/// ベースURLとファイル名から画像URLを作る（ファイル名はURLエンコード）
pub fn asset_url(base_url: &str, filename: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{}/{}", base, urlencoding::encode(filename))
}

fn entry_for(result: &MatchResult, base_url: &str) -> Option<WriteBackEntry> {
    let filename = result.asset_filename.as_deref()?;
    Some(WriteBackEntry {
        item_id: result.item_id.clone(),
        asset_filename: filename.to_string(),
        image_url: asset_url(base_url, filename),
        match_type: result.match_type,
        score: result.score,
    })
}

/// 書き戻し計画（カタログ順）
///
/// `confident_only` なら低信頼・カテゴリ推測を除く。
pub fn build_plan(report: &MatchReport, base_url: &str, confident_only: bool) -> Vec<WriteBackEntry> {
    if confident_only {
        report
            .confident_assignments()
            .filter_map(|r| entry_for(r, base_url))
            .collect()
    } else {
        report
            .assignments
            .iter()
            .filter_map(|r| entry_for(r, base_url))
            .collect()
    }
}

fn sql_quote(value: &str) -> String {
    value.replace('\'', "''")
}

/// UPDATE文のスクリプト
pub fn sql_script(entries: &[WriteBackEntry]) -> String {
    let mut sql = String::new();
    sql.push_str("-- image_url UPDATE statements generated by menu-match\n");
    sql.push_str("-- Review before running\n\n");

    for entry in entries {
        sql.push_str(&format!(
            "UPDATE items SET image_url = '{}' WHERE id = '{}'; -- {} {:.0}\n",
            sql_quote(&entry.image_url),
            sql_quote(&entry.item_id),
            entry.match_type,
            entry.score
        ));
    }

    sql.push_str(&format!("\n-- Total UPDATE statements: {}\n", entries.len()));
    sql
}
