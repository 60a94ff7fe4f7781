//! 画像名のキー一覧
//!
//! 画像ごとに正規化キーと翻字キーを並べ、辞書や上書きテーブルを整備する材料にする。

use crate::error::Result;
use menu_match_common::{AssetPool, KeyDeriver, PLACEHOLDER_SLUG};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPreview {
    pub filename: String,
    pub normalized_key: String,
    pub translated_key: String,
    /// 辞書で1語も訳せなかった
    pub untranslated: bool,
}

pub fn preview_keys(filenames: &[String], keys: &KeyDeriver) -> Vec<KeyPreview> {
    AssetPool::new(filenames, keys)
        .iter()
        .map(|asset| KeyPreview {
            filename: asset.filename.clone(),
            normalized_key: asset.normalized_key.clone(),
            translated_key: asset.translated_key.clone(),
            untranslated: asset.translated_key == PLACEHOLDER_SLUG,
        })
        .collect()
}

pub fn print_preview(previews: &[KeyPreview]) {
    for preview in previews {
        let mark = if preview.untranslated { "⚠" } else { "✔" };
        println!(
            "{} {}\n    → {} | {}",
            mark, preview.filename, preview.normalized_key, preview.translated_key
        );
    }
}

pub fn save_preview(previews: &[KeyPreview], path: &Path) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(previews)?)?;
    Ok(())
}
