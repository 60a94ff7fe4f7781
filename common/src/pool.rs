//! アセットプール
//!
//! 1回の照合で使う画像ファイル名の不変インデックス。入力順を保持し、
//! 同点時の決定的な優先順位（先に現れたものが勝つ）に使う。

use crate::keys::KeyDeriver;
use serde::Serialize;
use std::collections::HashMap;

/// 候補画像
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCandidate {
    pub filename: String,
    pub normalized_key: String,
    pub translated_key: String,
}

#[derive(Debug, Clone, Default)]
pub struct AssetPool {
    assets: Vec<AssetCandidate>,
    index: HashMap<String, usize>,
}

impl AssetPool {
    pub fn new<I, S>(filenames: I, keys: &KeyDeriver) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_exclusions(filenames, keys, &[])
    }

    /// 除外パターン（大文字小文字を無視した部分一致）つきで構築
    ///
    /// 空のファイル名・完全重複は捨てる（重複は最初の1件を残す）。
    pub fn with_exclusions<I, S>(filenames: I, keys: &KeyDeriver, exclusions: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exclusions: Vec<String> = exclusions
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        let mut pool = Self::default();

        for filename in filenames {
            // ファイル名は外部で意味を持つため加工しない
            let filename = filename.as_ref();
            if filename.trim().is_empty() {
                continue;
            }

            let lower = filename.to_lowercase();
            if let Some(pattern) = exclusions.iter().find(|p| lower.contains(p.as_str())) {
                log::debug!("除外パターン '{}' に一致: {}", pattern, filename);
                continue;
            }

            if pool.index.contains_key(filename) {
                log::warn!("重複したファイル名を無視: {}", filename);
                continue;
            }

            let (normalized_key, translated_key) = keys.asset_keys(filename);
            pool.index.insert(filename.to_string(), pool.assets.len());
            pool.assets.push(AssetCandidate {
                filename: filename.to_string(),
                normalized_key,
                translated_key,
            });
        }

        pool
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AssetCandidate> {
        self.assets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetCandidate> {
        self.assets.iter()
    }

    pub fn index_of(&self, filename: &str) -> Option<usize> {
        self.index.get(filename).copied()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.index.contains_key(filename)
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|a| a.filename.as_str())
    }
}
