//! 手動上書きテーブル
//!
//! 人手で作った「項目キー → 画像候補（優先順）」の対応表。
//! 上書きは自動スコアより常に優先され、スコアラーは一切参照しない。
//! 候補が複数あるのは、本来の画像がその回のプールに無い場合があるため。

use crate::error::Result;
use crate::normalizer::TextNormalizer;
use crate::pool::AssetPool;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 上書きエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideEntry {
    pub item_key: String,
    #[serde(default)]
    pub candidate_filenames: Vec<String>,
}

impl OverrideEntry {
    pub fn new<S: Into<String>>(
        item_key: impl Into<String>,
        candidates: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            item_key: item_key.into(),
            candidate_filenames: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

/// 上書きファイル形式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideFile {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub entries: Vec<OverrideEntry>,
}

impl OverrideFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// ファイルが無ければ空のテーブル
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 項目キーに候補を先頭で登録（既存エントリがあれば先頭へ移動）
    pub fn prefer(&mut self, item_key: &str, filename: &str, normalizer: &TextNormalizer) {
        let wanted = normalizer.normalize(item_key);
        let existing = self
            .entries
            .iter_mut()
            .find(|e| normalizer.normalize(&e.item_key) == wanted);

        match existing {
            Some(entry) => {
                entry.candidate_filenames.retain(|f| f != filename);
                entry.candidate_filenames.insert(0, filename.to_string());
            }
            None => self.entries.push(OverrideEntry::new(item_key, [filename])),
        }
    }
}

/// 上書き照会の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideLookup<'a> {
    /// プールに存在する最初の候補
    Hit(&'a str),
    /// エントリはあるが候補がどれもプールに無い
    Unavailable(&'a OverrideEntry),
    /// エントリなし
    Missing,
}

/// 正規化キーで引ける上書きテーブル
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    version: String,
    entries: Vec<OverrideEntry>,
    index: HashMap<String, usize>,
}

impl OverrideTable {
    /// 同じ正規化キーのエントリは先勝ち
    pub fn new(entries: Vec<OverrideEntry>, normalizer: &TextNormalizer) -> Self {
        let mut table = Self::default();

        for entry in entries {
            let key = normalizer.normalize(&entry.item_key);
            if key.is_empty() {
                log::warn!("空の項目キーを持つ上書きエントリを無視");
                continue;
            }
            if table.index.contains_key(&key) {
                log::warn!("重複した上書きキーを無視: {}", entry.item_key);
                continue;
            }
            table.index.insert(key, table.entries.len());
            table.entries.push(entry);
        }

        table
    }

    pub fn from_override_file(file: OverrideFile, normalizer: &TextNormalizer) -> Self {
        let mut table = Self::new(file.entries, normalizer);
        table.version = file.version;
        table
    }

    pub fn from_json(json: &str, normalizer: &TextNormalizer) -> Result<Self> {
        Ok(Self::from_override_file(OverrideFile::from_json(json)?, normalizer))
    }

    pub fn from_file(path: &Path, normalizer: &TextNormalizer) -> Result<Self> {
        Ok(Self::from_override_file(OverrideFile::from_file(path)?, normalizer))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[OverrideEntry] {
        &self.entries
    }

    /// 正規化済みキーでエントリを取得
    pub fn entry(&self, item_key: &str) -> Option<&OverrideEntry> {
        self.index.get(item_key).map(|&i| &self.entries[i])
    }

    /// プールにある候補のインデックス（エントリ内の順序、重複なし）
    pub fn present_candidates(&self, item_key: &str, pool: &AssetPool) -> Vec<usize> {
        let mut indices: Vec<usize> = Vec::new();
        if let Some(entry) = self.entry(item_key) {
            for filename in &entry.candidate_filenames {
                if let Some(index) = pool.index_of(filename) {
                    if !indices.contains(&index) {
                        indices.push(index);
                    }
                }
            }
        }
        indices
    }

    pub fn lookup<'a>(&'a self, item_key: &str, pool: &AssetPool) -> OverrideLookup<'a> {
        let Some(entry) = self.entry(item_key) else {
            return OverrideLookup::Missing;
        };
        entry
            .candidate_filenames
            .iter()
            .find(|f| pool.contains(f))
            .map(|f| OverrideLookup::Hit(f.as_str()))
            .unwrap_or(OverrideLookup::Unavailable(entry))
    }

    /// プールに存在する最初の候補を返す（無ければスコアリングに任せる）
    pub fn lookup_override<'a>(&'a self, item_key: &str, pool: &AssetPool) -> Option<&'a str> {
        match self.lookup(item_key, pool) {
            OverrideLookup::Hit(filename) => Some(filename),
            _ => None,
        }
    }
}
