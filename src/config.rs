use crate::error::{MenuMatchError, Result};
use menu_match_common::ReconcileOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 照合オプションの既定値（CLIフラグで上書き）
    pub options: ReconcileOptions,
    /// 書き戻し時に画像名の前へ付けるURL
    pub asset_base_url: Option<String>,
    /// この文字列を含むファイル名はプールに入れない
    pub exclude_asset_patterns: Vec<String>,
    /// 画像として扱う拡張子
    pub asset_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            options: ReconcileOptions::default(),
            asset_base_url: None,
            exclude_asset_patterns: vec!["placeholder".into(), "category-image".into()],
            asset_extensions: vec!["jpg".into(), "jpeg".into(), "png".into(), "webp".into()],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.options.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MenuMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("menu-match").join("config.json"))
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MenuMatchError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.asset_base_url = Some(url);
        self.save()
    }

    /// 既定値に戻して保存
    pub fn reset(&mut self) -> Result<()> {
        *self = Self::default();
        self.save()
    }
}
