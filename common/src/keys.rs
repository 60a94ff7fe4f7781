//! 照合キーの導出
//!
//! 項目名・ファイル名から比較用キーを作る。1回の照合の間は不変。

use crate::normalizer::TextNormalizer;
use crate::translator::Dictionary;
use crate::types::CatalogItem;
use regex::Regex;

/// 項目の比較用キー
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemKeys {
    /// 正規化済みアラビア語名
    pub arabic: String,
    /// アラビア語名の翻字スラッグ
    pub arabic_translated: String,
    /// 正規化済み英語名
    pub english: String,
    /// 英語名のスラッグ
    pub english_translated: String,
}

impl ItemKeys {
    /// 報告・上書き照合に使う代表キー
    pub fn primary(&self) -> &str {
        if self.arabic.is_empty() {
            &self.english
        } else {
            &self.arabic
        }
    }
}

/// 正規化と翻字をまとめたキー導出器
#[derive(Debug, Clone, Default)]
pub struct KeyDeriver {
    normalizer: TextNormalizer,
    dictionary: Dictionary,
}

impl KeyDeriver {
    pub fn new(normalizer: TextNormalizer, dictionary: Dictionary) -> Self {
        Self {
            normalizer,
            dictionary,
        }
    }

    /// 既定の正規化器と組み込み辞書
    pub fn builtin() -> Self {
        Self::new(TextNormalizer::default(), Dictionary::builtin())
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    pub fn translate(&self, normalized: &str) -> String {
        self.dictionary.translate(normalized)
    }

    pub fn item_keys(&self, item: &CatalogItem) -> ItemKeys {
        let arabic = self.normalize(&item.names_by_locale.ar);
        let english = self.normalize(&item.names_by_locale.en);
        ItemKeys {
            arabic_translated: self.translate(&arabic),
            english_translated: self.translate(&english),
            arabic,
            english,
        }
    }

    /// ファイル名から（正規化キー, 翻字キー）を導出
    pub fn asset_keys(&self, filename: &str) -> (String, String) {
        let normalized = self.normalize(&asset_stem(filename));
        let translated = self.translate(&normalized);
        (normalized, translated)
    }
}

/// ファイル名の語幹（ディレクトリ・拡張子・重複マーカーを除去）
///
/// 重複マーカーは ` (N)`・` copy`・1桁の `-N` / `_N` だけ。
/// 2桁以上の番号（容量・サイズ）は名称の一部として残す。
///
/// `smoothie-strawberry-2.jpg` → `smoothie-strawberry`
/// `وافل فريز (1).jpg` → `وافل فريز`
pub fn asset_stem(filename: &str) -> String {
    lazy_static::lazy_static! {
        static ref EXTENSION_RE: Regex = Regex::new(r"\.[A-Za-z0-9]{1,5}$").unwrap();
        static ref DUPLICATE_MARKER_RE: Regex =
            Regex::new(r"(?i)(?:\s*\(\d+\)|\s+copy|[-_]\d)$").unwrap();
    }

    let name = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    let stem = EXTENSION_RE.replace(name, "");
    let stem = stem.trim_end();
    DUPLICATE_MARKER_RE.replace(stem, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_stem() {
        assert_eq!(asset_stem("mango-mojito.jpg"), "mango-mojito");
        assert_eq!(asset_stem("smoothie-strawberry-2.jpg"), "smoothie-strawberry");
        assert_eq!(asset_stem("menu-items/crepes-crepe-4.JPG"), "crepes-crepe");
        assert_eq!(asset_stem("موهيتو مانجو .jpg"), "موهيتو مانجو");
        assert_eq!(asset_stem("وافل فريز (1).jpg"), "وافل فريز");
        assert_eq!(asset_stem("latte copy.png"), "latte");
    }

    #[test]
    fn test_asset_stem_keeps_spaced_numbers() {
        // 「في 60」は名称の一部であり重複マーカーではない
        assert_eq!(asset_stem("في 60 .jpg"), "في 60");
        assert_eq!(asset_stem("7up.jpg"), "7up");
    }

    #[test]
    fn test_asset_stem_keeps_multi_digit_suffix() {
        assert_eq!(asset_stem("pepsi-330.jpg"), "pepsi-330");
        assert_eq!(asset_stem("v-60.jpg"), "v-60");
        assert_eq!(asset_stem("water_500.png"), "water_500");
        assert_eq!(asset_stem("latte (12).jpg"), "latte");
    }

    #[test]
    fn test_asset_keys() {
        let keys = KeyDeriver::builtin();
        let (normalized, translated) = keys.asset_keys("قهوة تركية+عربية.jpg");
        assert_eq!(normalized, "قهوه تركيه عربيه");
        assert_eq!(translated, "turkish-coffee-arabic");

        let (normalized, translated) = keys.asset_keys("Mango-Mojito.jpg");
        assert_eq!(normalized, "mango-mojito");
        assert_eq!(translated, "mango-mojito");
    }

    #[test]
    fn test_item_keys() {
        let keys = KeyDeriver::builtin();
        let item = CatalogItem::new("1", "مُوهيتو مانجو", "Mango Mojito", "Mojito");
        let derived = keys.item_keys(&item);
        assert_eq!(derived.arabic, "موهيتو مانجو");
        assert_eq!(derived.arabic_translated, "mojito-mango");
        assert_eq!(derived.english, "mango mojito");
        assert_eq!(derived.english_translated, "mango-mojito");
        assert_eq!(derived.primary(), "موهيتو مانجو");
    }

    #[test]
    fn test_primary_falls_back_to_english() {
        let keys = KeyDeriver::builtin();
        let item = CatalogItem::new("1", "", "Flat White", "");
        assert_eq!(keys.item_keys(&item).primary(), "flat white");
    }
}
