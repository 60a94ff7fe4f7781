//! カテゴリによる推測
//!
//! 語彙的な一致が1件も無い項目に対し、カテゴリ名から画像グループを推測する。
//! 精度は低いので `MatchType::CategoryGuess` として語彙一致とは区別して報告する。

use crate::keys::ItemKeys;
use crate::normalizer::split_words;
use crate::pool::AssetPool;

/// カテゴリ推測のスコア（どの語彙一致よりも低い）
pub const CATEGORY_GUESS_SCORE: f64 = 10.0;

/// 画像グループ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryGroup {
    pub name: &'static str,
    /// カテゴリ名・項目名に現れる語（正規化済み）
    pub triggers: &'static [&'static str],
    /// 翻字ファイル名に現れる語
    pub asset_keywords: &'static [&'static str],
}

/// グループ表（上から順に判定）
///
/// pancake は cake より前に置く。
pub const CATEGORY_GROUPS: &[CategoryGroup] = &[
    CategoryGroup {
        name: "crepe",
        triggers: &["كريب", "crepe"],
        asset_keywords: &["crepe"],
    },
    CategoryGroup {
        name: "waffle",
        triggers: &["وافل", "waffle"],
        asset_keywords: &["waffle"],
    },
    CategoryGroup {
        name: "pancake",
        triggers: &["بان كيك", "pancake"],
        asset_keywords: &["pancake"],
    },
    CategoryGroup {
        name: "cake",
        triggers: &["كيك", "حلويات", "cake", "cheesecake", "dessert"],
        asset_keywords: &["cake", "cheesecake", "tiramisu", "brownies"],
    },
    CategoryGroup {
        name: "iced",
        triggers: &["ايس", "مثلج", "iced", "ice", "cold"],
        asset_keywords: &["iced"],
    },
    CategoryGroup {
        name: "mojito-smoothie",
        triggers: &["موهيتو", "سموزي", "mojito", "smoothie"],
        asset_keywords: &["mojito", "smoothie"],
    },
    CategoryGroup {
        name: "juice",
        triggers: &["عصير", "عصاير", "عصائر", "juice", "fresh"],
        asset_keywords: &["juice"],
    },
    CategoryGroup {
        name: "milkshake",
        triggers: &["ميلك شيك", "milkshake", "shake"],
        asset_keywords: &["milkshake"],
    },
    CategoryGroup {
        name: "coffee",
        triggers: &["قهوه", "اسبريسو", "لاتيه", "coffee", "espresso", "latte"],
        asset_keywords: &["coffee", "espresso", "latte", "cappuccino", "americano"],
    },
    CategoryGroup {
        name: "tea",
        triggers: &["شاي", "زهورات", "tea", "herbal"],
        asset_keywords: &["tea"],
    },
];

/// `key` の中に `phrase` の単語列が連続して現れるか（各語は前方一致）
fn contains_phrase(key: &str, phrase: &str) -> bool {
    let key_words: Vec<&str> = split_words(key).collect();
    let phrase_words: Vec<&str> = split_words(phrase).collect();
    if phrase_words.is_empty() || phrase_words.len() > key_words.len() {
        return false;
    }

    key_words.windows(phrase_words.len()).any(|window| {
        window
            .iter()
            .zip(&phrase_words)
            .all(|(word, wanted)| word.starts_with(wanted))
    })
}

impl CategoryGroup {
    pub fn is_triggered_by(&self, key: &str) -> bool {
        self.triggers.iter().any(|t| contains_phrase(key, t))
    }

    pub fn matches_asset(&self, translated_key: &str) -> bool {
        self.asset_keywords
            .iter()
            .any(|k| contains_phrase(translated_key, k))
    }
}

/// 項目のグループを推測する
///
/// カテゴリ名を優先し、該当が無ければ項目名から探す。
pub fn guess_group(category_key: &str, keys: &ItemKeys) -> Option<&'static CategoryGroup> {
    let find = |key: &str| CATEGORY_GROUPS.iter().find(|g| g.is_triggered_by(key));

    find(category_key).or_else(|| {
        [
            keys.arabic.as_str(),
            keys.english.as_str(),
            keys.arabic_translated.as_str(),
            keys.english_translated.as_str(),
        ]
        .into_iter()
        .find_map(find)
    })
}

/// グループに属する画像のインデックス（プール順）
pub fn group_assets(group: &CategoryGroup, pool: &AssetPool) -> Vec<usize> {
    pool.iter()
        .enumerate()
        .filter(|(_, asset)| group.matches_asset(&asset.translated_key))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyDeriver;
    use crate::normalizer::normalize;
    use crate::types::CatalogItem;

    #[test]
    fn test_triggers_are_normalized() {
        for group in CATEGORY_GROUPS {
            for trigger in group.triggers {
                assert_eq!(&normalize(trigger), trigger, "group {}", group.name);
            }
        }
    }

    #[test]
    fn test_contains_phrase_uses_word_prefix() {
        assert!(contains_phrase("crepes-nutella", "crepe"));
        assert!(contains_phrase("ميني بان كيك", "بان كيك"));
        assert!(!contains_phrase("pancake-honey", "cake"));
        assert!(!contains_phrase("steak", "tea"));
        assert!(!contains_phrase("", "tea"));
    }

    #[test]
    fn test_guess_from_category_first() {
        let keys = KeyDeriver::builtin();
        let item = keys.item_keys(&CatalogItem::new("1", "نوتيلا خاص", "Nutella Special", ""));
        let group = guess_group(&normalize("كريب"), &item).unwrap();
        assert_eq!(group.name, "crepe");
    }

    #[test]
    fn test_guess_falls_back_to_item_name() {
        let keys = KeyDeriver::builtin();
        let item = keys.item_keys(&CatalogItem::new("1", "ميني بان كيك", "", "Sweets"));
        let group = guess_group(&normalize("Sweets"), &item).unwrap();
        assert_eq!(group.name, "pancake");

        let item = keys.item_keys(&CatalogItem::new("2", "", "Mystery", "Other"));
        assert!(guess_group("other", &item).is_none());
    }

    #[test]
    fn test_group_assets_in_pool_order() {
        let keys = KeyDeriver::builtin();
        let pool = AssetPool::new(
            ["pancake-honey.jpg", "cake-chocolate.jpg", "tea.jpg", "cheesecake.jpg"],
            &keys,
        );
        let cake = CATEGORY_GROUPS.iter().find(|g| g.name == "cake").unwrap();
        assert_eq!(group_assets(cake, &pool), vec![1, 3]);
    }
}
