//! 辞書ベースの翻字
//!
//! 正規化済みのアラビア語名を英語風スラッグ（小文字・ハイフン区切り）に変換する。
//! 辞書は版付きの不変データで、実行中に書き換えない。

use crate::error::{Error, Result};
use crate::normalizer::{is_arabic_script, split_words, TextNormalizer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 翻字結果が空になったときのスラッグ
pub const PLACEHOLDER_SLUG: &str = "item";

/// 組み込み辞書の版
pub const BUILTIN_DICTIONARY_VERSION: &str = "2025.10";

/// 組み込み辞書（アラビア語フレーズ → スラッグ）
const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    // コーヒー
    ("اسبريسو", "espresso"),
    ("دبل اسبريسو", "double-espresso"),
    ("دبل", "double"),
    ("امريكانو", "americano"),
    ("كابتشينو", "cappuccino"),
    ("لاتيه", "latte"),
    ("موكا", "mocha"),
    ("ماتشا", "matcha"),
    ("كورتادو", "cortado"),
    ("مكياتو", "macchiato"),
    ("ماكياتو", "macchiato"),
    ("فلات وايت", "flat-white"),
    ("فلتر قهوة", "filter-coffee"),
    ("فيلتر قهوة", "filter-coffee"),
    ("فيلترة قهوة", "filter-coffee"),
    ("قهوة", "coffee"),
    ("قهوة تركية", "turkish-coffee"),
    ("قهوة عربية", "arabic-coffee"),
    ("تركية", "turkish"),
    ("عربية", "arabic"),
    ("ايس", "iced"),
    ("هوت", "hot"),
    ("هوت شوكلت", "hot-chocolate"),
    ("وايت", "white"),
    // 味・素材
    ("كراميل", "caramel"),
    ("كاراميل", "caramel"),
    ("فانيليا", "vanilla"),
    ("شوكولا", "chocolate"),
    ("شوكليت", "chocolate"),
    ("شوكلت", "chocolate"),
    ("بستاشيو", "pistachio"),
    ("بندق", "hazelnut"),
    ("بندوق", "hazelnut"),
    ("لوز", "almond"),
    ("فريز", "strawberry"),
    ("ستروبيري", "strawberry"),
    ("ستروبري", "strawberry"),
    ("برتقال", "orange"),
    ("ليمون", "lemon"),
    ("اناناس", "pineapple"),
    ("مانجو", "mango"),
    ("كيوي", "kiwi"),
    ("رمان", "pomegranate"),
    ("دراق", "peach"),
    ("باشن", "passion"),
    ("بينك", "pink"),
    ("بيري", "berry"),
    ("بلو بيري", "blueberry"),
    ("ميكس بيري", "mixed-berry"),
    ("ميكس بيريز", "mixed-berry"),
    ("توت احمر", "red-berry"),
    ("تفاح", "apple"),
    ("جزر", "carrot"),
    ("الجزر", "carrot"),
    ("بطيخ", "watermelon"),
    ("شمام", "cantaloupe"),
    ("عنب", "grape"),
    ("موز", "banana"),
    ("افوكادو", "avocado"),
    ("العسل", "honey"),
    ("عسل", "honey"),
    ("زنجبيل", "ginger"),
    ("نعناع", "mint"),
    ("خيار", "cucumber"),
    ("قرفة", "cinnamon"),
    ("لوتوس", "lotus"),
    ("لوتس", "lotus"),
    ("اوريو", "oreo"),
    ("مارشميلو", "marshmallow"),
    // デザート
    ("كريب", "crepe"),
    ("وافل", "waffle"),
    ("بان كيك", "pancake"),
    ("ميني بان كيك", "mini-pancake"),
    ("تشيز كيك", "cheesecake"),
    ("تيراميسو", "tiramisu"),
    ("اوبرا", "opera"),
    ("فوندون", "fondant"),
    ("كروسان", "croissant"),
    ("كوكيز", "cookies"),
    ("كيكة", "cake"),
    ("كيك", "cake"),
    ("براونيز", "brownies"),
    ("فواكه", "fruits"),
    ("فوتوتشيني", "fettuccine"),
    ("ميني", "mini"),
    // 飲み物
    ("موهيتو", "mojito"),
    ("سموزي", "smoothie"),
    ("عصير", "juice"),
    ("شاي", "tea"),
    ("شاي تي لاتيه", "chai-tea-latte"),
    ("زهورات", "herbal-tea"),
    ("زيزفون", "linden-tea"),
    ("سحلب", "salep"),
    ("ميلك شيك", "milkshake"),
    ("فراب", "frappe"),
    ("فراي", "frappe"),
    ("فرابتشينو", "frappuccino"),
    ("هيبسكوس", "hibiscus"),
    ("هبيسكوس", "hibiscus"),
    ("صودا", "soda"),
    ("ريد بول", "red-bull"),
    ("كلاسيك", "classic"),
    ("بيكو", "piko"),
    ("ليموناضا", "lemonade"),
    ("زيبرا", "zebra"),
    ("في 60", "v60"),
    // サイズ・修飾
    ("كبير", "large"),
    ("وسط", "medium"),
    ("صغير", "small"),
    ("بالقرفة", "with-cinnamon"),
    ("بالحليب", "with-milk"),
    ("بالعسل", "with-honey"),
    ("بالشوكولا", "with-chocolate"),
    ("بالفريز", "with-strawberry"),
    ("بالفواكه", "with-fruits"),
    ("سادة", "plain"),
    ("سخن", "hot"),
    ("بارد", "cold"),
    ("مع", "with"),
    ("و", "and"),
];

/// 辞書ファイル形式
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictionaryFile {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub entries: Vec<(String, String)>,
}

/// 翻字辞書
///
/// キーは正規化済みの単語列（空白区切り）。
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    version: String,
    phrases: HashMap<String, String>,
    max_phrase_words: usize,
}

impl Dictionary {
    /// 組み込み辞書
    pub fn builtin() -> Self {
        let normalizer = TextNormalizer::default();
        let mut dictionary = Self {
            version: BUILTIN_DICTIONARY_VERSION.to_string(),
            ..Default::default()
        };
        for (source, slug) in BUILTIN_ENTRIES {
            if let Some((key, slug)) = prepare_entry(&normalizer, source, slug) {
                dictionary.insert(key, slug);
            }
        }
        dictionary
    }

    /// エントリ列から構築（正規化後に衝突するエントリがあればエラー）
    pub fn from_entries<I, S, T>(version: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let normalizer = TextNormalizer::default();
        let mut dictionary = Self {
            version: version.to_string(),
            ..Default::default()
        };
        let mut conflicts = Vec::new();

        for (source, slug) in entries {
            let Some((key, slug)) = prepare_entry(&normalizer, source.as_ref(), slug.as_ref())
            else {
                continue;
            };
            match dictionary.phrases.get(&key) {
                Some(existing) if *existing != slug => {
                    conflicts.push(format!("{}: {} / {}", key, existing, slug));
                }
                Some(_) => {}
                None => dictionary.insert(key, slug),
            }
        }

        if conflicts.is_empty() {
            Ok(dictionary)
        } else {
            Err(Error::DictionaryConflict(conflicts))
        }
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let file: DictionaryFile = serde_json::from_str(json)?;
        if file.version.trim().is_empty() {
            return Err(Error::Config("dictionary version is missing".to_string()));
        }
        Self::from_entries(&file.version, file.entries)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn insert(&mut self, key: String, slug: String) {
        let words = key.split(' ').count();
        self.max_phrase_words = self.max_phrase_words.max(words);
        self.phrases.entry(key).or_insert(slug);
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// 正規化済みフレーズの訳を取得
    pub fn get(&self, phrase: &str) -> Option<&str> {
        self.phrases.get(phrase).map(|s| s.as_str())
    }

    /// 先頭から最長一致するフレーズ（単語数, スラッグ）
    fn longest_match(&self, words: &[&str]) -> Option<(usize, &str)> {
        let longest = self.max_phrase_words.min(words.len());
        (1..=longest).rev().find_map(|len| {
            self.phrases
                .get(&words[..len].join(" "))
                .map(|slug| (len, slug.as_str()))
        })
    }

    /// 正規化済みテキストをスラッグに翻字する
    ///
    /// 長いフレーズを優先して置換し、訳の無いアラビア文字は除去する。
    /// 結果が空なら [`PLACEHOLDER_SLUG`] を返す。
    pub fn translate(&self, normalized: &str) -> String {
        let words: Vec<&str> = split_words(normalized).collect();
        let mut parts: Vec<String> = Vec::with_capacity(words.len());
        let mut i = 0;

        while i < words.len() {
            if let Some((len, slug)) = self.longest_match(&words[i..]) {
                parts.push(slug.to_string());
                i += len;
                continue;
            }

            let residue: String = words[i]
                .chars()
                .filter(|c| c.is_alphanumeric() && !is_arabic_script(*c))
                .flat_map(|c| c.to_lowercase())
                .collect();
            if !residue.is_empty() {
                parts.push(residue);
            }
            i += 1;
        }

        let slug = parts
            .iter()
            .flat_map(|p| p.split('-'))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("-");

        if slug.is_empty() {
            PLACEHOLDER_SLUG.to_string()
        } else {
            slug
        }
    }
}

/// 辞書エントリを正規化（キーは単語を空白で連結、スラッグはハイフンで連結）
fn prepare_entry(normalizer: &TextNormalizer, source: &str, slug: &str) -> Option<(String, String)> {
    let key = split_words(&normalizer.normalize(source))
        .collect::<Vec<_>>()
        .join(" ");
    let slug = split_words(&normalizer.normalize(slug))
        .collect::<Vec<_>>()
        .join("-");
    if key.is_empty() || slug.is_empty() {
        None
    } else {
        Some((key, slug))
    }
}
