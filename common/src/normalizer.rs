//! テキスト正規化
//!
//! アラビア語・トルコ語・英語の名称を比較用の正規形に変換する。
//!
//! ## 処理内容
//! 1. タシュキール（母音記号）・タトウィール・ラテン結合文字の除去
//! 2. アリフ異体字（أ إ آ ٱ）→ ا、ة → ه、ى → ي
//! 3. アラビア・インド数字 → ASCII数字
//! 4. 小文字化とトルコ語文字の畳み込み（ç ş ğ ı ö ü）
//! 5. 語中のアポストロフィは削除（Chef's → chefs）、それ以外の許可リスト外の記号は区切り空白に置換
//! 6. 連続空白の圧縮と前後トリム
//!
//! `normalize(normalize(x)) == normalize(x)` が常に成り立つ。

const TATWEEL: char = '\u{0640}';
const PLAIN_ALEF: char = '\u{0627}';

/// アラビア語の発音記号・注釈記号
fn is_arabic_mark(c: char) -> bool {
    matches!(c,
        '\u{0610}'..='\u{061A}'
        | '\u{064B}'..='\u{065F}'
        | '\u{0670}'
        | '\u{06D6}'..='\u{06ED}')
}

/// ラテン文字の結合記号（İ の小文字化で出る U+0307 など）
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// 語をつなげたまま消す記号
fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '`' | '\u{2018}' | '\u{2019}')
}

/// アラビア文字ブロックに属するか
pub fn is_arabic_script(c: char) -> bool {
    matches!(c,
        '\u{0600}'..='\u{06FF}'
        | '\u{0750}'..='\u{077F}'
        | '\u{08A0}'..='\u{08FF}'
        | '\u{FB50}'..='\u{FDFF}'
        | '\u{FE70}'..='\u{FEFF}')
}

/// 表記揺れとなる文字を代表文字に寄せる
fn fold_char(c: char) -> char {
    match c {
        '\u{0623}' | '\u{0625}' | '\u{0622}' | '\u{0671}' => PLAIN_ALEF,
        '\u{0629}' => '\u{0647}', // ة → ه
        '\u{0649}' => '\u{064A}', // ى → ي
        '\u{0660}'..='\u{0669}' => {
            char::from_digit(c as u32 - 0x0660, 10).unwrap_or(c)
        }
        '\u{06F0}'..='\u{06F9}' => {
            char::from_digit(c as u32 - 0x06F0, 10).unwrap_or(c)
        }
        'ç' => 'c',
        'ş' => 's',
        'ğ' => 'g',
        'ı' => 'i',
        'ö' => 'o',
        'ü' => 'u',
        _ => c,
    }
}

/// テキスト正規化器
///
/// 文字・数字・内部の空白は常に保持する。それ以外の記号は
/// `allowed_symbols` に含まれるものだけ残す（既定はハイフンのみ）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNormalizer {
    allowed_symbols: Vec<char>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            allowed_symbols: vec!['-'],
        }
    }
}

impl TextNormalizer {
    pub fn with_allowed_symbols(symbols: &[char]) -> Self {
        Self {
            allowed_symbols: symbols
                .iter()
                .copied()
                .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
                .collect(),
        }
    }

    pub fn allowed_symbols(&self) -> &[char] {
        &self.allowed_symbols
    }

    fn is_allowed_symbol(&self, c: char) -> bool {
        self.allowed_symbols.contains(&c)
    }

    /// 文字列を正規化する
    pub fn normalize(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut pending_space = false;

        for raw in text.chars() {
            if raw == TATWEEL || is_arabic_mark(raw) {
                continue;
            }

            for lower in raw.to_lowercase() {
                if is_combining_mark(lower) || is_arabic_mark(lower) {
                    continue;
                }
                let c = fold_char(lower);

                if c.is_alphanumeric() || self.is_allowed_symbol(c) {
                    if pending_space && !result.is_empty() {
                        result.push(' ');
                    }
                    pending_space = false;
                    result.push(c);
                } else if is_apostrophe(c) {
                    continue;
                } else {
                    // 空白・禁止記号はどちらも区切りになる
                    pending_space = true;
                }
            }
        }

        result
            .trim_matches(|c: char| c == ' ' || self.is_allowed_symbol(c))
            .to_string()
    }
}

/// 既定の正規化器で正規化する
pub fn normalize(text: &str) -> String {
    TextNormalizer::default().normalize(text)
}

/// 空白・ハイフンで単語に分割
pub fn split_words(key: &str) -> impl Iterator<Item = &str> {
    key.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tashkeel_and_tatweel() {
        assert_eq!(normalize("قَهْوَة"), "قهوه");
        assert_eq!(normalize("شـــاي"), "شاي");
    }

    #[test]
    fn test_unifies_alef_variants() {
        assert_eq!(normalize("أناناس"), "اناناس");
        assert_eq!(normalize("إسبريسو"), "اسبريسو");
        assert_eq!(normalize("آيس"), "ايس");
    }

    #[test]
    fn test_teh_marbuta_and_alef_maqsura() {
        assert_eq!(normalize("كيكة"), "كيكه");
        assert_eq!(normalize("حلوى"), "حلوي");
    }

    #[test]
    fn test_case_folds_latin_and_turkish() {
        assert_eq!(normalize("Turkish COFFEE"), "turkish coffee");
        assert_eq!(normalize("Türk Kahvesi"), "turk kahvesi");
        assert_eq!(normalize("Çilekli Şeftali"), "cilekli seftali");
        assert_eq!(normalize("İÇECEK"), "icecek");
    }

    #[test]
    fn test_punctuation_becomes_separator() {
        assert_eq!(normalize("قهوة تركية+عربية"), "قهوه تركيه عربيه");
        assert_eq!(normalize("Mango_Mojito!!"), "mango mojito");
        assert_eq!(normalize("  espresso,  (double) "), "espresso double");
    }

    #[test]
    fn test_apostrophes_removed_in_place() {
        assert_eq!(normalize("Chef's Special"), "chefs special");
        assert_eq!(normalize("Nana\u{2019}s Tea"), "nanas tea");
        assert_eq!(normalize("o'clock/tea"), "oclock tea");
        assert_eq!(normalize("' latte '"), "latte");
    }

    #[test]
    fn test_hyphens_kept_inside_trimmed_outside() {
        assert_eq!(normalize("mango-mojito"), "mango-mojito");
        assert_eq!(normalize("- latte -"), "latte");
        assert_eq!(normalize("--iced--"), "iced");
    }

    #[test]
    fn test_arabic_digits() {
        assert_eq!(normalize("في ٦٠"), "في 60");
        assert_eq!(normalize("۷ اپ"), "7 اپ");
    }

    #[test]
    fn test_control_characters_and_empty() {
        assert_eq!(normalize("latte\u{0007}\tmacchiato\n"), "latte macchiato");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("+++"), "");
    }

    #[test]
    fn test_custom_allowed_symbols() {
        let normalizer = TextNormalizer::with_allowed_symbols(&['-', '&', 'a']);
        assert_eq!(normalizer.allowed_symbols(), &['-', '&']);
        assert_eq!(normalizer.normalize("Tea & Cake"), "tea & cake");
        assert_eq!(normalize("Tea & Cake"), "tea cake");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "قَهْوَةٌ تُرْكِيَّةٌ",
            "  موهيتو   مانجو .jpg",
            "Çilekli-Smoothie (2)",
            "İstanbul ☕ Latte",
            "--a - b--",
            "Chef's  'Special'",
            "آيس  كراميل - مكياتو",
            "\u{0627}\u{0653}",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_split_words() {
        let words: Vec<&str> = split_words("smoothie-strawberry  mix").collect();
        assert_eq!(words, vec!["smoothie", "strawberry", "mix"]);
        assert_eq!(split_words("").count(), 0);
    }
}
