//! 対話式レビュー
//!
//! 低信頼・未一致の項目を1件ずつ確認し、採用した画像を上書きテーブルの先頭に登録する。
//! 次回の照合ではその画像が Override として割り当てられる。

use crate::error::{MenuMatchError, Result};
use dialoguer::Input;
use menu_match_common::{MatchReport, MatchResult, OverrideFile, TextNormalizer};
use std::path::Path;

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    /// 現在の割り当てを採用
    Accept,
    /// 未使用画像から選択（0始まり）
    Choose(usize),
    /// この項目をスキップ
    Skip,
    /// 保存して終了
    Quit,
    /// 入力が不正
    Invalid,
}

/// 入力文字列をアクションに変換
///
/// 番号は画面表示どおり1始まりで受け付ける。
pub fn parse_review_action(input: &str, has_current: bool, unused_count: usize) -> ReviewAction {
    match input.trim() {
        "a" | "A" if has_current => ReviewAction::Accept,
        "" | "s" | "S" => ReviewAction::Skip,
        "q" | "Q" => ReviewAction::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if (1..=unused_count).contains(&n) => ReviewAction::Choose(n - 1),
            _ => ReviewAction::Invalid,
        },
    }
}

/// 選択結果を上書きファイルに反映
pub fn apply_choice(file: &mut OverrideFile, result: &MatchResult, filename: &str, normalizer: &TextNormalizer) -> bool {
    if result.item_key.trim().is_empty() {
        return false;
    }
    file.prefer(&result.item_key, filename, normalizer);
    true
}

/// 入力できる操作の案内（未使用画像が無ければ番号選択を出さない）
pub fn action_prompt(has_current: bool, unused_count: usize) -> String {
    let mut options = Vec::new();
    if has_current {
        options.push("a:採用".to_string());
    }
    match unused_count {
        0 => {}
        1 => options.push("1:画像を選択".to_string()),
        n => options.push(format!("1-{}:画像を選択", n)),
    }
    options.push("s:スキップ".to_string());
    options.push("q:終了".to_string());

    format!("操作 ({})", options.join(" "))
}

fn prompt_action(has_current: bool, unused_count: usize) -> Result<ReviewAction> {
    let prompt = action_prompt(has_current, unused_count);

    loop {
        let input: String = Input::new()
            .with_prompt(&prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| MenuMatchError::Review(e.to_string()))?;

        match parse_review_action(&input, has_current, unused_count) {
            ReviewAction::Invalid => println!("  入力が不正です"),
            action => return Ok(action),
        }
    }
}

/// 対話式でレビュー
pub fn run_interactive_review(report_path: &Path, overrides_path: &Path) -> Result<()> {
    let report = MatchReport::from_file(report_path)?;
    let targets = report.review_targets();

    if targets.is_empty() {
        println!("✓ 確認が必要な項目はありません");
        return Ok(());
    }

    let normalizer = TextNormalizer::default();
    let mut file = OverrideFile::load_or_default(overrides_path)?;
    if file.version.is_empty() {
        file.version = "1".to_string();
    }
    let mut unused = report.unused_assets.clone();
    let mut accepted = 0;

    println!("🔎 確認が必要な項目: {}件", targets.len());
    println!("---\n");

    for (count, result) in targets.iter().enumerate() {
        println!(
            "[{}/{}] {} ({})",
            count + 1,
            targets.len(),
            result.item_key,
            result.item_id
        );
        match &result.asset_filename {
            Some(current) => println!("  現在: {} ({}, {:.0})", current, result.match_type, result.score),
            None => println!("  現在: 未一致"),
        }
        for (i, filename) in unused.iter().enumerate() {
            println!("  {:>3}) {}", i + 1, filename);
        }

        match prompt_action(result.asset_filename.is_some(), unused.len())? {
            ReviewAction::Accept => {
                if let Some(current) = &result.asset_filename {
                    if apply_choice(&mut file, result, current, &normalizer) {
                        accepted += 1;
                        println!("  → {} を登録\n", current);
                    }
                }
            }
            ReviewAction::Choose(index) => {
                let filename = unused.remove(index);
                if apply_choice(&mut file, result, &filename, &normalizer) {
                    accepted += 1;
                    println!("  → {} を登録\n", filename);
                } else {
                    println!("  → 項目名が空のため登録できません\n");
                }
            }
            ReviewAction::Skip | ReviewAction::Invalid => {
                println!("  → スキップ\n");
            }
            ReviewAction::Quit => {
                println!("保存して終了します...");
                break;
            }
        }
    }

    file.save(overrides_path)?;
    println!("\n✓ {}件を上書きテーブルに登録: {}", accepted, overrides_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use menu_match_common::MatchType;

    #[test]
    fn test_parse_review_action() {
        assert_eq!(parse_review_action("a", true, 3), ReviewAction::Accept);
        assert_eq!(parse_review_action("a", false, 3), ReviewAction::Invalid);
        assert_eq!(parse_review_action("", true, 3), ReviewAction::Skip);
        assert_eq!(parse_review_action(" 2 ", true, 3), ReviewAction::Choose(1));
        assert_eq!(parse_review_action("4", true, 3), ReviewAction::Invalid);
        assert_eq!(parse_review_action("0", true, 3), ReviewAction::Invalid);
        assert_eq!(parse_review_action("q", false, 0), ReviewAction::Quit);
    }

    #[test]
    fn test_action_prompt_hides_empty_choice() {
        assert_eq!(action_prompt(true, 0), "操作 (a:採用 s:スキップ q:終了)");
        assert_eq!(action_prompt(false, 0), "操作 (s:スキップ q:終了)");
        assert_eq!(action_prompt(false, 1), "操作 (1:画像を選択 s:スキップ q:終了)");
        assert_eq!(action_prompt(true, 3), "操作 (a:採用 1-3:画像を選択 s:スキップ q:終了)");
        assert_eq!(parse_review_action("1", true, 0), ReviewAction::Invalid);
    }

    #[test]
    fn test_apply_choice() {
        let normalizer = TextNormalizer::default();
        let mut file = OverrideFile::default();
        let result = MatchResult {
            item_id: "1".into(),
            item_key: "لاتيه".into(),
            asset_filename: None,
            score: 0.0,
            match_type: MatchType::None,
        };

        assert!(apply_choice(&mut file, &result, "latte.jpg", &normalizer));
        assert_eq!(file.entries[0].candidate_filenames, vec!["latte.jpg".to_string()]);

        let blank = MatchResult::unmatched("2", "");
        assert!(!apply_choice(&mut file, &blank, "x.jpg", &normalizer));
        assert_eq!(file.entries.len(), 1);
    }
}
