//! 画像一覧の取得
//!
//! フォルダ直下の画像ファイル名、またはファイル名を1行ずつ並べたテキストから
//! 照合用の画像名リストを作る。ファイルの中身は読まない。

use crate::error::{MenuMatchError, Result};
use std::path::Path;
use walkdir::WalkDir;

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// フォルダ直下の画像ファイル名（名前順）
pub fn scan_assets(folder: &Path, extensions: &[String]) -> Result<Vec<String>> {
    if !folder.is_dir() {
        return Err(MenuMatchError::FolderNotFound(folder.display().to_string()));
    }

    let mut filenames: Vec<String> = WalkDir::new(folder)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), extensions))
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();

    // ファイル名でソート
    filenames.sort();

    Ok(filenames)
}

/// 画像名リスト（1行1件、空行と # で始まる行は無視）
///
/// ストレージの一覧出力をそのまま渡せるよう、入力順を保つ。
pub fn read_asset_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(MenuMatchError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    Ok(parse_asset_list(&content))
}

pub fn parse_asset_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_start_matches('\u{FEFF}').trim_end_matches('\r'))
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_extension() {
        let extensions = vec!["jpg".to_string(), "png".to_string()];
        assert!(has_extension(Path::new("a.jpg"), &extensions));
        assert!(has_extension(Path::new("a.JPG"), &extensions));
        assert!(!has_extension(Path::new("a.txt"), &extensions));
        assert!(!has_extension(Path::new("noext"), &extensions));
    }

    #[test]
    fn test_parse_asset_list() {
        let content = "\u{FEFF}latte.jpg\r\n\n# comment\nموهيتو مانجو .jpg\n  \n";
        assert_eq!(
            parse_asset_list(content),
            vec!["latte.jpg".to_string(), "موهيتو مانجو .jpg".to_string()]
        );
    }
}
