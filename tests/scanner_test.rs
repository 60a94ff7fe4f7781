//! 画像一覧取得の統合テスト

use menu_match::scanner;
use tempfile::tempdir;

fn extensions() -> Vec<String> {
    vec!["jpg".to_string(), "png".to_string()]
}

/// 空のフォルダはエラーではなく空のリスト
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_assets(dir.path(), &extensions()).unwrap();
    assert!(result.is_empty());
}

/// 直下の画像だけを名前順で返す
#[test]
fn test_scan_top_level_images_sorted() {
    let dir = tempdir().unwrap();
    for name in ["mocha.png", "Latte.JPG", "notes.txt", "وافل فريز.jpg"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }
    std::fs::create_dir(dir.path().join("old")).unwrap();
    std::fs::write(dir.path().join("old").join("tea.jpg"), b"").unwrap();

    let result = scanner::scan_assets(dir.path(), &extensions()).unwrap();
    assert_eq!(result, vec!["Latte.JPG", "mocha.png", "وافل فريز.jpg"]);
}

/// リストは入力順を保ち、コメントと空行を飛ばす
#[test]
fn test_read_asset_list() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("assets.txt");
    std::fs::write(
        &path,
        "\u{FEFF}# menu-items bucket\r\nmango-mojito.jpg\r\n\r\nلاتيه.jpg\r\n  # old\r\nlatte.jpg\r\n",
    )
    .unwrap();

    let names = scanner::read_asset_list(&path).unwrap();
    assert_eq!(names, vec!["mango-mojito.jpg", "لاتيه.jpg", "latte.jpg"]);
}
