//! 書き戻し計画・SQL・Excel出力の統合テスト

use menu_match::cli::ExportFormat;
use menu_match::export::{self, plan, ExportOptions};
use menu_match_common::{reconcile, CatalogItem, MatchReport, MatchType, ReconcileOptions};
use tempfile::tempdir;

fn sample_report() -> MatchReport {
    let catalog = vec![
        CatalogItem::new("1", "", "Latte", "coffee"),
        CatalogItem::new("2", "", "Strawberry Smoothie", "cold"),
        CatalogItem::new("3", "", "Lotus Cheesecake Special", "cake"),
        CatalogItem::new("4", "", "Salep", "hot"),
    ];
    let pool: Vec<String> = [
        "latte.jpg",
        "smoothie-strawberry-2.jpg",
        "cheesecake lotus.jpg",
        "o'clock tea.jpg",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    reconcile(&catalog, &pool, &[], &ReconcileOptions::default()).unwrap()
}

#[test]
fn test_plan_lists_assignments_in_catalog_order() {
    let report = sample_report();
    let entries = plan::build_plan(&report, "https://cdn.example.com/menu/", false);

    let ids: Vec<&str> = entries.iter().map(|e| e.item_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(entries[0].image_url, "https://cdn.example.com/menu/latte.jpg");
    assert_eq!(
        entries[2].image_url,
        "https://cdn.example.com/menu/cheesecake%20lotus.jpg"
    );
    assert_eq!(entries[0].match_type, MatchType::Exact);
}

#[test]
fn test_confident_only_drops_low_confidence() {
    let report = sample_report();
    // 3語中2語一致で 40 点
    assert_eq!(report.low_confidence.len(), 1);
    assert_eq!(report.low_confidence[0].item_id, "3");

    let entries = plan::build_plan(&report, "https://cdn.example.com/menu", true);
    let ids: Vec<&str> = entries.iter().map(|e| e.item_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[test]
fn test_plan_json_shape() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("report.plan.json");
    let options = ExportOptions {
        base_url: Some("https://cdn.example.com/menu".into()),
        confident_only: false,
    };
    export::export_report(&sample_report(), &ExportFormat::Plan, &output, &options).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value[0]["itemId"], "1");
    assert_eq!(value[0]["assetFilename"], "latte.jpg");
    assert_eq!(value[0]["imageUrl"], "https://cdn.example.com/menu/latte.jpg");
    assert_eq!(value[0]["matchType"], "exact");
    assert_eq!(value[1]["matchType"], "wordOverlap");
}

#[test]
fn test_sql_script_quotes_values() {
    let entries = vec![plan::WriteBackEntry {
        item_id: "it's".into(),
        asset_filename: "tea.jpg".into(),
        image_url: "https://cdn.example.com/o'clock/tea.jpg".into(),
        match_type: MatchType::Override,
        score: 100.0,
    }];

    let sql = plan::sql_script(&entries);
    assert!(sql.contains(
        "UPDATE items SET image_url = 'https://cdn.example.com/o''clock/tea.jpg' WHERE id = 'it''s'; -- override 100"
    ));
    assert!(sql.ends_with("-- Total UPDATE statements: 1\n"));
}

#[test]
fn test_export_sql_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("updates.sql");
    let options = ExportOptions {
        base_url: Some("https://cdn.example.com/menu".into()),
        confident_only: true,
    };
    export::export_report(&sample_report(), &ExportFormat::Sql, &output, &options).unwrap();

    let sql = std::fs::read_to_string(&output).unwrap();
    assert!(sql.contains("WHERE id = '1'; -- exact 100"));
    assert!(sql.contains("-- Total UPDATE statements: 2"));
    assert!(!sql.contains("WHERE id = '3'"));
}

#[test]
fn test_export_json_and_excel() {
    let dir = tempdir().unwrap();
    let report = sample_report();
    let options = ExportOptions::default();

    let json_path = dir.path().join("copy.json");
    export::export_report(&report, &ExportFormat::Json, &json_path, &options).unwrap();
    assert_eq!(MatchReport::from_file(&json_path).unwrap(), report);

    let xlsx_path = dir.path().join("report.xlsx");
    export::export_report(&report, &ExportFormat::Excel, &xlsx_path, &options).unwrap();
    let bytes = std::fs::read(&xlsx_path).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_output_path_for_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("match-report.json");

    assert_eq!(
        export::output_path_for_format(&input, None, &ExportFormat::Sql),
        dir.path().join("match-report.sql")
    );
    assert_eq!(
        export::output_path_for_format(&input, Some(dir.path()), &ExportFormat::Plan),
        dir.path().join("match-report.plan.json")
    );
}
