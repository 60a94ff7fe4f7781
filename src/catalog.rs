//! カタログ読み込み
//!
//! CSV / Excel / JSON からメニュー項目を読み込む。
//! 列名は英語・アラビア語の別名を受け付ける（id, name_ar, name_tr, name_en, category）。

use crate::error::{MenuMatchError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use menu_match_common::{CatalogItem, LocalizedNames};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    NameAr,
    NameTr,
    NameEn,
    Category,
}

fn column_for(header: &str) -> Option<Column> {
    let header = header.trim_start_matches('\u{FEFF}').trim().to_lowercase();
    match header.as_str() {
        "id" | "item_id" | "itemid" => Some(Column::Id),
        "name_ar" | "ar" | "arabic" | "name" | "الاسم" | "اسم المادة" => Some(Column::NameAr),
        "name_tr" | "tr" | "turkish" | "الاسم التركي" => Some(Column::NameTr),
        "name_en" | "en" | "english" | "الاسم اللاتيني" => Some(Column::NameEn),
        "category" | "category_name" | "الفئة" | "القسم" => Some(Column::Category),
        _ => None,
    }
}

/// 列名 → 列番号
#[derive(Debug, Default)]
struct ColumnMap {
    id: Option<usize>,
    name_ar: Option<usize>,
    name_tr: Option<usize>,
    name_en: Option<usize>,
    category: Option<usize>,
}

impl ColumnMap {
    fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let mut map = Self::default();
        for (index, header) in headers.iter().enumerate() {
            let slot = match column_for(header.as_ref()) {
                Some(Column::Id) => &mut map.id,
                Some(Column::NameAr) => &mut map.name_ar,
                Some(Column::NameTr) => &mut map.name_tr,
                Some(Column::NameEn) => &mut map.name_en,
                Some(Column::Category) => &mut map.category,
                None => continue,
            };
            // 同じ列が2つあれば左側を使う
            slot.get_or_insert(index);
        }

        if map.id.is_none() {
            return Err(MenuMatchError::InvalidCatalog("id 列がありません".into()));
        }
        if map.name_ar.is_none() && map.name_en.is_none() {
            return Err(MenuMatchError::InvalidCatalog(
                "name_ar または name_en 列が必要です".into(),
            ));
        }
        Ok(map)
    }

    fn item_from_row<S: AsRef<str>>(&self, row: &[S]) -> Option<CatalogItem> {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .map(|s| s.as_ref().trim().to_string())
                .unwrap_or_default()
        };

        let id = cell(self.id);
        if id.is_empty() {
            return None;
        }

        Some(CatalogItem {
            id,
            names_by_locale: LocalizedNames {
                ar: cell(self.name_ar),
                tr: cell(self.name_tr),
                en: cell(self.name_en),
            },
            category: cell(self.category),
        })
    }
}

/// 表形式データから項目を作る（id が空の行は無視、重複 id は先勝ち）
fn items_from_table<S: AsRef<str>>(headers: &[S], rows: Vec<Vec<String>>) -> Result<Vec<CatalogItem>> {
    let map = ColumnMap::from_headers(headers)?;
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for (line, row) in rows.iter().enumerate() {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let Some(item) = map.item_from_row(row) else {
            log::warn!("{}行目: id が空のためスキップ", line + 2);
            continue;
        };
        if !seen.insert(item.id.clone()) {
            log::warn!("重複した id をスキップ: {}", item.id);
            continue;
        }
        items.push(item);
    }

    Ok(items)
}

fn csv_error(e: csv::Error) -> MenuMatchError {
    MenuMatchError::InvalidCatalog(format!("CSV読み込みエラー: {}", e))
}

/// CSV文字列から読み込み（クォート内の改行・カンマ・"" エスケープ対応）
pub fn from_csv_str(content: &str) -> Result<Vec<CatalogItem>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(String::from)
        .collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(MenuMatchError::InvalidCatalog("CSVが空です".into()));
    }

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(String::from).collect::<Vec<_>>())
                .map_err(csv_error)
        })
        .collect::<Result<Vec<_>>>()?;

    items_from_table(&headers, rows)
}

/// Excelの先頭シートから読み込み
pub fn from_workbook(path: &Path) -> Result<Vec<CatalogItem>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| MenuMatchError::InvalidCatalog(format!("Excel読み込みエラー: {}", e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| MenuMatchError::InvalidCatalog("シートがありません".into()))?
        .map_err(|e| MenuMatchError::InvalidCatalog(format!("シート読み込みエラー: {}", e)))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_str).collect::<Vec<_>>());
    let headers = rows
        .next()
        .ok_or_else(|| MenuMatchError::InvalidCatalog("シートが空です".into()))?;
    items_from_table(&headers, rows.collect())
}

fn cell_str(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn json_str(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// JSON配列から読み込み
///
/// `{id, namesByLocale: {ar, tr, en}, category}` 形式と、
/// データベースの行そのまま（`{id, name_ar, name_tr, name_en, category}`）の両方を受け付ける。
pub fn from_json_str(content: &str) -> Result<Vec<CatalogItem>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(content)?;
    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for value in values {
        let serde_json::Value::Object(object) = value else {
            return Err(MenuMatchError::InvalidCatalog("項目がオブジェクトではありません".into()));
        };

        if object.contains_key("namesByLocale") || object.contains_key("names") {
            let item: CatalogItem = serde_json::from_value(serde_json::Value::Object(object))?;
            let names = &item.names_by_locale;
            ensure_header(&mut headers, &["id", "name_ar", "name_tr", "name_en", "category"]);
            rows.push(row_for(
                &headers,
                &[
                    ("id", item.id.clone()),
                    ("name_ar", names.ar.clone()),
                    ("name_tr", names.tr.clone()),
                    ("name_en", names.en.clone()),
                    ("category", item.category.clone()),
                ],
            ));
        } else {
            let keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
            ensure_header(&mut headers, &keys);
            let fields: Vec<(&str, String)> =
                object.iter().map(|(k, v)| (k.as_str(), json_str(v))).collect();
            rows.push(row_for(&headers, &fields));
        }
    }

    if rows.is_empty() {
        return Ok(Vec::new());
    }
    items_from_table(&headers, rows)
}

fn ensure_header(headers: &mut Vec<String>, keys: &[&str]) {
    for key in keys {
        if !headers.iter().any(|h| h == key) {
            headers.push(key.to_string());
        }
    }
}

fn row_for(headers: &[String], fields: &[(&str, String)]) -> Vec<String> {
    headers
        .iter()
        .map(|h| {
            fields
                .iter()
                .find(|(k, _)| k == h)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        })
        .collect()
}

/// 拡張子で形式を判定して読み込み
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogItem>> {
    if !path.exists() {
        return Err(MenuMatchError::FileNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let items = match extension.as_str() {
        "csv" => from_csv_str(&std::fs::read_to_string(path)?)?,
        "xlsx" | "xlsm" | "xls" | "ods" => from_workbook(path)?,
        "json" => from_json_str(&std::fs::read_to_string(path)?)?,
        _ => {
            return Err(MenuMatchError::InvalidCatalog(format!(
                "未対応の形式です: {} (csv/xlsx/json)",
                path.display()
            )))
        }
    };

    log::info!("カタログ読み込み: {}件 ({})", items.len(), path.display());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_quotes_and_escapes() {
        let items = from_csv_str(
            "id,name_ar,name_tr,name_en\n1,\"قهوة تركية\",\"Türk kahvesi, sade\",\"Say \"\"hi\"\"\"\n",
        )
        .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].names_by_locale.ar, "قهوة تركية");
        assert_eq!(items[0].names_by_locale.tr, "Türk kahvesi, sade");
        assert_eq!(items[0].names_by_locale.en, r#"Say "hi""#);
    }

    #[test]
    fn test_csv_multiline_quoted_field() {
        let items = from_csv_str(
            "id,name_ar,name_en,category\n1,\"شاي\nبالنعناع\",Mint Tea,hot\n2,لاتيه,Latte,hot\n",
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "1");
        assert_eq!(items[0].names_by_locale.ar, "شاي\nبالنعناع");
        assert_eq!(items[0].names_by_locale.en, "Mint Tea");
        assert_eq!(items[1].id, "2");
        assert_eq!(items[1].names_by_locale.en, "Latte");
    }

    #[test]
    fn test_csv_short_rows_and_empty_input() {
        let items = from_csv_str("id,name_ar,name_en,category\n1,شاي\n").unwrap();
        assert_eq!(items[0].names_by_locale.ar, "شاي");
        assert_eq!(items[0].names_by_locale.en, "");

        assert!(matches!(from_csv_str(""), Err(MenuMatchError::InvalidCatalog(_))));
    }

    #[test]
    fn test_column_aliases() {
        assert_eq!(column_for("\u{FEFF}ID"), Some(Column::Id));
        assert_eq!(column_for("اسم المادة"), Some(Column::NameAr));
        assert_eq!(column_for("الاسم اللاتيني"), Some(Column::NameEn));
        assert_eq!(column_for(" English "), Some(Column::NameEn));
        assert_eq!(column_for("price"), None);
    }

    #[test]
    fn test_missing_id_column() {
        let result = from_csv_str("name_ar,name_en\nشاي,Tea\n");
        assert!(matches!(result, Err(MenuMatchError::InvalidCatalog(_))));
    }

    #[test]
    fn test_json_nested_and_flat() {
        let json = r#"[
            {"id": "1", "namesByLocale": {"ar": "شاي", "en": "Tea"}, "category": "hot"},
            {"id": 2, "name_ar": "لاتيه", "name_en": "Latte", "price": 3.5}
        ]"#;
        let items = from_json_str(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].names_by_locale.en, "Tea");
        assert_eq!(items[0].category, "hot");
        assert_eq!(items[1].id, "2");
        assert_eq!(items[1].names_by_locale.ar, "لاتيه");
    }
}
