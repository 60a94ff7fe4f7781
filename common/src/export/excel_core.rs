//! Excel生成（共通ライブラリ）
//!
//! 照合レポートをレビュー用ワークブックに書き出す。
//! シート: Assignments / LowConfidence / Unmatched / UnusedAssets / Warnings

use crate::error::{Error, Result};
use crate::report::{MatchReport, ReportWarning};
use crate::types::MatchResult;
use rust_xlsxwriter::*;

const RESULT_HEADERS: [(&str, f64); 5] = [
    ("itemId", 12.0),
    ("itemKey", 32.0),
    ("assetFilename", 40.0),
    ("matchType", 16.0),
    ("score", 10.0),
];

fn excel_error(context: &str, e: XlsxError) -> Error {
    Error::Excel(format!("{}: {}", context, e))
}

struct Formats {
    header: Format,
    score: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(0x333333))
                .set_background_color(Color::RGB(0xF5F5F5))
                .set_border(FormatBorder::Hair)
                .set_border_color(Color::RGB(0xAAAAAA)),
            score: Format::new().set_num_format("0.0"),
        }
    }
}

/// 見出し行と列幅を設定したシートを追加
fn add_sheet<'a>(
    workbook: &'a mut Workbook,
    name: &str,
    headers: &[(&str, f64)],
    formats: &Formats,
) -> Result<&'a mut Worksheet> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(name)
        .map_err(|e| excel_error("シート名設定エラー", e))?;

    for (col, (label, width)) in headers.iter().enumerate() {
        let col = col as u16;
        worksheet
            .set_column_width(col, *width)
            .map_err(|e| excel_error("列幅設定エラー", e))?;
        worksheet
            .write_string_with_format(0, col, *label, &formats.header)
            .map_err(|e| excel_error("見出し書き込みエラー", e))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| excel_error("ウィンドウ枠固定エラー", e))?;

    Ok(worksheet)
}

fn write_results(
    workbook: &mut Workbook,
    name: &str,
    results: &[MatchResult],
    formats: &Formats,
) -> Result<()> {
    let worksheet = add_sheet(workbook, name, &RESULT_HEADERS, formats)?;

    for (i, result) in results.iter().enumerate() {
        let row = i as u32 + 1;
        let cells = [
            result.item_id.as_str(),
            result.item_key.as_str(),
            result.asset_filename.as_deref().unwrap_or(""),
            result.match_type.as_str(),
        ];
        for (col, value) in cells.iter().enumerate() {
            worksheet
                .write_string(row, col as u16, *value)
                .map_err(|e| excel_error("セル書き込みエラー", e))?;
        }
        worksheet
            .write_number_with_format(row, 4, result.score, &formats.score)
            .map_err(|e| excel_error("スコア書き込みエラー", e))?;
    }

    Ok(())
}

fn write_list(
    workbook: &mut Workbook,
    name: &str,
    header: (&str, f64),
    values: &[String],
    formats: &Formats,
) -> Result<()> {
    let worksheet = add_sheet(workbook, name, &[header], formats)?;
    for (i, value) in values.iter().enumerate() {
        worksheet
            .write_string(i as u32 + 1, 0, value)
            .map_err(|e| excel_error("セル書き込みエラー", e))?;
    }
    Ok(())
}

fn write_warnings(workbook: &mut Workbook, warnings: &[ReportWarning], formats: &Formats) -> Result<()> {
    let headers = [("kind", 24.0), ("itemId", 12.0), ("message", 80.0)];
    let worksheet = add_sheet(workbook, "Warnings", &headers, formats)?;

    for (i, warning) in warnings.iter().enumerate() {
        let row = i as u32 + 1;
        let kind = match warning {
            ReportWarning::OverrideUnavailable { .. } => "overrideUnavailable",
            ReportWarning::ResolutionCapReached { .. } => "resolutionCapReached",
        };
        let message = warning.to_string();
        for (col, value) in [kind, warning.item_id(), message.as_str()].iter().enumerate() {
            worksheet
                .write_string(row, col as u16, *value)
                .map_err(|e| excel_error("セル書き込みエラー", e))?;
        }
    }
    Ok(())
}

/// レポートをExcelバッファに生成
pub fn generate_report_workbook(report: &MatchReport) -> Result<Vec<u8>> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    write_results(&mut workbook, "Assignments", &report.assignments, &formats)?;
    write_results(&mut workbook, "LowConfidence", &report.low_confidence, &formats)?;
    write_list(&mut workbook, "Unmatched", ("itemId", 16.0), &report.unmatched, &formats)?;
    write_list(
        &mut workbook,
        "UnusedAssets",
        ("filename", 48.0),
        &report.unused_assets,
        &formats,
    )?;
    write_warnings(&mut workbook, &report.warnings, &formats)?;

    workbook
        .save_to_buffer()
        .map_err(|e| excel_error("Excel保存エラー", e))
}
