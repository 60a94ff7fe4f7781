//! Excel生成（CLI版）
//!
//! 共通ライブラリでレビュー用ワークブックを作り、ファイルに保存する。

use crate::error::Result;
use menu_match_common::export::excel_core::generate_report_workbook;
use menu_match_common::MatchReport;
use std::path::Path;

pub fn generate_excel(report: &MatchReport, output_path: &Path) -> Result<()> {
    let buffer = generate_report_workbook(report)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
