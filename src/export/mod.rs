pub mod excel;
pub mod plan;

use crate::cli::ExportFormat;
use crate::error::{MenuMatchError, Result};
use menu_match_common::MatchReport;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// レポートJSONのSHA-256（同じ入力なら同じ値）
pub fn report_digest(report: &MatchReport) -> Result<String> {
    let json = report.to_json()?;
    Ok(hex::encode(Sha256::digest(json.as_bytes())))
}

/// 出力パス（省略時は入力と同じ場所に拡張子を変えて出力）
pub fn output_path_for_format(input: &Path, output: Option<&Path>, format: &ExportFormat) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "report".to_string());
            path.join(format!("{}.{}", stem, format.extension()))
        }
        Some(path) => path.to_path_buf(),
        None => input.with_extension(format.extension()),
    }
}

/// エクスポート設定
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub base_url: Option<String>,
    pub confident_only: bool,
}

impl ExportOptions {
    fn require_base_url(&self) -> Result<&str> {
        self.base_url.as_deref().ok_or_else(|| {
            MenuMatchError::Export(
                "ベースURLが未設定です。--base-url か `menu-match config --set-base-url URL` で設定してください"
                    .into(),
            )
        })
    }
}

pub fn export_report(
    report: &MatchReport,
    format: &ExportFormat,
    output_path: &Path,
    options: &ExportOptions,
) -> Result<()> {
    match format {
        ExportFormat::Json => {
            println!("- JSONを書き出し中...");
            report.save(output_path)?;
        }
        ExportFormat::Plan => {
            println!("- 書き戻し計画を生成中...");
            let entries = plan::build_plan(report, options.require_base_url()?, options.confident_only);
            std::fs::write(output_path, serde_json::to_string_pretty(&entries)?)?;
            println!("  {}件", entries.len());
        }
        ExportFormat::Sql => {
            println!("- SQLを生成中...");
            let entries = plan::build_plan(report, options.require_base_url()?, options.confident_only);
            std::fs::write(output_path, plan::sql_script(&entries))?;
            println!("  {}件", entries.len());
        }
        ExportFormat::Excel => {
            println!("- Excelを生成中...");
            excel::generate_excel(report, output_path)?;
        }
    }

    println!("✔ 出力: {}", output_path.display());
    Ok(())
}
