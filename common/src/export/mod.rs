//! レポート出力（CLIから利用）

#[cfg(feature = "excel")]
pub mod excel_core;
