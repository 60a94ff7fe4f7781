//! menu-match: メニュー項目と画像ファイルの照合ツール
//!
//! 照合エンジン本体は `menu_match_common` にあり、
//! このクレートは入出力（カタログ・画像一覧・設定・書き出し・レビュー）を担う。

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod preview;
pub mod review;
pub mod scanner;

pub use menu_match_common as common;
