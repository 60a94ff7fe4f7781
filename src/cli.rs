use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "menu-match")]
#[command(about = "メニュー項目と画像ファイルの照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 画像一覧の取得元（どちらか一方）
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct AssetSource {
    /// 画像フォルダ（直下のみ）
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    /// 画像ファイル名リスト（1行1件）
    #[arg(long)]
    pub asset_list: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// カタログと画像を照合してレポートJSONを出力
    Match {
        /// カタログファイル (csv/xlsx/json)
        #[arg(short, long, required = true)]
        catalog: PathBuf,

        #[command(flatten)]
        source: AssetSource,

        /// 上書きテーブルJSON
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// 翻字辞書JSON（省略時は組み込み辞書）
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// 出力JSONファイル
        #[arg(short, long, default_value = "match-report.json")]
        output: PathBuf,

        /// 自動一致として採用する最低スコア (0-100)
        #[arg(long)]
        threshold: Option<f64>,

        /// 低信頼とするスコアの上限 (0-100)
        #[arg(long)]
        confidence: Option<f64>,

        /// 同じ画像を複数項目に割り当てることを許可
        #[arg(long)]
        no_unique: bool,

        /// 語彙一致が無い項目をカテゴリから推測
        #[arg(long)]
        category_fallback: bool,

        /// 一意化ラウンドの上限
        #[arg(long)]
        max_rounds: Option<usize>,
    },

    /// レポートから書き戻し計画/SQL/Excelを生成
    Export {
        /// 入力レポートJSON
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (json/plan/sql/excel)
        #[arg(short, long, default_value = "plan")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 画像URLのベース（省略時は設定値）
        #[arg(long)]
        base_url: Option<String>,

        /// 低信頼・カテゴリ推測を除外
        #[arg(long)]
        confident_only: bool,
    },

    /// 画像名の正規化キー・翻字キーを一覧表示
    Translate {
        #[command(flatten)]
        source: AssetSource,

        /// 翻字辞書JSON（省略時は組み込み辞書）
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// 対応表JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 低信頼・未一致の項目を対話的に確認し、上書きテーブルに追記
    Review {
        /// 入力レポートJSON
        #[arg(required = true)]
        input: PathBuf,

        /// 上書きテーブルJSON（無ければ作成）
        #[arg(long, required = true)]
        overrides: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 画像URLのベースを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 既定値に戻す
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    #[default]
    Plan,
    Sql,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Plan => "plan.json",
            ExportFormat::Sql => "sql",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "plan" => Ok(ExportFormat::Plan),
            "sql" => Ok(ExportFormat::Sql),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            _ => Err(format!("Unknown format: {}. Use json, plan, sql, or excel", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Plan => write!(f, "plan"),
            ExportFormat::Sql => write!(f, "sql"),
            ExportFormat::Excel => write!(f, "excel"),
        }
    }
}
