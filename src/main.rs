use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use menu_match::{catalog, cli, config, error, export, preview, review, scanner};
use menu_match_common::{Dictionary, KeyDeriver, MatchReport, OverrideTable, Reconciler, TextNormalizer};
use cli::{AssetSource, Cli, Commands};
use config::Config;
use error::{MenuMatchError, Result};
use std::path::Path;
use std::time::Duration;

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// フォルダまたはリストから画像名を集める
fn load_asset_names(source: &AssetSource, config: &Config) -> Result<Vec<String>> {
    let (filenames, origin) = match (&source.assets, &source.asset_list) {
        (Some(folder), _) => (scanner::scan_assets(folder, &config.asset_extensions)?, folder),
        (None, Some(list)) => (scanner::read_asset_list(list)?, list),
        (None, None) => {
            return Err(MenuMatchError::Config("--assets か --asset-list を指定してください".into()))
        }
    };

    if filenames.is_empty() {
        return Err(MenuMatchError::NoAssetsFound(origin.display().to_string()));
    }
    Ok(filenames)
}

fn load_key_deriver(dictionary: Option<&Path>) -> Result<KeyDeriver> {
    match dictionary {
        Some(path) => {
            let dictionary = Dictionary::from_file(path)?;
            println!("- 辞書: {} (v{}, {}件)", path.display(), dictionary.version(), dictionary.len());
            Ok(KeyDeriver::new(TextNormalizer::default(), dictionary))
        }
        None => Ok(KeyDeriver::builtin()),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

fn print_summary(report: &MatchReport) {
    let counts = &report.counts;
    println!("  項目: {}件", counts.items);
    println!("  割り当て: {}件", counts.assigned);
    println!(
        "    override {} / exact {} / substring {} / wordOverlap {} / categoryGuess {}",
        counts.by_type.overrides,
        counts.by_type.exact,
        counts.by_type.substring,
        counts.by_type.word_overlap,
        counts.by_type.category_guess
    );
    println!("  未一致: {}件", counts.unmatched);
    println!("  低信頼: {}件", counts.low_confidence);
    println!("  未使用画像: {}件", counts.unused_assets);

    if !report.warnings.is_empty() {
        println!("\n⚠ 警告 {}件", report.warnings.len());
        for warning in &report.warnings {
            println!("  {}", warning);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Match {
            catalog: catalog_path,
            source,
            overrides,
            dictionary,
            output,
            threshold,
            confidence,
            no_unique,
            category_fallback,
            max_rounds,
        } => {
            println!("🍽 menu-match - 照合\n");

            // 1. カタログ
            println!("[1/3] カタログを読み込み中...");
            let items = catalog::load_catalog(&catalog_path)?;
            println!("✔ {}件の項目\n", items.len());

            // 2. 画像一覧
            println!("[2/3] 画像一覧を取得中...");
            let filenames = load_asset_names(&source, &config)?;
            println!("✔ {}件の画像\n", filenames.len());

            // 3. 照合
            println!("[3/3] 照合中...");
            let mut options = config.options.clone();
            if let Some(value) = threshold {
                options.score_threshold = value;
            }
            if let Some(value) = confidence {
                options.confidence_threshold = value;
            }
            if no_unique {
                options.enforce_unique_assets = false;
            }
            if category_fallback {
                options.allow_fallback_category_guess = true;
            }
            if let Some(value) = max_rounds {
                options.max_resolution_rounds = value;
            }

            let reconciler = Reconciler::new(load_key_deriver(dictionary.as_deref())?, options)?;
            let pool = reconciler.build_pool(&filenames, &config.exclude_asset_patterns);
            let table = match &overrides {
                Some(path) => {
                    let table = OverrideTable::from_file(path, reconciler.keys().normalizer())?;
                    println!("- 上書きテーブル: {}件", table.len());
                    table
                }
                None => reconciler.override_table(Vec::new()),
            };

            let pb = spinner("照合中");
            let report = reconciler.reconcile(&items, &pool, &table);
            pb.finish_and_clear();
            println!("✔ 照合完了\n");

            print_summary(&report);

            report.save(&output)?;
            println!("\n✔ レポートを保存: {}", output.display());
            println!("  SHA-256: {}", export::report_digest(&report)?);

            println!("\n✅ 完了");
        }

        Commands::Export {
            input,
            format,
            output,
            base_url,
            confident_only,
        } => {
            println!("📄 menu-match - エクスポート\n");

            let report = MatchReport::from_file(&input)?;
            let output_path = export::output_path_for_format(&input, output.as_deref(), &format);
            let options = export::ExportOptions {
                base_url: base_url.or(config.asset_base_url),
                confident_only,
            };

            export::export_report(&report, &format, &output_path, &options)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::Translate {
            source,
            dictionary,
            output,
        } => {
            println!("🔤 menu-match - キー一覧\n");

            let filenames = load_asset_names(&source, &config)?;
            let keys = load_key_deriver(dictionary.as_deref())?;
            let previews = preview::preview_keys(&filenames, &keys);
            preview::print_preview(&previews);

            let untranslated = previews.iter().filter(|p| p.untranslated).count();
            println!("\n{}件中 {}件は辞書で翻字できませんでした", previews.len(), untranslated);

            if let Some(path) = output {
                preview::save_preview(&previews, &path)?;
                println!("✔ 対応表を保存: {}", path.display());
            }
        }

        Commands::Review { input, overrides } => {
            println!("🔎 menu-match - レビュー\n");
            review::run_interactive_review(&input, &overrides)?;
        }

        Commands::Config {
            show,
            set_base_url,
            reset,
        } => {
            let mut config = config;

            if reset {
                config.reset()?;
                println!("✔ 設定を既定値に戻しました");
            }

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if show {
                let options = &config.options;
                println!("設定: {}", Config::config_path()?.display());
                println!("  最低スコア: {}", options.score_threshold);
                println!("  低信頼の上限: {}", options.confidence_threshold);
                println!("  画像の一意化: {}", if options.enforce_unique_assets { "有効" } else { "無効" });
                println!(
                    "  カテゴリ推測: {}",
                    if options.allow_fallback_category_guess { "有効" } else { "無効" }
                );
                println!("  一意化ラウンド上限: {}", options.max_resolution_rounds);
                println!("  ベースURL: {}", config.asset_base_url.as_deref().unwrap_or("未設定"));
                println!("  除外パターン: {}", config.exclude_asset_patterns.join(", "));
                println!("  拡張子: {}", config.asset_extensions.join(", "));
            }
        }
    }

    Ok(())
}
