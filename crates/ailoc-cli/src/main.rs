use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use ailoc_backend::{create_translator, BackendConfig};
use ailoc_config::AilocConfig;
use ailoc_services::{plan_translations, translate_all, RunStats, TranslateOptions};
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::{debug, error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "ailoc", version, about = "Translate localization files with an AI backend")]
struct Cli {
    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate discovered source files into the target languages
    Translate {
        /// Source language code (default from config)
        #[arg(long)]
        source: Option<String>,
        /// Comma-separated target language codes (default from config)
        #[arg(long)]
        target: Option<String>,
        /// Overwrite existing translations instead of skipping them
        #[arg(long, default_value_t = false)]
        force: bool,
        /// List planned jobs without calling the backend or writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// List the source-language files a translate run would pick up
    Scan {
        /// Source language code (default from config)
        #[arg(long)]
        source: Option<String>,
    },
}

trait Runnable {
    fn run(self, cfg: &AilocConfig, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, cfg: &AilocConfig, use_color: bool) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        info!("starting command: {}", cmd_name);

        let result = match self {
            Commands::Translate {
                source,
                target,
                force,
                dry_run,
            } => run_translate(cfg, source, target, force, dry_run, use_color),
            Commands::Scan { source } => run_scan(cfg, source),
        };

        match &result {
            Ok(_) => info!("finished command: {}", cmd_name),
            Err(e) => error!("command {} failed: {:?}", cmd_name, e),
        }
        result
    }
}

fn build_options(
    cfg: &AilocConfig,
    source: Option<String>,
    target: Option<String>,
    force: bool,
) -> Result<TranslateOptions, String> {
    let source_lang = source
        .or_else(|| cfg.source_lang.clone())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            "Source language is not specified. Set it in ailoc.toml or use --source.".to_string()
        })?;

    let target_langs: Vec<String> = match target {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => cfg.target_langs.clone().unwrap_or_default(),
    };
    if target_langs.is_empty() {
        return Err(
            "Target languages are not specified. Set them in ailoc.toml or use --target."
                .to_string(),
        );
    }

    Ok(TranslateOptions {
        source_lang,
        target_langs,
        lang_dirs: cfg.lang_dirs().iter().map(PathBuf::from).collect(),
        include_patterns: cfg.include_patterns(),
        exclude_patterns: cfg.exclude_patterns(),
        force_overwrite: force,
    })
}

fn run_translate(
    cfg: &AilocConfig,
    source: Option<String>,
    target: Option<String>,
    force: bool,
    dry_run: bool,
    use_color: bool,
) -> Result<()> {
    let opts = match build_options(cfg, source, target, force) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("Error: {msg}");
            std::process::exit(2);
        }
    };

    println!("Source language: {}", opts.source_lang);
    println!("Target languages: {}", opts.target_langs.join(", "));
    if opts.force_overwrite {
        println!("Force overwrite is enabled. Existing translations will be overwritten.");
    }

    if dry_run {
        let plan = plan_translations(&opts)?;
        println!("DRY-RUN plan ({} file(s)):", plan.files.len());
        for job in &plan.jobs {
            let note = if job.skip_existing {
                "  [skip: target exists]"
            } else {
                ""
            };
            println!(
                "  {} -> {}{}",
                job.source.display(),
                job.target.display(),
                note
            );
        }
        println!("TOTAL: {} job(s)", plan.jobs.len());
        return Ok(());
    }

    let backend_cfg = BackendConfig {
        api_key: cfg.api_key(),
        model: chatgpt_str(cfg, |c| c.model.clone(), ailoc_config::DEFAULT_MODEL),
        temperature: cfg
            .chatgpt
            .as_ref()
            .and_then(|c| c.temperature)
            .unwrap_or(ailoc_config::DEFAULT_TEMPERATURE),
        api_url: chatgpt_str(cfg, |c| c.api_url.clone(), ailoc_config::DEFAULT_API_URL),
        timeout: Duration::from_secs(
            cfg.chatgpt
                .as_ref()
                .and_then(|c| c.timeout_secs)
                .unwrap_or(ailoc_config::DEFAULT_TIMEOUT_SECS),
        ),
    };
    debug!(driver = cfg.driver(), model = %backend_cfg.model, "constructing backend");

    let translator = match create_translator(cfg.driver(), &backend_cfg) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    println!("Searching for translation files...");
    let stats = translate_all(translator.as_ref(), &opts)?;
    print_summary(&stats, use_color);

    if stats.failed > 0 {
        eprintln!("Some translations failed. Check the logs for details.");
        std::process::exit(1);
    }
    Ok(())
}

fn chatgpt_str(
    cfg: &AilocConfig,
    pick: fn(&ailoc_config::ChatGptCfg) -> Option<String>,
    default: &str,
) -> String {
    cfg.chatgpt
        .as_ref()
        .and_then(pick)
        .unwrap_or_else(|| default.to_string())
}

fn run_scan(cfg: &AilocConfig, source: Option<String>) -> Result<()> {
    // Target languages are irrelevant for discovery; reuse the validation
    // for the source language only.
    let source_lang = source
        .or_else(|| cfg.source_lang.clone())
        .filter(|s| !s.is_empty());
    let Some(source_lang) = source_lang else {
        eprintln!("Error: Source language is not specified. Set it in ailoc.toml or use --source.");
        std::process::exit(2);
    };

    let matcher =
        ailoc_services::ScopeMatcher::new(&cfg.include_patterns(), &cfg.exclude_patterns())?;
    let roots: Vec<PathBuf> = cfg.lang_dirs().iter().map(PathBuf::from).collect();
    let files = ailoc_services::find_translation_files(&roots, &matcher, &source_lang);

    for file in &files {
        println!("{}", file.display());
    }
    println!("Found {} source file(s)", files.len());
    Ok(())
}

fn print_summary(stats: &RunStats, use_color: bool) {
    println!("Translation completed!");
    println!("Total files: {}", stats.total_files);
    if use_color {
        use owo_colors::OwoColorize;
        println!("Successfully translated: {}", stats.successful.green());
        println!("Failed: {}", stats.failed.red());
        println!("Skipped: {}", stats.skipped.yellow());
    } else {
        println!("Successfully translated: {}", stats.successful);
        println!("Failed: {}", stats.failed);
        println!("Skipped: {}", stats.skipped);
    }
    println!("Results by language:");
    for (lang, s) in &stats.by_language {
        println!(
            "  {}: {} successful, {} failed, {} skipped",
            lang, s.successful, s.failed, s.skipped
        );
    }
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = rolling::daily("logs", "ailoc.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    let cfg = ailoc_config::load_config()?;
    cli.cmd.run(&cfg, use_color)
}
