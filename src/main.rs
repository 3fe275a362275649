//! 命令行入口

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use verse_cycle::config::{ConfigManager, ServiceConfig};
use verse_cycle::env::{self, general, EnvConfig, EnvVar};
use verse_cycle::error::helpers;
use verse_cycle::{ContentDeliveryService, ContentResult, DailySelectionRecord, TranslationRegistry};

#[derive(Parser)]
#[command(name = "verse-cycle")]
#[command(about = "Daily verse rotation over the whole canon, one verse per day, no repeats per cycle")]
#[command(version)]
struct Cli {
    /// Config file (TOML or JSON); searched in the default locations when omitted
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print today's verse
    Today {
        /// Translation id, defaults to the configured translation
        #[arg(long, short)]
        translation: Option<String>,
    },
    /// Re-render today's verse; with --force skip to the next verse
    Refresh {
        #[arg(long)]
        force: bool,
    },
    /// Print progress through the current cycle
    Progress,
    /// Print rotation and cache statistics
    Stats,
    /// Discard the current cycle and start over
    Reset,
    /// Remove every cached translation document
    ClearCache,
    /// List known translations
    Translations,
    /// Print a config file with default values
    GenConfig {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the supported environment variables and their current values
    EnvDocs,
}

fn init_logging() {
    let level = general::LogLevel::get().unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> ContentResult<ServiceConfig> {
    let manager = match path {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new()?,
    };
    Ok(manager.into_config())
}

fn print_record(record: &DailySelectionRecord) {
    println!("{}", record.canonical_reference);
    if let Some(text) = &record.rendered_text {
        println!("{}", text);
    }
    println!(
        "[{}] {} / {}",
        record.translation_id.as_deref().unwrap_or("-"),
        record.progress_numerator,
        record.progress_denominator
    );
}

async fn run(cli: Cli) -> ContentResult<()> {
    match &cli.command {
        Command::GenConfig { output: Some(path) } => {
            ConfigManager::generate_example_config(path)?;
            println!("config written to {}", path.display());
            return Ok(());
        }
        Command::GenConfig { output: None } => {
            let content = toml::to_string_pretty(&ServiceConfig::default())
                .map_err(|e| helpers::config_error(format!("序列化配置失败: {}", e)))?;
            print!("{}", content);
            return Ok(());
        }
        Command::EnvDocs => {
            print!("{}", env::generate_env_docs());
            println!();
            EnvConfig::from_env()
                .map_err(helpers::config_error)?
                .print_summary();
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(cli.config.as_ref())?;

    if let Command::Translations = cli.command {
        for info in config.registry().list() {
            println!(
                "{:<6} {:<28} {}{}",
                info.id,
                info.name,
                if info.available { "available" } else { "coming soon" },
                if info.is_default { " (default)" } else { "" }
            );
        }
        return Ok(());
    }

    let service = ContentDeliveryService::from_config(&config)?;

    match cli.command {
        Command::Today { translation } => {
            let translation = translation.unwrap_or_else(|| config.default_translation.clone());
            let record = service
                .get_selection_for_today(&translation)
                .await
                .or_else(helpers::log_error)?;
            print_record(&record);
        }
        Command::Refresh { force } => {
            let record = service.refresh(force).await.or_else(helpers::log_error)?;
            print_record(&record);
        }
        Command::Progress => {
            let progress = service.get_progress().await?;
            println!(
                "{} / {} ({:.2}%)",
                progress.current,
                progress.total,
                progress.percentage()
            );
        }
        Command::Stats => {
            let rotation = service.rotation_stats().await?;
            println!("cycle:     {}", rotation.cycle_count);
            println!("used:      {}", rotation.used);
            println!("remaining: {}", rotation.remaining);
            println!("progress:  {:.2}%", rotation.progress_percentage);
            if let Some(created_at) = rotation.created_at {
                println!("created:   {}", created_at.to_rfc3339());
            }
            if let Some(last_reset) = rotation.last_reset {
                println!("last reset: {}", last_reset.to_rfc3339());
            }
            let cached = service.cache().cached_translations().await?;
            println!("cached translations: {}", cached.join(", "));
            let cache = service.cache_stats();
            println!(
                "cache: {} fetches, {:.0}% hit rate",
                cache.fetches,
                cache.hit_rate() * 100.0
            );
        }
        Command::Reset => {
            service.reset_cycle().await?;
            println!("cycle reset");
        }
        Command::ClearCache => {
            let removed = service.clear_translation_cache().await?;
            println!("removed {} cached translation(s)", removed);
        }
        Command::Translations | Command::GenConfig { .. } | Command::EnvDocs => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
