//! KomentarBersih CLI
//!
//! Classifies comments as gambling promotion or normal content, one at a
//! time, from a file, or straight from a video's comment feed.

use std::fs::File;
use std::io::{self, BufRead, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use komentarbersih::config::{AppConfig, ConfigManager};
use komentarbersih::core::{AppContext, BatchReport};
use komentarbersih::env::{self, EnvVar};
use komentarbersih::error::{helpers, KomentarResult};
use komentarbersih::source::VideoInfo;
use komentarbersih::{BatchProgress, BatchStage, CommentAnalysis};

/// Gambling-promotion detector for Indonesian comments
#[derive(Parser, Debug)]
#[command(name = "komentarbersih")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (TOML or JSON); default locations are searched otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use only the built-in slang table
    #[arg(long, global = true)]
    offline: bool,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a single comment
    Check {
        text: String,
    },

    /// Classify every comment in a .json, .jsonl, .csv or text file
    File {
        path: PathBuf,

        /// Column or key holding the comment text
        #[arg(long)]
        field: Option<String>,

        /// Analyze at most this many comments
        #[arg(long)]
        limit: Option<usize>,

        /// Write full results as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Classify the comments of a YouTube video
    Youtube {
        url: String,

        /// Maximum number of comments to fetch
        #[arg(long)]
        max: Option<usize>,

        /// Write full results as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print normalized text only (reads stdin lines when no text is given)
    Clean {
        texts: Vec<String>,
    },

    /// Write an example configuration file
    InitConfig {
        path: PathBuf,
    },

    /// List supported environment variables
    Env,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    video: Option<&'a VideoInfo>,
    #[serde(flatten)]
    report: &'a BatchReport,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(if e.is_fatal() { 2 } else { 1 });
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        env::core::LogLevel::get()
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(Level::INFO)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging was already initialized");
    }
}

fn run(cli: Cli) -> KomentarResult<()> {
    match &cli.command {
        Commands::InitConfig { path } => {
            let path = path_str(path)?;
            ConfigManager::generate_example_config(path)?;
            println!("Wrote example configuration to {}", path);
            return Ok(());
        }
        Commands::Env => {
            print!("{}", env::generate_env_docs());
            return Ok(());
        }
        _ => {}
    }

    let ctx = AppContext::from_config(load_config(&cli)?)?;

    match cli.command {
        Commands::Check { text } => {
            let analysis = ctx.analyze_one(&text)?;
            print_single(&analysis);
        }
        Commands::File {
            path,
            field,
            limit,
            output,
        } => {
            let source = ctx.file_source(path_str(&path)?, field);
            let report = ctx.analyze_source(&source, limit, log_progress)?;
            print_report(&report);
            if let Some(output) = output {
                write_json(&output, None, &report)?;
            }
        }
        Commands::Youtube { url, max, output } => {
            let (source, video) = ctx.youtube_source(&url)?;
            println!("{} - {}", video.title, video.channel);
            println!(
                "{} views, {} comments\n",
                video.view_count, video.comment_count
            );

            let report = ctx.analyze_source(&source, max, log_progress)?;
            print_report(&report);
            if let Some(output) = output {
                write_json(&output, Some(&video), &report)?;
            }
        }
        Commands::Clean { texts } => {
            let pipeline = ctx.pipeline();
            if texts.is_empty() {
                for line in io::stdin().lock().lines() {
                    println!("{}", pipeline.normalize(&line?));
                }
            } else {
                for text in &texts {
                    println!("{}", pipeline.normalize(text));
                }
            }
        }
        Commands::InitConfig { .. } | Commands::Env => {}
    }

    Ok(())
}

fn load_config(cli: &Cli) -> KomentarResult<AppConfig> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::from_file(path_str(path)?)?,
        None => ConfigManager::new()?,
    };

    let mut config = manager.into_config();
    if cli.offline {
        config.lexicon.offline = true;
    }
    Ok(config)
}

fn path_str(path: &Path) -> KomentarResult<&str> {
    path.to_str()
        .ok_or_else(|| helpers::validation_error(format!("non UTF-8 path: {}", path.display())))
}

fn log_progress(progress: &BatchProgress) {
    let verb = match progress.stage {
        BatchStage::Cleaning => "Cleaning",
        BatchStage::Classification => "Classifying",
    };
    tracing::info!(
        "{} {}/{} ({:.0}%)",
        verb,
        progress.processed,
        progress.total,
        progress.fraction() * 100.0
    );
}

fn print_single(analysis: &CommentAnalysis) {
    println!("Original  : {}", analysis.original);
    println!("Cleaned   : {}", analysis.cleaned);
    println!("Label     : {}", analysis.prediction.label);
    println!("Class     : {}", analysis.prediction.class_index);
    println!("Confidence: {:.1}%", analysis.prediction.confidence * 100.0);
}

fn print_report(report: &BatchReport) {
    println!("{:>4}  {:<16} {:>6}  {}", "#", "Label", "Conf", "Cleaned");
    for (i, result) in report.results.iter().enumerate() {
        println!(
            "{:>4}  {:<16} {:>5.1}%  {}",
            i + 1,
            result.prediction.label.display_name(),
            result.prediction.confidence * 100.0,
            truncate(&result.cleaned, 60)
        );
    }

    let summary = &report.summary;
    println!();
    println!("Source   : {}", report.source);
    println!("Total    : {}", summary.total);
    println!(
        "Gambling : {} ({:.1}%)",
        summary.gambling,
        summary.gambling_ratio * 100.0
    );
    println!(
        "Normal   : {} ({:.1}%)",
        summary.normal,
        summary.normal_ratio * 100.0
    );
    if summary.empty > 0 {
        println!("Empty    : {}", summary.empty);
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn write_json(path: &Path, video: Option<&VideoInfo>, report: &BatchReport) -> KomentarResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &JsonOutput { video, report })?;
    tracing::info!("Results written to {}", path.display());
    Ok(())
}
