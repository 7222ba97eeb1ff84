mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tautulli_core::{
    export_history_blocking, ExportOptions, ExportProgress, ExportResult, ProgressCallback,
    DEFAULT_TIMEOUT_SECS,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Export watched movie history from Tautulli in Letterboxd CSV format",
    long_about = None
)]
struct Cli {
    /// Config file to read from
    #[arg(short = 'i', long = "ini", default_value = "config.ini")]
    ini: PathBuf,

    /// CSV file to output data to
    #[arg(short = 'o', long = "csv", default_value = "output.csv")]
    csv: PathBuf,

    /// The username/email to get history from
    #[arg(short = 'u', long = "user")]
    user: String,

    /// Output file encoding
    #[arg(short = 'e', long = "encoding", default_value = "utf-8")]
    encoding: String,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    debug!(?cli, "arguments parsed");

    if cli.user.trim().is_empty() {
        bail!("--user must not be empty");
    }
    if cli.timeout == 0 {
        bail!("--timeout must be greater than 0");
    }

    let server = ServerConfig::load(&cli.ini)?;
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let mut options = ExportOptions::new(server.base_url, server.token, cli.user.trim(), cli.csv);
    options.encoding = cli.encoding;
    options.timeout_secs = cli.timeout;
    options.progress_callback = Some(progress_reporter(spinner.clone()));

    let outcome = export_history_blocking(options);
    spinner.finish_and_clear();
    let result = outcome?;
    print_summary(&result);
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn progress_reporter(spinner: ProgressBar) -> ProgressCallback {
    Arc::new(move |event: ExportProgress| match event {
        ExportProgress::Started { user, csv_path } => {
            println!(
                "Exporting movies to {} for user {}:",
                style(csv_path.display()).cyan(),
                style(user).cyan()
            );
            spinner.enable_steady_tick(Duration::from_millis(120));
        }
        ExportProgress::Exported { count, title } => {
            spinner.set_message(format!("{count} -> {title}"));
        }
        ExportProgress::Finished { .. } => spinner.finish_and_clear(),
    })
}

fn print_summary(result: &ExportResult) {
    println!(
        "{} {} filtered movies to {}.",
        style("Exported").green().bold(),
        result.exported_count(),
        result.csv_path.display()
    );
    let skipped = result.watched_count - result.exported_count();
    if skipped > 0 {
        println!(
            "{}",
            style(format!("Skipped {skipped} duplicate entries.")).dim()
        );
    }
}
