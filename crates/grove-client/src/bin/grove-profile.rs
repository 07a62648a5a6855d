//! grove-profile: look up a grower profile from the command line.
//!
//! Usage:
//!   grove-profile profile <id-or-account-uuid>
//!   grove-profile counts <grower-id> [--status approved|awaiting|rejected]
//!
//! Output is pretty-printed JSON on stdout; logs go to stderr (or LOG_FILE).

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use grove_client::TreeTrackerClient;
use grove_core::{
    CaptureStatus, CaptureStatusAggregator, GrowerIdentifier, GrowerProfileAggregator,
    RequestOutcome,
};

#[derive(Parser)]
#[command(name = "grove-profile")]
#[command(about = "Grower profile lookup against the tree-tracker admin API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a grower and print the full profile
    Profile {
        /// Internal grower id or grower account UUID
        identifier: String,
    },

    /// Print capture counts by status for a grower
    Counts {
        /// Internal grower id
        grower_id: i64,

        /// Print only the count for this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Approved,
    Awaiting,
    Rejected,
}

impl From<StatusArg> for CaptureStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Approved => CaptureStatus::Approved,
            StatusArg::Awaiting => CaptureStatus::Awaiting,
            StatusArg::Rejected => CaptureStatus::Rejected,
        }
    }
}

fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors
    //   RUST_LOG    - standard env filter (default: "grove_client=info,grove_core=info")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "grove_client=info,grove_core=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("grove-profile.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // stdout carries the JSON result
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let _file_guard = init_tracing();

    let cli = Cli::parse();
    let client = Arc::new(TreeTrackerClient::from_env()?);

    match cli.command {
        Commands::Profile { identifier } => {
            let identifier: GrowerIdentifier = identifier.parse()?;
            let profiles = GrowerProfileAggregator::new(client);

            match profiles.request(identifier, &[]).await {
                RequestOutcome::Ready(profile) => {
                    println!("{}", serde_json::to_string_pretty(&*profile)?);
                    Ok(ExitCode::SUCCESS)
                }
                RequestOutcome::NotFound(message) => {
                    eprintln!("{}", message);
                    Ok(ExitCode::FAILURE)
                }
                RequestOutcome::Superseded => {
                    anyhow::bail!("profile request was superseded")
                }
            }
        }
        Commands::Counts { grower_id, status } => {
            let summary = CaptureStatusAggregator::new(client)
                .aggregate(grower_id)
                .await;
            match status {
                Some(status) => println!("{}", summary.get(status.into())),
                None => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
