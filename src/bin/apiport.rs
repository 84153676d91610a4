//! ApiPort CLI binary.
//!
//! Thin command-line surface over the analysis client.
//!
//! # Commands
//!
//! - `targets` - List target platforms the service analyzes against
//! - `formats` - List report formats
//! - `default-format` - Show the default report format
//! - `submit` - Submit a request document and print the analysis response

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use apiport::{
    AnalyzeRequest, ApiPortClient, CancellationToken, ClientIdentity, Compression, Config,
    TracingReporter, VERSION,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "apiport")]
#[command(version = VERSION)]
#[command(about = "Portability analysis service client", long_about = None)]
struct Cli {
    /// Service base address (overrides config and APIPORT_ENDPOINT)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Config file (default: ~/.config/apiport/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Request compression (identity, gzip, deflate, brotli)
    #[arg(long, global = true)]
    compression: Option<Compression>,

    /// Language for service notices
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List target platforms
    Targets,

    /// List available report formats
    Formats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the default report format
    DefaultFormat {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit an analysis request and print the response
    Submit {
        /// Request document (JSON)
        file: PathBuf,

        /// Add a target platform to the request
        #[arg(short, long)]
        target: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    let config = load_config(&cli)?;
    let client = ApiPortClient::from_config(
        &config.client,
        ClientIdentity::this_crate(),
        Arc::new(TracingReporter),
    )?;

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, cancelling");
                on_ctrl_c.cancel();
            }
        });

        run(&client, cli.command, &cancel).await
    });

    client.close();
    result
}

async fn run(
    client: &ApiPortClient,
    command: Commands,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    match command {
        Commands::Targets => {
            for target in client.get_targets_with_cancellation(cancel).await? {
                println!("{target}");
            }
        },

        Commands::Formats { json } => {
            let formats = client.get_result_formats_with_cancellation(cancel).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&formats)?);
            } else {
                for format in &formats {
                    println!("{format}");
                }
            }
        },

        Commands::DefaultFormat { json } => {
            let format = client
                .get_default_result_format_with_cancellation(cancel)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&format)?);
            } else {
                println!("{format}");
            }
        },

        Commands::Submit { file, target } => {
            let request = read_request(&file, target)?;
            let response = client
                .submit_analysis_with_cancellation(&request, cancel)
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        },
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    // stdout carries command output only
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// File config, overridden by environment, overridden by flags.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let file_config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => match Config::default_path().filter(|p| p.exists()) {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        },
    };

    let mut config = file_config.merge(Config::from_env());

    if let Some(endpoint) = &cli.endpoint {
        config.client.endpoint = Some(endpoint.clone());
    }
    if let Some(compression) = cli.compression {
        config.client.compression = compression;
    }
    if let Some(locale) = &cli.locale {
        config.client.locale = locale.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.client.timeout_secs = timeout;
    }

    Ok(config)
}

fn read_request(path: &Path, extra_targets: Vec<String>) -> anyhow::Result<AnalyzeRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let request: AnalyzeRequest = serde_json::from_str(&content)
        .with_context(|| format!("Invalid request document {}", path.display()))?;

    if extra_targets.is_empty() {
        return Ok(request);
    }
    Ok(request.into_builder().targets(extra_targets).build())
}
