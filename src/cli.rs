//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::web::{AppState, build_router};
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::config_validation::validate_server_config;
use crate::domain::error::BandviewError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "bandview", about = "Bollinger Bands chart server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the configured listen address
        #[arg(long)]
        listen: Option<String>,
    },
    /// Validate a configuration file
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Serve { config, listen } => run_serve(config.as_ref(), listen.as_deref()),
        Command::Check { config } => run_check(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BandviewError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn build_data_port(
    config: &FileConfigAdapter,
) -> Result<Arc<dyn MarketDataPort + Send + Sync>, BandviewError> {
    let provider = config
        .get_string("data", "provider")
        .unwrap_or_else(|| "yahoo".to_string());

    match provider.as_str() {
        "csv" => {
            // validate_server_config has already required csv_dir
            let dir = config.get_string("data", "csv_dir").ok_or_else(|| {
                BandviewError::ConfigMissing {
                    section: "data".to_string(),
                    key: "csv_dir".to_string(),
                }
            })?;
            Ok(Arc::new(CsvAdapter::new(PathBuf::from(dir))))
        }
        _ => {
            let timeout = Duration::from_secs(config.get_int("data", "timeout_secs", 10) as u64);
            let adapter = match config.get_string("data", "base_url") {
                Some(url) => YahooAdapter::with_base_url(url, timeout)?,
                None => YahooAdapter::new(timeout)?,
            };
            Ok(Arc::new(adapter))
        }
    }
}

fn run_serve(config_path: Option<&PathBuf>, listen_override: Option<&str>) -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bandview=info")),
        )
        .init();

    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(c) => c,
                Err(code) => return code,
            }
        }
        None => FileConfigAdapter::empty(),
    };

    if let Err(e) = validate_server_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let addr: std::net::SocketAddr = listen_override
        .map(str::to_string)
        .or_else(|| config.get_string("server", "listen"))
        .unwrap_or_else(|| "127.0.0.1:3000".to_string())
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("warning: invalid listen address, falling back to 127.0.0.1:3000");
            std::net::SocketAddr::from(([127, 0, 0, 1], 3000))
        });

    eprintln!("Starting web server on {addr}");

    let state = AppState {
        data_port,
        config: Arc::new(config),
    };
    let router = build_router(state);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let served: Result<(), std::io::Error> = runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await
    });

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: server failed: {e}");
            ExitCode::from(1)
        }
    }
}

fn run_check(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_server_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if let Err(e) = build_data_port(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Config validated successfully");
    ExitCode::SUCCESS
}
