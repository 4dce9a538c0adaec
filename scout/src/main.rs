use clap::Parser;
use match_history::{HistoryService, PlatformRegion};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod config;
mod logging;
mod statsd;

use config::{API_KEY_ENV, Config};

#[derive(Parser)]
#[command(name = "scout", about = "Recent match history for a player")]
enum CliCommand {
    /// Serve match histories over HTTP.
    Serve {
        #[arg(long)]
        config: PathBuf,
    },
    /// Print one player's match history as JSON.
    History {
        #[arg(long)]
        config: PathBuf,
        /// Platform code, e.g. `euw1` or `kr`.
        #[arg(long)]
        region: PlatformRegion,
        #[arg(long)]
        nickname: String,
        #[arg(long)]
        tag: String,
    },
}

impl CliCommand {
    fn config_path(&self) -> &Path {
        match self {
            CliCommand::Serve { config } | CliCommand::History { config, .. } => config,
        }
    }
}

fn main() -> ExitCode {
    let cli = CliCommand::parse();

    let config = match Config::load(cli.config_path()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry = logging::init(&config.logging);
    if let Some(metrics) = &config.metrics
        && let Err(e) = statsd::init(metrics)
    {
        tracing::warn!(error = %e, "Metrics disabled");
    }
    if config.history.riot.api_key.is_none() {
        tracing::warn!(
            "No API key configured (riot.api_key or {}), upstream requests will be rejected",
            API_KEY_ENV
        );
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "Could not start runtime");
            return ExitCode::FAILURE;
        }
    };

    let service = HistoryService::new(&config.history);
    match cli {
        CliCommand::Serve { .. } => rt.block_on(serve(&config, service)),
        CliCommand::History {
            region,
            nickname,
            tag,
            ..
        } => rt.block_on(print_history(service, region, &nickname, &tag)),
    }
}

async fn serve(config: &Config, service: HistoryService) -> ExitCode {
    match match_history::api::serve(&config.history.listener, service).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn print_history(
    service: HistoryService,
    region: PlatformRegion,
    nickname: &str,
    tag: &str,
) -> ExitCode {
    let entries = match service.get_history(region, nickname, tag).await {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&entries) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("could not encode history: {e}");
            ExitCode::FAILURE
        }
    }
}
