use crate::{
    conn::{ConnectionPinger, MySqlConnectionPinger},
    error::CliError,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use commands::Commands;
use connectors::{mysql::sink::MySqlConnector, sink::SinkConnector};
use engine::{ImportConfig, PipelineCoordinator, Strategy, validate_config};
use model::report::RunStage;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};

mod commands;
mod conn;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(name = "bulkrow", version = "0.1.0", about = "Bulk CSV-to-MySQL import tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            config,
            output,
            json,
        } => {
            let config = load_config(&config).await?;

            let shutdown = ShutdownCoordinator::new(CancellationToken::new());
            shutdown.register_handlers();

            let connector = build_connector(&config)?;
            let report = PipelineCoordinator::new(config, connector, shutdown.cancel_token())
                .run()
                .await?;

            let aborted = report.stage == RunStage::Aborted;
            match output {
                Some(path) => output::write_report(&report, path).await?,
                None if json => output::print_json(&report)?,
                None => output::print_table(&report),
            }

            if shutdown.is_shutdown_requested() {
                std::process::exit(ExitCode::ShutdownRequested.as_i32());
            }
            if aborted {
                std::process::exit(ExitCode::GeneralError.as_i32());
            }
        }
        Commands::Validate { config } => {
            info!("Validating import config: {config}");
            let config = load_config(&config).await?;
            validate_config(&config)?;
            println!("Configuration is valid");
        }
        Commands::TestConn { conn_str } => {
            MySqlConnectionPinger { conn_str }.ping().await?;
        }
    }

    Ok(())
}

async fn load_config(path: &str) -> Result<ImportConfig, CliError> {
    let source = tokio::fs::read_to_string(path).await?;
    let config = serde_json::from_str(&source)?;
    Ok(config)
}

fn build_connector(config: &ImportConfig) -> Result<Arc<dyn SinkConnector>, CliError> {
    let connector = MySqlConnector::new(&config.destination_url)?;
    let connector = match config.strategy {
        // The whitelist covers exactly the file this run reads.
        Strategy::NativeBulkLoad => connector.with_local_infile(config.source_path.clone()),
        Strategy::BatchedInsert => connector,
    };
    Ok(Arc::new(connector))
}
