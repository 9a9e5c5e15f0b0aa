//! NurseAI CLI binary.
//!
//! - Run the backend API in front of the generative service
//! - Check a saved suggestion for missing patient data
//! - Inspect the model listing
//! - Drive the client's pending retry

use clap::Parser;
use nurseai::{NurseAiConfig, ObservabilityConfig, init_observability, shutdown_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_retry_command, list_models, report_missing, run_server};

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut observability = ObservabilityConfig::default().with_json_logs(cli.json_logs);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    init_observability(observability)?;

    let config = match &cli.config {
        Some(path) => NurseAiConfig::from_file(path)?,
        None => NurseAiConfig::load()?,
    };

    let result = match cli.command {
        Commands::Serve { bind, prompt } => run_server(&config, bind, prompt).await,
        Commands::Missing {
            file,
            keywords,
            json,
        } => report_missing(&file, keywords.as_deref(), json).await,
        Commands::Models => list_models(&config).await,
        Commands::Retry(command) => handle_retry_command(&config, command).await,
    };

    shutdown_observability();
    result?;
    Ok(())
}
