//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// NurseAI - clinical suggestion gateway and retry client
#[derive(Parser, Debug)]
#[command(name = "nurseai")]
#[command(about = "Clinical suggestion gateway with a resumable retry workflow", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true, env = "NURSEAI_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the backend HTTP API
    Serve {
        /// Socket address to listen on (defaults to `[server] bind`)
        #[arg(long)]
        bind: Option<String>,

        /// Replace the bundled clinical prompt
        #[arg(long)]
        prompt: Option<PathBuf>,
    },

    /// Report the fields a saved suggestion lists as missing
    Missing {
        /// Text file holding the suggestion
        file: PathBuf,

        /// Keyword table replacing the bundled one
        #[arg(long)]
        keywords: Option<PathBuf>,

        /// Print the field keys as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// List the models the external service offers and the one that would be used
    Models,

    /// Inspect or drive the pending retry
    #[command(subcommand)]
    Retry(RetryCommands),
}

/// Retry workflow subcommands
#[derive(Subcommand, Debug)]
pub enum RetryCommands {
    /// Show the pending retry, if any
    Status {
        /// Gateway base URL (defaults to `[client] backend_url`)
        #[arg(long)]
        backend_url: Option<String>,

        /// Print the state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send the pending retry if it is eligible
    Now {
        /// Gateway base URL (defaults to `[client] backend_url`)
        #[arg(long)]
        backend_url: Option<String>,
    },

    /// Discard the pending retry
    Clear {
        /// Gateway base URL (defaults to `[client] backend_url`)
        #[arg(long)]
        backend_url: Option<String>,
    },
}

impl RetryCommands {
    /// The `--backend-url` override, whichever subcommand carries it.
    pub fn backend_url(&self) -> Option<&str> {
        match self {
            Self::Status { backend_url, .. }
            | Self::Now { backend_url }
            | Self::Clear { backend_url } => backend_url.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["nurseai", "serve", "--bind", "0.0.0.0:8080", "--verbose"])
            .unwrap();

        assert!(cli.verbose);
        assert!(!cli.json_logs);
        match cli.command {
            Commands::Serve { bind, prompt } => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0:8080"));
                assert!(prompt.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn retry_backend_url_is_shared() {
        let cli = Cli::try_parse_from([
            "nurseai",
            "--json-logs",
            "retry",
            "now",
            "--backend-url",
            "http://gateway:5000",
        ])
        .unwrap();

        assert!(cli.json_logs);
        match cli.command {
            Commands::Retry(retry) => {
                assert!(matches!(retry, RetryCommands::Now { .. }));
                assert_eq!(retry.backend_url(), Some("http://gateway:5000"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn missing_requires_a_file() {
        assert!(Cli::try_parse_from(["nurseai", "missing"]).is_err());

        let cli = Cli::try_parse_from(["nurseai", "missing", "note.txt", "--json"]).unwrap();
        match cli.command {
            Commands::Missing { file, keywords, json } => {
                assert_eq!(file, PathBuf::from("note.txt"));
                assert!(keywords.is_none());
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
