//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the nurseai binary.

mod commands;
mod missing;
mod models;
mod retry;
mod serve;

pub use commands::{Cli, Commands, RetryCommands};
pub use missing::report_missing;
pub use models::list_models;
pub use retry::handle_retry_command;
pub use serve::run_server;
