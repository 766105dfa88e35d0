//! clap argument model for the codex-bridge binary and its conversion into
//! runtime configuration.

pub mod cli_args;
pub mod cli_config;

pub use cli_args::Cli;
pub use cli_config::{bridge_config_from_cli, posting_config_from_cli, validate_cli};
