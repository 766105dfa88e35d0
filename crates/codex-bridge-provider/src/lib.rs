//! Local command-line generation backend for the codex comment bridge.
//!
//! Holds the CLI template model, subprocess execution with timeout/kill, and
//! the ordered template fallback that produces reply text from a local tool.

mod cli_executable;
mod cli_template;
mod command_invoker;
mod process_runner;

pub use cli_executable::is_executable_available;
pub use cli_template::{default_cli_templates, CliTemplate, CliTemplateError, RenderedCommand};
pub use command_invoker::{
    AttemptFailureKind, CommandFailure, CommandInvoker, InvocationAttempt,
};
