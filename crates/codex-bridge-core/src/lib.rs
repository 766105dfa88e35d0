//! Foundational types shared across codex-bridge crates.
//!
//! Provides the immutable run configuration, the instruction/reply value types
//! passed between the classifier, generators, and poster, and small text
//! helpers used when rendering diagnostics.

pub mod bridge_config;
pub mod instruction;
pub mod text_utils;

pub use bridge_config::*;
pub use instruction::{Instruction, ReplyText};
pub use text_utils::{truncate_chars, truncate_for_error};
