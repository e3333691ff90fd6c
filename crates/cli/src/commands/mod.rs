//! Subcommand implementations.

pub mod account;
pub mod admin;
pub mod shop;

/// Result of a subcommand.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;
