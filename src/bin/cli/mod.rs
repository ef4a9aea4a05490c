//! CLI module organization:
//! - args: argument structures
//! - commands: command execution
//! - config_layer: layered configuration loading
//! - output: report rendering

pub mod args;
pub mod commands;
pub mod config_layer;
pub mod output;

pub use args::*;
pub use commands::*;
