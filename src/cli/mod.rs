//! Command-line interface components
//!
//! This module contains CLI-specific code for the CAPES Fetcher application:
//! argument parsing and the command handlers that print results.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, GlobalArgs, ListArgs, RunArgs, SearchArgs};
pub use commands::{handle_list, handle_run};
