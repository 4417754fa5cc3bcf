//! CLI module for eduportal
//!
//! This module contains all CLI command definitions and handlers using clap.

pub mod commands;
pub mod config;
pub mod countdown;
pub mod fetch;
pub mod routes;
pub mod theme;

pub use commands::{Cli, Commands};
