//! Core functionality for eduportal
//!
//! This module contains shared infrastructure including:
//! - Application configuration
//! - Persistent preference storage
//! - Cancellable background tasks

pub mod config;
pub mod schedule;
pub mod storage;

pub use config::Config;
pub use schedule::TaskHandle;
pub use storage::{FileStore, MemoryStore, PreferenceStore};
