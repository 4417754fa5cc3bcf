//! eduportal - Terminal client for an education portal
//!
//! This library provides the portal's client-side coordination layer
//! (theme, alerts, countdown, notifications, routing) together with
//! CLI and TUI front ends built on top of it.

pub mod alert;
pub mod api;
pub mod app;
pub mod cli;
pub mod core;
pub mod countdown;
pub mod error;
pub mod notifications;
pub mod routes;
pub mod theme;
pub mod tui;

pub use error::{PortalError, Result};
