//! # Enroll TUI
//!
//! Terminal front end for the two-step registration wizard, built on
//! Ratatui and Crossterm.
//!
//! ## Architecture
//!
//! [`App`](app::App) holds the wizard state and turns messages into effects;
//! components under `ui::components` map keys to messages and render the
//! form and the notification modal; `ui::runtime` owns the terminal and the
//! event loop, running the registration request on a background task.

mod app;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use enroll_api::RegistrationClient;
use enroll_util::ClientConfig;

/// Runs the wizard until the user quits with Ctrl+C.
///
/// # Errors
///
/// Fails when the registration client cannot be built from `config` or the
/// terminal cannot be set up.
pub async fn run(config: ClientConfig) -> Result<()> {
    let client = RegistrationClient::from_config(&config).context("failed to build registration client")?;
    ui::runtime::run_app(config, Arc::new(client)).await
}
