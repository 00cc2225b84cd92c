use std::sync::Arc;

use crate::api::HttpApi;
use crate::error::AppResult;
use crate::planner::{Notifier, PlannerService};

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod api;
pub mod error;
pub mod model;
pub mod planner;
pub mod tree;

static APPLICATION_NAME: &str = "planbook";

/// Planner service talking to the backend named in `config`.
pub fn connect(config: &Config, notifier: Arc<dyn Notifier>) -> AppResult<PlannerService<HttpApi>> {
    let api = HttpApi::from_config(config.api())?;
    tracing::debug!("using backend at {}", api.base_url());
    Ok(PlannerService::new(api, config.planner().clone(), notifier))
}

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}
