use std::time::Duration;

use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_from};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

use crate::tree::DragPolicy;
use crate::tree::drag::DEFAULT_MIN_DRAG_DISTANCE_PX;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    api: ApiConfig,
    #[serde(default)]
    planner: PlannerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    base_url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_min_drag_distance_px")]
    min_drag_distance_px: f64,
    #[serde(default = "default_true")]
    reload_after_move: bool,
    #[serde(default)]
    show_archived: bool,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_min_drag_distance_px() -> f64 {
    DEFAULT_MIN_DRAG_DISTANCE_PX
}

fn default_true() -> bool {
    true
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_drag_distance_px: default_min_drag_distance_px(),
            reload_after_move: true,
            show_archived: false,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(use_local: bool) -> ConfigResult<Self> {
        let text = read_config(use_local)?;
        Self::from_toml(&text)
    }

    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let config = match Self::load(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                };

                config
            })
            .await
    }

    #[inline]
    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    #[inline]
    pub fn planner(&self) -> &PlannerConfig {
        &self.planner
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs,
        }
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PlannerConfig {
    #[inline]
    pub fn drag_policy(&self) -> DragPolicy {
        DragPolicy::new(self.min_drag_distance_px)
    }

    #[inline]
    pub fn reload_after_move(&self) -> bool {
        self.reload_after_move
    }

    #[inline]
    pub fn show_archived(&self) -> bool {
        self.show_archived
    }

    pub fn with_reload_after_move(mut self, reload: bool) -> Self {
        self.reload_after_move = reload;
        self
    }
}
