//! Configuration model loaded from external sources.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::processing::fusion::MatchSettings;
use crate::{DEFAULT_MAX_DURATION, DEFAULT_VISUAL_WEIGHT, SIMILARITY_THRESHOLD};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("{0} must be within [0, 1], got {1}")]
    OutOfRange(&'static str, f64),
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the matching service.
pub struct ServerConfig {
    pub reference_path: PathBuf,
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    pub zmq_address: String,
    pub threshold: f64,
    pub visual_weight: f64,
    pub max_duration: u32,
    pub concurrency: usize,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Layers defaults, an optional `config.yaml` and `MATCHER_*`
    /// environment variables.
    pub fn load() -> Result<Self, SettingsError> {
        let settings = Self::builder()?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("MATCHER"))
            .build()?;
        Self::from_config(settings)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, SettingsError> {
        Ok(config::Config::builder()
            .set_default("reference_path", "trained_data.json")?
            .set_default("zmq_address", "tcp://127.0.0.1:5556")?
            .set_default("threshold", SIMILARITY_THRESHOLD)?
            .set_default("visual_weight", DEFAULT_VISUAL_WEIGHT)?
            .set_default("max_duration", DEFAULT_MAX_DURATION)?
            .set_default("concurrency", 5)?
            .set_default("request_timeout_secs", 10)?)
    }

    fn from_config(settings: config::Config) -> Result<Self, SettingsError> {
        let server: ServerConfig = settings.try_deserialize()?;
        for (name, value) in [
            ("threshold", server.threshold),
            ("visual_weight", server.visual_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::OutOfRange(name, value));
            }
        }
        Ok(server)
    }

    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            threshold: self.threshold,
            visual_weight: self.visual_weight,
            max_duration: self.max_duration,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
