pub mod run_options;

use crate::{
    backwash::{
        ds::{FoulingStatus, SimulationSettings},
        validation::{validate_pressure_threshold, validate_time_steps},
        DEFAULT_TIME_STEPS, PRESSURE_THRESHOLD,
    },
    error::AppError,
};
use run_options::Args;
use serde::Deserialize;
use std::fs;
use tracing::warn;

pub const CONFIG_FILE: &str = "./backwash.toml";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebServer {
    pub address: String,
}

impl Default for WebServer {
    fn default() -> Self {
        Self { address: "0.0.0.0:8000".to_owned() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictionApi {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PredictionApi {
    fn default() -> Self {
        Self { base_url: "http://localhost:8000".to_owned(), timeout_secs: 10 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Simulation {
    pub time_steps: usize,
    pub pressure_threshold: f64,
    pub fouling_status: FoulingStatus,
    /// Fixed PRNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            time_steps: DEFAULT_TIME_STEPS,
            pressure_threshold: PRESSURE_THRESHOLD,
            fouling_status: FoulingStatus::Clean,
            seed: None,
        }
    }
}

impl Simulation {
    pub fn settings(&self) -> SimulationSettings {
        SimulationSettings {
            time_steps: self.time_steps,
            pressure_threshold: self.pressure_threshold,
            fouling: self.fouling_status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Log {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for Log {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_owned() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web_server: WebServer,
    pub prediction_api: PredictionApi,
    pub simulation: Simulation,
    pub log: Log,
}

impl Config {
    /// Missing config file means defaults; a file that does not parse is an error.
    pub fn load(args: &Args) -> Result<Self, AppError> {
        if let Some(cfg_str) = &args.cfg_str {
            return Self::load_from_str(cfg_str);
        }
        if !args.cfg_file.exists() {
            warn!("Config file '{}' does not exist. Proceeding with defaults.", args.cfg_file.display());
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(&args.cfg_file)?;
        Self::load_from_str(&config_content)
    }

    pub fn load_from_str(config_str: &str) -> Result<Self, AppError> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        validate_time_steps(self.simulation.time_steps)
            .and_then(|_| validate_pressure_threshold(self.simulation.pressure_threshold))
            .map_err(|e| AppError::ConfigError(e.to_string()))
    }
}
