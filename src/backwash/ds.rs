use super::{
    BACKWASH_DURATIONS, DEFAULT_TIME_STEPS, DURATION_EFFECT_SCALE, INTENSITY_EFFECT_SCALE, PRESSURE_THRESHOLD,
};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

fn default_flow_rate() -> f64 {
    20.0
}

fn default_inlet_pressure() -> f64 {
    40.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterQualityParameters {
    pub turbidity: f64,
    pub ph: f64,
    /// °C
    pub temperature: f64,
    /// GPM. Carried for the wire format, not used by the local model.
    #[serde(default = "default_flow_rate")]
    pub flow_rate: f64,
    /// PSIG. Carried for the wire format, not used by the local model.
    #[serde(default = "default_inlet_pressure")]
    pub inlet_pressure: f64,
}

impl WaterQualityParameters {
    pub fn new(ph: f64, temperature: f64, turbidity: f64) -> Self {
        Self { turbidity, ph, temperature, flow_rate: default_flow_rate(), inlet_pressure: default_inlet_pressure() }
    }
}

impl Default for WaterQualityParameters {
    fn default() -> Self {
        Self::new(7.0, 25.0, 0.5)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoulingStatus {
    #[default]
    Clean,
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl FoulingStatus {
    pub const ALL: [FoulingStatus; 5] =
        [FoulingStatus::Clean, FoulingStatus::Mild, FoulingStatus::Moderate, FoulingStatus::Severe, FoulingStatus::Critical];

    pub fn factor(self) -> f64 {
        match self {
            FoulingStatus::Clean => 1.0,
            FoulingStatus::Mild => 1.2,
            FoulingStatus::Moderate => 1.5,
            FoulingStatus::Severe => 1.8,
            FoulingStatus::Critical => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FoulingStatus::Clean => "clean",
            FoulingStatus::Mild => "mild",
            FoulingStatus::Moderate => "moderate",
            FoulingStatus::Severe => "severe",
            FoulingStatus::Critical => "critical",
        }
    }

    pub fn is_severe(self) -> bool {
        matches!(self, FoulingStatus::Severe | FoulingStatus::Critical)
    }
}

impl fmt::Display for FoulingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FoulingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FoulingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::ValidationError(format!("Invalid fouling status: {}", s)))
    }
}

/// Intensity and duration of one backwash cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackwashParams {
    /// W, one decimal place
    pub intensity: f64,
    /// Seconds, one of [`BACKWASH_DURATIONS`]
    pub duration: u32,
}

impl BackwashParams {
    /// How much a backwash slows down subsequent fouling.
    pub fn effectiveness(&self) -> f64 {
        (self.intensity / INTENSITY_EFFECT_SCALE + self.duration as f64 / DURATION_EFFECT_SCALE) / 2.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackwashReason {
    #[default]
    PressureThresholdExceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackwashEvent {
    pub time_step: usize,
    #[serde(rename = "pressure")]
    pub pressure_at_trigger: f64,
    pub intensity: f64,
    pub duration: u32,
    #[serde(default)]
    pub reason: BackwashReason,
}

impl BackwashEvent {
    pub fn new(time_step: usize, pressure_at_trigger: f64, params: BackwashParams) -> Self {
        Self {
            time_step,
            pressure_at_trigger,
            intensity: params.intensity,
            duration: params.duration,
            reason: BackwashReason::PressureThresholdExceeded,
        }
    }

    pub fn has_valid_duration(&self) -> bool {
        BACKWASH_DURATIONS.contains(&self.duration)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PressureSeries {
    /// PSIG, one reading per time step
    pub values: Vec<f64>,
    /// Ascending by `time_step`
    pub events: Vec<BackwashEvent>,
}

impl PressureSeries {
    pub fn with_capacity(time_steps: usize) -> Self {
        Self { values: Vec::with_capacity(time_steps), events: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    pub time_steps: usize,
    pub pressure_threshold: f64,
    pub fouling: FoulingStatus,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self { time_steps: DEFAULT_TIME_STEPS, pressure_threshold: PRESSURE_THRESHOLD, fouling: FoulingStatus::Clean }
    }
}

/// Time-varying inputs. Missing curves hold the base value for the whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterCurves {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turbidity_curve: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_curve: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_curve: Option<Vec<f64>>,
}

impl ParameterCurves {
    pub fn is_empty(&self) -> bool {
        self.turbidity_curve.is_none() && self.ph_curve.is_none() && self.temperature_curve.is_none()
    }

    /// Per-step parameters: each curve is padded with the base value or truncated to `time_steps`.
    pub fn resolve(&self, base: &WaterQualityParameters, time_steps: usize) -> Vec<WaterQualityParameters> {
        let sample = |curve: &Option<Vec<f64>>, step: usize, default: f64| {
            curve.as_ref().and_then(|c| c.get(step).copied()).unwrap_or(default)
        };
        (0..time_steps)
            .map(|step| WaterQualityParameters {
                turbidity: sample(&self.turbidity_curve, step, base.turbidity),
                ph: sample(&self.ph_curve, step, base.ph),
                temperature: sample(&self.temperature_curve, step, base.temperature),
                ..*base
            })
            .collect()
    }
}
