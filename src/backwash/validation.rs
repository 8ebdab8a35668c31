use super::{
    ds::{ParameterCurves, WaterQualityParameters},
    MAX_TIME_STEPS,
};
use crate::error::AppError;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

impl ParamRange {
    const fn new(min: f64, max: f64, unit: &'static str) -> Self {
        Self { min, max, unit }
    }

    /// NaN is never in range.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const TURBIDITY_RANGE: ParamRange = ParamRange::new(0.0, 2.0, "NTU");
pub const PH_RANGE: ParamRange = ParamRange::new(4.0, 10.0, "");
pub const TEMPERATURE_RANGE: ParamRange = ParamRange::new(15.0, 35.0, "°C");
pub const FLOW_RATE_RANGE: ParamRange = ParamRange::new(10.0, 50.0, "GPM");
pub const INLET_PRESSURE_RANGE: ParamRange = ParamRange::new(20.0, 80.0, "PSIG");
pub const PRESSURE_THRESHOLD_RANGE: ParamRange = ParamRange::new(1.0, 15.0, "PSIG");

pub fn parameter_ranges() -> [(&'static str, ParamRange); 5] {
    [
        ("turbidity", TURBIDITY_RANGE),
        ("ph", PH_RANGE),
        ("temperature", TEMPERATURE_RANGE),
        ("flow_rate", FLOW_RATE_RANGE),
        ("inlet_pressure", INLET_PRESSURE_RANGE),
    ]
}

fn check(name: &str, value: f64, range: ParamRange) -> Result<(), AppError> {
    if range.contains(value) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Parameter {} value {} is out of range [{}, {}] {}",
            name, value, range.min, range.max, range.unit
        )))
    }
}

pub fn validate_parameters(params: &WaterQualityParameters) -> Result<(), AppError> {
    check("turbidity", params.turbidity, TURBIDITY_RANGE)?;
    check("ph", params.ph, PH_RANGE)?;
    check("temperature", params.temperature, TEMPERATURE_RANGE)?;
    check("flow_rate", params.flow_rate, FLOW_RATE_RANGE)?;
    check("inlet_pressure", params.inlet_pressure, INLET_PRESSURE_RANGE)
}

pub fn validate_time_steps(time_steps: usize) -> Result<(), AppError> {
    if (1..=MAX_TIME_STEPS).contains(&time_steps) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Time steps {} is out of range [1, {}]",
            time_steps, MAX_TIME_STEPS
        )))
    }
}

pub fn validate_pressure_threshold(threshold: f64) -> Result<(), AppError> {
    check("pressure_threshold", threshold, PRESSURE_THRESHOLD_RANGE)
}

/// Curves only have to be present and numeric; values are not range checked.
pub fn validate_curves(curves: &ParameterCurves) -> Result<(), AppError> {
    let named = [
        ("turbidity_curve", &curves.turbidity_curve),
        ("ph_curve", &curves.ph_curve),
        ("temperature_curve", &curves.temperature_curve),
    ];
    for (name, curve) in named {
        let Some(curve) = curve else { continue };
        if curve.is_empty() {
            return Err(AppError::ValidationError(format!("Curve {} is empty", name)));
        }
        if let Some(idx) = curve.iter().position(|v| !v.is_finite()) {
            return Err(AppError::ValidationError(format!(
                "Curve {} contains non-numeric value at index {}",
                name, idx
            )));
        }
    }
    Ok(())
}
