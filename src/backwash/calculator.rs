use super::{
    ds::{BackwashParams, FoulingStatus, WaterQualityParameters},
    BACKWASH_DURATIONS, INTENSITY_GAIN, NEUTRAL_PH, PH_GAIN, PRESSURE_THRESHOLD, REFERENCE_TEMPERATURE,
    REFERENCE_TURBIDITY, TURBIDITY_FLOOR, TURBIDITY_GAIN,
};
use crate::utils::round_to;
use rand::Rng;

/// Deviation from neutral pH raises intensity linearly.
pub fn ph_factor(ph: f64) -> f64 {
    (ph - NEUTRAL_PH).abs() * PH_GAIN + 1.0
}

pub fn temp_factor(temperature: f64) -> f64 {
    temperature / REFERENCE_TEMPERATURE
}

pub fn turb_factor(turbidity: f64) -> f64 {
    (turbidity / REFERENCE_TURBIDITY) * TURBIDITY_GAIN + TURBIDITY_FLOOR
}

/// Backwash intensity and duration for a reading on a clean membrane.
/// Inputs are not validated: NaN in gives NaN intensity out.
pub fn compute<R: Rng + ?Sized>(pressure: f64, params: &WaterQualityParameters, rng: &mut R) -> BackwashParams {
    compute_with(pressure, params, FoulingStatus::Clean, rng)
}

/// Intensity is always measured from [`PRESSURE_THRESHOLD`], whatever threshold triggered the event.
pub fn compute_with<R: Rng + ?Sized>(
    pressure: f64, params: &WaterQualityParameters, fouling: FoulingStatus, rng: &mut R,
) -> BackwashParams {
    let base_intensity = (pressure - PRESSURE_THRESHOLD) * INTENSITY_GAIN * fouling.factor();
    let intensity =
        base_intensity * ph_factor(params.ph) * temp_factor(params.temperature) * turb_factor(params.turbidity);
    let duration = BACKWASH_DURATIONS[rng.gen_range(0..BACKWASH_DURATIONS.len())];

    BackwashParams { intensity: round_to(intensity, 1), duration }
}
