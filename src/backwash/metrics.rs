use super::ds::{BackwashEvent, FoulingStatus, PressureSeries, WaterQualityParameters};
use crate::utils::round_to;
use serde::{Deserialize, Serialize};

const MIN_EFFICIENCY: f64 = 0.5;
const VARIANCE_SCALE: f64 = 10.0;
const FREQUENT_INTERVAL: f64 = 5.0;
const INFREQUENT_INTERVAL: f64 = 15.0;
const FREQUENT_PENALTY: f64 = 0.9;
const INFREQUENT_PENALTY: f64 = 0.95;
const LOW_EFFICIENCY: f64 = 0.7;

/// Mean of the positive step-to-step changes. Backwash drops are ignored.
pub fn fouling_rate(values: &[f64]) -> f64 {
    let rising: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).filter(|d| *d > 0.0).collect();
    if rising.is_empty() {
        return 0.0;
    }
    rising.iter().sum::<f64>() / rising.len() as f64
}

fn variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn mean_interval(time_steps: usize, events: &[BackwashEvent]) -> Option<f64> {
    (!events.is_empty()).then(|| time_steps as f64 / events.len() as f64)
}

/// Pressure stability, penalized when backwashes are too frequent or too rare.
pub fn efficiency(values: &[f64], events: &[BackwashEvent]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut efficiency = (1.0 - variance(values) / VARIANCE_SCALE).max(MIN_EFFICIENCY);
    match mean_interval(values.len(), events) {
        Some(interval) if interval < FREQUENT_INTERVAL => efficiency *= FREQUENT_PENALTY,
        Some(interval) if interval > INFREQUENT_INTERVAL => efficiency *= INFREQUENT_PENALTY,
        _ => {}
    }
    efficiency.min(1.0)
}

pub fn recommendations(
    params: &WaterQualityParameters, fouling: FoulingStatus, events: &[BackwashEvent], efficiency: f64,
    time_steps: usize,
) -> Vec<String> {
    let mut out = Vec::new();

    if (params.ph - 7.0).abs() > 1.0 {
        out.push("Consider adjusting pH closer to neutral (7.0) for optimal performance");
    }
    if params.temperature > 30.0 {
        out.push("High temperature detected - monitor fouling rate closely");
    } else if params.temperature < 20.0 {
        out.push("Low temperature may reduce system efficiency");
    }
    if params.turbidity > 1.0 {
        out.push("High turbidity detected - consider pre-treatment");
    }
    if fouling.is_severe() {
        out.push("Severe fouling detected - consider chemical cleaning");
    }
    if efficiency < LOW_EFFICIENCY {
        out.push("System efficiency is low - review operational parameters");
    }
    match mean_interval(time_steps, events) {
        Some(interval) if interval < FREQUENT_INTERVAL => {
            out.push("Backwash frequency is high - consider optimizing parameters")
        }
        Some(interval) if interval > INFREQUENT_INTERVAL => {
            out.push("Backwash frequency is low - monitor pressure closely")
        }
        _ => {}
    }
    if out.is_empty() {
        out.push("System operating within optimal parameters");
    }
    out.into_iter().map(str::to_owned).collect()
}

/// `prediction_data` of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub pressure_data: Vec<f64>,
    #[serde(default)]
    pub backwash_points: Vec<BackwashEvent>,
    pub fouling_rate: f64,
    pub efficiency: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

impl Forecast {
    pub fn from_series(
        series: PressureSeries, params: &WaterQualityParameters, fouling: FoulingStatus,
        confidence_score: Option<f64>,
    ) -> Self {
        let fouling_rate = fouling_rate(&series.values);
        let efficiency = efficiency(&series.values, &series.events);
        let recommendations = recommendations(params, fouling, &series.events, efficiency, series.len());
        Self {
            pressure_data: series.values.iter().map(|p| round_to(*p, 2)).collect(),
            backwash_points: series.events,
            fouling_rate: round_to(fouling_rate, 3),
            efficiency: round_to(efficiency, 3),
            recommendations,
            confidence_score,
        }
    }
}
