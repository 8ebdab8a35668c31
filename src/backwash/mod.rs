pub mod calculator;
pub mod ds;
pub mod metrics;
pub mod simulator;
pub mod validation;

/// PSIG at or above which a backwash is triggered
pub const PRESSURE_THRESHOLD: f64 = 7.0;
/// Fraction of the pressure removed by a backwash
pub const PRESSURE_DROP_FACTOR: f64 = 0.5;
/// Seconds
pub const BACKWASH_DURATIONS: [u32; 4] = [140, 220, 360, 460];
pub const DEFAULT_TIME_STEPS: usize = 20;
pub const MAX_TIME_STEPS: usize = 50;
/// An event may only fire when more than this many steps passed since the previous one.
pub const COOLDOWN_STEPS: i64 = 4;

// Empirically tuned demo constants.
pub const INTENSITY_GAIN: f64 = 1.5;
pub const NEUTRAL_PH: f64 = 7.0;
pub const PH_GAIN: f64 = 0.1;
pub const REFERENCE_TEMPERATURE: f64 = 25.0;
pub const REFERENCE_TURBIDITY: f64 = 0.5;
pub const TURBIDITY_GAIN: f64 = 0.2;
pub const TURBIDITY_FLOOR: f64 = 0.8;
pub const BASE_PRESSURE: f64 = 4.0;
pub const TURBIDITY_PRESSURE_GAIN: f64 = 2.0;
pub const BASE_TREND: f64 = 0.3;
pub const TURBIDITY_TREND_GAIN: f64 = 0.2;
pub const INTENSITY_EFFECT_SCALE: f64 = 10.0;
pub const DURATION_EFFECT_SCALE: f64 = 300.0;
pub const TREND_DAMPING_BASE: f64 = 0.9;
pub const TREND_DAMPING_GAIN: f64 = 0.2;
pub const EXTRA_DROP_EFFECTIVENESS: f64 = 1.2;
pub const EXTRA_DROP_FACTOR: f64 = 0.95;
/// Upper bound of the uniform per-step noise, PSIG
pub const JITTER_SPAN: f64 = 0.2;

pub const MODEL_VERSION: &str = "1.0.0";
