use super::{
    calculator::{compute_with, ph_factor, temp_factor},
    ds::{BackwashEvent, ParameterCurves, PressureSeries, SimulationSettings, WaterQualityParameters},
    BASE_PRESSURE, BASE_TREND, COOLDOWN_STEPS, EXTRA_DROP_EFFECTIVENESS, EXTRA_DROP_FACTOR, JITTER_SPAN,
    PRESSURE_DROP_FACTOR, TREND_DAMPING_BASE, TREND_DAMPING_GAIN, TURBIDITY_PRESSURE_GAIN, TURBIDITY_TREND_GAIN,
};
use rand::Rng;
use tracing::{debug, trace};

/// Sentinel for "no backwash yet". Kept signed so the first event also has to wait out the cooldown.
const NO_EVENT_STEP: i64 = -1;

pub fn initial_pressure(turbidity: f64) -> f64 {
    BASE_PRESSURE + TURBIDITY_PRESSURE_GAIN * turbidity
}

pub fn base_trend(turbidity: f64) -> f64 {
    BASE_TREND + TURBIDITY_TREND_GAIN * turbidity
}

fn is_triggerable(pressure: f64, step: usize, last_event_step: i64, threshold: f64) -> bool {
    pressure >= threshold && step as i64 - last_event_step > COOLDOWN_STEPS
}

fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..JITTER_SPAN)
}

/// Synthesize the default 20 step pressure series on a clean membrane.
pub fn simulate<R: Rng + ?Sized>(params: &WaterQualityParameters, rng: &mut R) -> PressureSeries {
    simulate_with(params, &SimulationSettings::default(), rng)
}

/// Forward simulation with feedback: every backwash halves the pressure and permanently
/// dampens the fouling trend according to its effectiveness.
pub fn simulate_with<R: Rng + ?Sized>(
    params: &WaterQualityParameters, settings: &SimulationSettings, rng: &mut R,
) -> PressureSeries {
    let mut series = PressureSeries::with_capacity(settings.time_steps);
    let mut current = initial_pressure(params.turbidity);
    let mut trend = base_trend(params.turbidity) * settings.fouling.factor() * temp_factor(params.temperature);
    let mut last_event_step = NO_EVENT_STEP;

    for step in 0..settings.time_steps {
        series.values.push(current);

        if is_triggerable(current, step, last_event_step, settings.pressure_threshold) {
            let bw = compute_with(current, params, settings.fouling, rng);
            debug!(step, pressure = current, intensity = bw.intensity, duration = bw.duration, "Backwash triggered.");
            series.events.push(BackwashEvent::new(step, current, bw));
            last_event_step = step as i64;

            current *= 1.0 - PRESSURE_DROP_FACTOR;
            let effectiveness = bw.effectiveness();
            trend *= TREND_DAMPING_BASE - effectiveness * TREND_DAMPING_GAIN;
            if effectiveness > EXTRA_DROP_EFFECTIVENESS {
                current *= EXTRA_DROP_FACTOR;
            }
            trace!(effectiveness, trend, "Trend dampened.");
        }

        current += trend + jitter(rng);
    }
    series
}

/// Same loop driven by per-step parameters. The trend is recomputed from each step's
/// parameters, so a backwash only applies the pressure drop.
pub fn simulate_curves<R: Rng + ?Sized>(
    base: &WaterQualityParameters, curves: &ParameterCurves, settings: &SimulationSettings, rng: &mut R,
) -> PressureSeries {
    let profile = curves.resolve(base, settings.time_steps);
    let mut series = PressureSeries::with_capacity(settings.time_steps);
    let Some(first) = profile.first() else {
        return series;
    };
    let mut current = initial_pressure(first.turbidity);
    let mut last_event_step = NO_EVENT_STEP;

    for (step, params) in profile.iter().enumerate() {
        series.values.push(current);
        let trend = base_trend(params.turbidity)
            * settings.fouling.factor()
            * temp_factor(params.temperature)
            * ph_factor(params.ph);

        if is_triggerable(current, step, last_event_step, settings.pressure_threshold) {
            let bw = compute_with(current, params, settings.fouling, rng);
            debug!(step, pressure = current, intensity = bw.intensity, duration = bw.duration, "Backwash triggered.");
            series.events.push(BackwashEvent::new(step, current, bw));
            last_event_step = step as i64;
            current *= 1.0 - PRESSURE_DROP_FACTOR;
        }

        current += trend + jitter(rng);
    }
    series
}
