use crate::{
    backwash::{
        ds::{FoulingStatus, ParameterCurves, SimulationSettings, WaterQualityParameters},
        metrics::Forecast,
        simulator::{simulate_curves, simulate_with},
        validation::{
            parameter_ranges, validate_curves, validate_parameters, validate_pressure_threshold,
            validate_time_steps, ParamRange,
        },
        DEFAULT_TIME_STEPS, MAX_TIME_STEPS, MODEL_VERSION, PRESSURE_THRESHOLD,
    },
    config::Config,
    error::AppError,
    time::TimeProvider,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const PREDICT_ROUTE: &str = "/api/predict";
pub const PREDICT_ADVANCED_ROUTE: &str = "/api/predict/advanced";
pub const MODEL_INFO_ROUTE: &str = "/api/model/info";
pub const HEALTH_ROUTE: &str = "/api/health";

const PREDICT_CONFIDENCE: f64 = 0.9;
const CURVES_CONFIDENCE: f64 = 0.85;

fn default_fouling_status() -> String {
    FoulingStatus::Clean.to_string()
}

fn default_time_steps() -> usize {
    DEFAULT_TIME_STEPS
}

fn default_pressure_threshold() -> f64 {
    PRESSURE_THRESHOLD
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub parameters: WaterQualityParameters,
    #[serde(default = "default_fouling_status")]
    pub fouling_status: String,
    #[serde(default = "default_time_steps")]
    pub time_steps: usize,
    #[serde(default = "default_pressure_threshold")]
    pub pressure_threshold: f64,
}

impl PredictionRequest {
    pub fn new(parameters: WaterQualityParameters, settings: &SimulationSettings) -> Self {
        Self {
            parameters,
            fouling_status: settings.fouling.to_string(),
            time_steps: settings.time_steps,
            pressure_threshold: settings.pressure_threshold,
        }
    }

    /// Validated simulation settings for this request.
    pub fn settings(&self) -> Result<SimulationSettings, AppError> {
        validate_parameters(&self.parameters)?;
        validate_time_steps(self.time_steps)?;
        validate_pressure_threshold(self.pressure_threshold)?;
        Ok(SimulationSettings {
            time_steps: self.time_steps,
            pressure_threshold: self.pressure_threshold,
            fouling: self.fouling_status.parse()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdvancedPredictionRequest {
    pub parameters: WaterQualityParameters,
    #[serde(default)]
    pub curve_data: Option<ParameterCurves>,
    #[serde(default = "default_fouling_status")]
    pub fouling_status: String,
    #[serde(default = "default_time_steps")]
    pub time_steps: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PredictionMetadata {
    #[serde(default)]
    pub model_version: String,
    #[serde(default)]
    pub prediction_timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_curve_data: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionResponse {
    pub success: bool,
    pub prediction_data: Forecast,
    #[serde(default)]
    pub metadata: PredictionMetadata,
}

#[derive(Serialize, Debug, Clone)]
pub struct ModelInfoResponse {
    pub model_version: &'static str,
    pub supported_parameters: BTreeMap<&'static str, ParamRange>,
    pub fouling_statuses: Vec<FoulingStatus>,
    pub pressure_threshold: f64,
    pub max_time_steps: usize,
}

#[derive(Serialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub model_status: &'static str,
}

#[derive(Serialize, Debug, Clone)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Debug)]
pub struct AppState {
    pub cfg: Config,
    pub time_provider: Arc<dyn TimeProvider>,
    pub rng: Mutex<Pcg64>,
}

impl AppState {
    pub fn new(cfg: Config, time_provider: Arc<dyn TimeProvider>) -> Arc<Self> {
        let rng = match cfg.simulation.seed {
            Some(s) => Pcg64::seed_from_u64(s),
            None => Pcg64::from_entropy(),
        };
        Arc::new(Self { cfg, time_provider, rng: Mutex::new(rng) })
    }

    fn metadata(&self, confidence_score: Option<f64>, uses_curve_data: Option<bool>) -> PredictionMetadata {
        PredictionMetadata {
            model_version: MODEL_VERSION.to_owned(),
            prediction_timestamp: self.time_provider.now_rfc3339(),
            confidence_score,
            uses_curve_data,
        }
    }
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse { message: "Intelligent UF Backwash API", version: MODEL_VERSION })
}

pub async fn health(State(app_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy", timestamp: app_state.time_provider.now_rfc3339(), model_status: "ready" })
}

pub async fn model_info(State(app_state): State<Arc<AppState>>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        model_version: MODEL_VERSION,
        supported_parameters: parameter_ranges().into_iter().collect(),
        fouling_statuses: FoulingStatus::ALL.to_vec(),
        pressure_threshold: app_state.cfg.simulation.pressure_threshold,
        max_time_steps: MAX_TIME_STEPS,
    })
}

pub async fn predict(
    State(app_state): State<Arc<AppState>>, Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, AppError> {
    let settings = request.settings()?;
    debug!(?settings, "Prediction requested.");

    let series = {
        let mut rng = app_state.rng.lock().await;
        simulate_with(&request.parameters, &settings, &mut *rng)
    };
    info!(events = series.events.len(), "Prediction generated.");

    let forecast = Forecast::from_series(series, &request.parameters, settings.fouling, Some(PREDICT_CONFIDENCE));
    Ok(Json(PredictionResponse {
        success: true,
        prediction_data: forecast,
        metadata: app_state.metadata(Some(PREDICT_CONFIDENCE), None),
    }))
}

pub async fn predict_advanced(
    State(app_state): State<Arc<AppState>>, Json(request): Json<AdvancedPredictionRequest>,
) -> Result<Json<PredictionResponse>, AppError> {
    validate_parameters(&request.parameters)?;
    validate_time_steps(request.time_steps)?;
    let curves = request.curve_data.unwrap_or_default();
    validate_curves(&curves)?;
    let settings = SimulationSettings {
        time_steps: request.time_steps,
        pressure_threshold: app_state.cfg.simulation.pressure_threshold,
        fouling: request.fouling_status.parse()?,
    };
    debug!(?settings, uses_curve_data = !curves.is_empty(), "Advanced prediction requested.");

    let series = {
        let mut rng = app_state.rng.lock().await;
        simulate_curves(&request.parameters, &curves, &settings, &mut *rng)
    };
    // recommendations follow the conditions at the end of the horizon
    let last = curves.resolve(&request.parameters, settings.time_steps).last().copied().unwrap_or(request.parameters);
    let forecast = Forecast::from_series(series, &last, settings.fouling, Some(CURVES_CONFIDENCE));

    Ok(Json(PredictionResponse {
        success: true,
        prediction_data: forecast,
        metadata: app_state.metadata(None, Some(!curves.is_empty())),
    }))
}

pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route(HEALTH_ROUTE, get(health))
        .route(MODEL_INFO_ROUTE, get(model_info))
        .route(PREDICT_ROUTE, post(predict))
        .route(PREDICT_ADVANCED_ROUTE, post(predict_advanced))
        .with_state(app_state)
}

pub async fn run_web_server(app_state: Arc<AppState>) -> Result<(), AppError> {
    let addr: SocketAddr = app_state
        .cfg
        .web_server
        .address
        .parse()
        .map_err(|e| AppError::ConfigError(format!("invalid web server address: {}", e)))?;
    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down HTTP server.");
            shutdown.graceful_shutdown(None);
        }
    });

    info!("Starting HTTP server on http://{}", addr);
    axum_server::bind(addr).handle(handle).serve(router(app_state).into_make_service()).await?;
    Ok(())
}
