use crate::{
    api::{PredictionRequest, PredictionResponse, PREDICT_ROUTE},
    config::PredictionApi,
    error::AppError,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, AppError>;
}

pub struct RemotePredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemotePredictionClient {
    pub fn new(cfg: &PredictionApi) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(cfg.timeout_secs)).build()?;
        Ok(Self { http, base_url: cfg.base_url.trim_end_matches('/').to_owned() })
    }
}

#[async_trait]
impl PredictionClient for RemotePredictionClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, AppError> {
        let url = format!("{}{}", self.base_url, PREDICT_ROUTE);
        let response = self.http.post(&url).json(request).send().await?;
        if !response.status().is_success() {
            return Err(AppError::ApiError(format!("Prediction request failed: {:?}", response.status())));
        }
        let body: PredictionResponse = response.json().await?;
        if !body.success {
            return Err(AppError::ApiError("Prediction service returned an unsuccessful response".to_owned()));
        }
        debug!(url = %url, points = body.prediction_data.backwash_points.len(), "Remote prediction received.");
        Ok(body)
    }
}
