use crate::api::{PredictionMetadata, PredictionRequest, PredictionResponse};
use crate::backwash::metrics::Forecast;
use crate::error::AppError;
use crate::prediction::interface::PredictionClient;
use async_trait::async_trait;
use mockall::mock;
use tracing::trace;

mock! {
    pub PredictionClient {}

    #[async_trait]
    impl PredictionClient for PredictionClient {
        async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, AppError>;
    }
}

pub fn remote_forecast() -> Forecast {
    Forecast {
        pressure_data: vec![5.0; 20],
        backwash_points: vec![],
        fouling_rate: 0.0,
        efficiency: 1.0,
        recommendations: vec!["from remote".to_owned()],
        confidence_score: Some(0.9),
    }
}

/// Answers every request with [`remote_forecast`].
pub fn set_client_ok() -> MockPredictionClient {
    let mut mock_client = MockPredictionClient::new();
    mock_client.expect_predict().times(1..).returning(|request| {
        trace!(?request, "Mocked remote prediction.");
        Ok(PredictionResponse {
            success: true,
            prediction_data: remote_forecast(),
            metadata: PredictionMetadata::default(),
        })
    });
    mock_client
}

/// Fails every request as an unreachable service would.
pub fn set_client_err() -> MockPredictionClient {
    let mut mock_client = MockPredictionClient::new();
    mock_client.expect_predict().times(1..).returning(|_| Err(AppError::ApiError("connection refused".to_owned())));
    mock_client
}

/// Must never be called.
pub fn set_client_unused() -> MockPredictionClient {
    let mut mock_client = MockPredictionClient::new();
    mock_client.expect_predict().times(0);
    mock_client
}
