pub mod interface;

use crate::{
    api::PredictionRequest,
    backwash::{metrics::Forecast, simulator::simulate_with},
    error::AppError,
};
use interface::PredictionClient;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Local,
}

/// Prefer the prediction service; on any failure (or without a client) simulate locally.
/// Only an invalid request is an error.
pub async fn forecast<C, R>(
    client: Option<&C>, request: &PredictionRequest, rng: &mut R,
) -> Result<(Forecast, Source), AppError>
where
    C: PredictionClient + ?Sized,
    R: Rng + ?Sized,
{
    let settings = request.settings()?;

    if let Some(client) = client {
        match client.predict(request).await {
            Ok(response) => return Ok((response.prediction_data, Source::Remote)),
            Err(e) => warn!("API prediction failed, using local fallback: {}", e),
        }
    }

    let series = simulate_with(&request.parameters, &settings, rng);
    info!(events = series.events.len(), "Local forecast generated.");
    Ok((Forecast::from_series(series, &request.parameters, settings.fouling, None), Source::Local))
}
