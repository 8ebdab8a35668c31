use backwash::api::{run_web_server, AppState, PredictionRequest};
use backwash::backwash::metrics::Forecast;
use backwash::config::run_options::{get_args, Args, Command};
use backwash::config::{Config, DEFAULT_LOG_LEVEL};
use backwash::error::AppError;
use backwash::prediction::interface::RemotePredictionClient;
use backwash::prediction::{forecast, Source};
use backwash::time::RealTimeProvider;
use backwash::utils::start_log;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Serialize;
use std::{error::Error, sync::Arc};
use tracing::info;

#[derive(Serialize)]
struct ForecastOutput {
    source: Source,
    prediction_data: Forecast,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let log = start_log::<RealTimeProvider>(DEFAULT_LOG_LEVEL, None);
    let args = get_args()?;
    if args.help {
        return Ok(());
    }
    let mut cfg = Config::load(&args)?;
    if args.seed.is_some() {
        cfg.simulation.seed = args.seed;
    }
    if let Some(log) = &log {
        log.set_level(&cfg.log.level)?;
    }

    info!("Starting application...");
    match args.command {
        Command::Serve => run_web_server(AppState::new(cfg, Arc::new(RealTimeProvider))).await?,
        Command::Forecast => run_forecast(&cfg, &args).await?,
    }
    Ok(())
}

async fn run_forecast(cfg: &Config, args: &Args) -> Result<(), AppError> {
    let mut rng = match cfg.simulation.seed {
        Some(s) => Pcg64::seed_from_u64(s),
        None => Pcg64::from_entropy(),
    };
    let request = PredictionRequest::new(args.params, &cfg.simulation.settings());
    let client = if args.offline { None } else { Some(RemotePredictionClient::new(&cfg.prediction_api)?) };

    let (prediction_data, source) = forecast(client.as_ref(), &request, &mut rng).await?;
    println!("{}", serde_json::to_string_pretty(&ForecastOutput { source, prediction_data })?);
    Ok(())
}
