pub mod mock_client;
pub mod mock_time;

use crate::{api::AppState, config::Config};
use mock_time::MockTimeProvider;
use rand::rngs::mock::StepRng;
use std::sync::Arc;

/// Test config with a fixed seed.
pub fn mock_cfg() -> Config {
    Config::load_from_str(
        r#"
        [web_server]
        address = "127.0.0.1:0"

        [simulation]
        seed = 42

        [log]
        level = "debug"
        "#,
    )
    .unwrap()
}

pub fn set_app_state(start_time: i64) -> Arc<AppState> {
    set_app_state_with(mock_cfg(), start_time)
}

pub fn set_app_state_with(cfg: Config, start_time: i64) -> Arc<AppState> {
    AppState::new(cfg, Arc::new(MockTimeProvider::new(start_time)))
}

/// Zero jitter, and always the shortest backwash duration.
pub fn no_noise() -> StepRng {
    StepRng::new(0, 0)
}
