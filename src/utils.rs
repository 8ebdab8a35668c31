use crate::time::{ProviderTimeFormatter, TimeProvider};
use std::{env, sync::Arc};
use tracing::trace;
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter of the installed subscriber. Lets the level from the config file apply once it is loaded.
pub struct LogHandle(reload::Handle<EnvFilter, Registry>);

impl LogHandle {
    /// No-op while `RUST_LOG` is set.
    pub fn set_level(&self, level: &str) -> Result<(), reload::Error> {
        if env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            return Ok(());
        }
        self.0.reload(EnvFilter::new(level))
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `default_filter`.
/// When a time provider is given, log lines are stamped with its clock.
/// Returns `None` when a subscriber is already installed.
pub fn start_log<T: TimeProvider + 'static>(default_filter: &str, time_provider: Option<Arc<T>>) -> Option<LogHandle> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let (filter, handle) = reload::Layer::new(env_filter);
    let registry = tracing_subscriber::registry().with(filter);
    let res = match time_provider {
        Some(time_provider) => registry.with(fmt::layer().with_timer(ProviderTimeFormatter { time_provider })).try_init(),
        None => registry.with(fmt::layer()).try_init(),
    };
    match res {
        Ok(()) => Some(LogHandle(handle)),
        Err(_) => {
            // tests call this repeatedly
            trace!("Global subscriber already installed.");
            None
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod test {
    use crate::test::utils::mock_time::MockTimeProvider;
    use crate::utils::{round_to, start_log};
    use std::sync::Arc;
    use tracing::{debug, info};

    #[test]
    fn rounding() {
        assert_eq!(round_to(4.368, 1), 4.4);
        assert_eq!(round_to(5.4321, 2), 5.43);
        assert_eq!(round_to(-0.25, 1), -0.3);
        assert!(round_to(f64::NAN, 1).is_nan());
    }

    #[test]
    fn log_with_injected_clock() {
        let clock = Arc::new(MockTimeProvider::new(1_705_314_600));
        // the only subscriber installed in this test binary
        let log = start_log("warn", Some(clock.clone())).unwrap();
        info!("filtered out");
        log.set_level("debug").unwrap();
        clock.advance_time(90);
        debug!("stamped by the mock clock");

        assert!(start_log("info", Some(clock)).is_none());
    }
}
