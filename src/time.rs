use chrono::{SecondsFormat, TimeZone, Utc};
use std::{fmt::Debug, sync::Arc};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

pub trait TimeProvider: Send + Sync + Debug {
    fn now(&self) -> i64; // Returns the current time as a Unix UTC timestamp

    fn now_rfc3339(&self) -> String {
        match Utc.timestamp_opt(self.now(), 0).single() {
            Some(time) => time.to_rfc3339_opts(SecondsFormat::Secs, true),
            None => String::new(),
        }
    }
}

#[derive(Debug)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Log timestamps taken from a [`TimeProvider`] instead of the wall clock.
pub struct ProviderTimeFormatter<T: TimeProvider> {
    pub time_provider: Arc<T>,
}

impl<T: TimeProvider> FormatTime for ProviderTimeFormatter<T> {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", self.time_provider.now_rfc3339())
    }
}
