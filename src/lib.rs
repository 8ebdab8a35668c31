pub mod api;
pub mod backwash;
pub mod config;
pub mod error;
pub mod prediction;
pub mod test;
pub mod time;
pub mod utils;
