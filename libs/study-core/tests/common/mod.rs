//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod fixtures;

use chrono::{DateTime, TimeZone, Utc};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fixed session start so timestamps in assertions are stable.
pub fn session_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 19, 30, 0).unwrap()
}
