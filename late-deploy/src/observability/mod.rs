//! Logging setup for hosts that do not install their own subscriber.

mod subscriber;

pub use subscriber::{init_json_tracing, init_tracing, DEFAULT_FILTER};
