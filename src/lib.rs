//! ssetop library surface, exposed so integration tests can exercise the
//! telemetry client, stream decoding and profile handling directly.

pub mod app;
pub mod client;
pub mod history;
pub mod profiles;
pub mod sse;
pub mod types;
pub mod ui;
