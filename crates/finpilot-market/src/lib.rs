//! Market-data tool handlers for the Finpilot assistant.
//!
//! Each handler is a thin, validated fetch against the internal data API:
//! it checks its parameters, issues one HTTP GET through the shared
//! `MarketDataClient`, and passes the response body through as
//! `serde_json::Value`. Interpretation of the data is the synthesizer's job.

pub mod client;
pub mod tools;

pub use client::MarketDataClient;
pub use tools::default_tools;
