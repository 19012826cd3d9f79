//! Sentinel: leveraged position exit engine.
//!
//! This is the root crate that provides benchmark and integration-test
//! access to the internal modules. For actual functionality, use the
//! individual crates directly:
//!
//! - `sentinel-core`: position types, configuration, errors
//! - `exit-engine`: factory, exit evaluation pipeline, trailing stops, closer
//! - `risk-manager`: pre-trade risk gate

// Re-export for benchmarks
pub use exit_engine as engine;
pub use risk_manager as risk;
pub use sentinel_core as core;
