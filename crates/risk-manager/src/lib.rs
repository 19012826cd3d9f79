//! Risk Manager
//!
//! Pre-trade risk gate: rate limits, loss pauses, daily loss limits, and
//! balance sanity checks for trading safety.

pub mod gate;

pub use gate::{check_risk_gate, BlockReason, GateDecision};
