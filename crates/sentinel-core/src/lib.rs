//! Sentinel Core Library
//!
//! Shared types and configuration for the sentinel position exit engine.

pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
