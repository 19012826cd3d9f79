//! Exit Engine
//!
//! Position lifecycle for a single leveraged trade: factory, per-tick exit
//! evaluation with a trailing-stop state machine, and close-time economics.
//!
//! Everything here is a pure computation over explicit inputs. The engine
//! never retains a reference to a position across calls; state changes come
//! back as [`sentinel_core::types::PositionDelta`] records the caller merges.

pub mod closer;
pub mod factory;
pub mod fees;
pub mod pipeline;
pub mod trailing;

pub use closer::close_position;
pub use factory::create_position;
pub use pipeline::{evaluate, ExitDecision};
