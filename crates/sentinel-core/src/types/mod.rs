//! Shared value types.

mod position;

pub use position::{
    apply_delta, ExitReason, Position, PositionDelta, PositionStats, PositionStatus, Side,
    StrategyMode,
};
