//! Exit evaluation pipeline.
//!
//! Given an open position and the current price, produces exactly one
//! decision per tick: hold, hold with trailing-state mutations, or close
//! with a reason. Rules run in strict priority order; the first match wins.
//! The trailing-state update (rule 5) never closes and its mutations ride
//! along with whatever later rule decides.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sentinel_core::config::{ExitConfig, FeeConfig};
use sentinel_core::types::{ExitReason, Position, PositionDelta};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{fees, trailing};

/// Hold time after which a sharp adverse percentage move cuts the position.
const THESIS_WRONG_SECS: i64 = 180;
/// Hold time after which a sustained dollar loss cuts the position.
const TREND_FAILED_SECS: i64 = 600;
/// Graduated exit: accept net >= -$5 after this hold time.
const CAPITAL_FREE_SECS: i64 = 1800;
/// Graduated exit: accept net >= -$10 after this hold time.
const TIME_DECAY_SECS: i64 = 2700;

/// Outcome of one pipeline evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ExitDecision {
    /// Keep the position open; `delta` may carry trailing-state updates.
    Hold { delta: PositionDelta },
    /// Close at `exit_price` for `reason`; `delta` still carries any
    /// trailing-state updates accumulated before the closing rule fired.
    Close {
        reason: ExitReason,
        exit_price: Decimal,
        delta: PositionDelta,
    },
}

impl ExitDecision {
    pub fn should_close(&self) -> bool {
        matches!(self, ExitDecision::Close { .. })
    }

    pub fn reason(&self) -> Option<ExitReason> {
        match self {
            ExitDecision::Close { reason, .. } => Some(*reason),
            ExitDecision::Hold { .. } => None,
        }
    }

    pub fn delta(&self) -> &PositionDelta {
        match self {
            ExitDecision::Hold { delta } => delta,
            ExitDecision::Close { delta, .. } => delta,
        }
    }
}

/// Quantities derived once per evaluation.
struct EvalContext {
    elapsed_secs: i64,
    gross_pnl_pct: Decimal,
    gross_pnl_dollars: Decimal,
    net_pnl_dollars: Decimal,
}

/// Evaluate the exit rules for one open position at one tick.
///
/// `override_max_hold_secs` lets the caller shorten (never extend past the
/// absolute ceiling) the nominal timeout for this position.
pub fn evaluate(
    position: &Position,
    current_price: Decimal,
    now: DateTime<Utc>,
    override_max_hold_secs: Option<i64>,
    exit_cfg: &ExitConfig,
    fee_cfg: &FeeConfig,
) -> ExitDecision {
    debug_assert!(position.is_open(), "pipeline requires an open position");
    debug_assert!(current_price > Decimal::ZERO, "price must be positive");
    debug_assert!(
        now >= position.entry_time,
        "entry time must not be in the future"
    );

    let notional = position.notional();
    let gross_pnl_pct = fees::gross_pnl_pct(position.side, position.entry_price, current_price);
    let gross_pnl_dollars = fees::gross_pnl_dollars(gross_pnl_pct, notional);
    let ctx = EvalContext {
        elapsed_secs: position.holding_secs(now),
        gross_pnl_pct,
        gross_pnl_dollars,
        net_pnl_dollars: gross_pnl_dollars - fees::round_trip_fees(notional, fee_cfg),
    };

    let close = |reason: ExitReason, delta: PositionDelta| {
        debug!(
            position_id = %position.id,
            reason = reason.as_str(),
            exit_price = %current_price,
            elapsed_secs = ctx.elapsed_secs,
            net_pnl = %ctx.net_pnl_dollars,
            "Exit rule fired"
        );
        ExitDecision::Close {
            reason,
            exit_price: current_price,
            delta,
        }
    };

    // Rule 1: hard time circuit breaker. Unconditional, overrides
    // everything including an active trailing stop or unrealized profit.
    if ctx.elapsed_secs >= exit_cfg.absolute_max_hold_secs {
        return close(ExitReason::CircuitBreakerTime, PositionDelta::default());
    }

    // Rule 2: absolute dollar loss cap. Catches a price gap through the
    // nominal stop level.
    if ctx.net_pnl_dollars <= -exit_cfg.absolute_max_loss_dollars {
        return close(ExitReason::CircuitBreakerLoss, PositionDelta::default());
    }

    // Rule 3: effective stop (trailing once set, else static).
    if position
        .side
        .stop_hit(current_price, position.effective_stop())
    {
        let reason = if position.trailing_stop_price.is_some() {
            ExitReason::TrailingStop
        } else {
            ExitReason::StopLoss
        };
        return close(reason, PositionDelta::default());
    }

    // Rule 4: max profit.
    if ctx.net_pnl_dollars >= position.max_profit_target {
        return close(ExitReason::MaxProfit, PositionDelta::default());
    }

    // Rule 5: trailing-stop state update. Mutation-only, always continues.
    let delta = trailing::update(
        position,
        current_price,
        ctx.gross_pnl_pct,
        ctx.gross_pnl_dollars,
        exit_cfg,
    );

    // Rule 6: take-profit, gated by a minimum hold.
    if ctx.elapsed_secs >= exit_cfg.swing_min_hold_secs
        && position
            .side
            .target_hit(current_price, position.take_profit)
    {
        return close(ExitReason::TakeProfit, delta);
    }

    // Rule 7: time-scaled graduated exits. Later thresholds accept
    // progressively worse outcomes; first satisfied window fires.
    if ctx.elapsed_secs >= exit_cfg.swing_profit_scale_secs
        && ctx.net_pnl_dollars >= position.min_profit_target
    {
        return close(ExitReason::SwingProfit, delta);
    }
    if ctx.elapsed_secs >= exit_cfg.generous_profit_secs && ctx.net_pnl_dollars >= Decimal::ZERO {
        return close(ExitReason::GenerousExit, delta);
    }
    if ctx.elapsed_secs >= CAPITAL_FREE_SECS && ctx.net_pnl_dollars >= Decimal::new(-5, 0) {
        return close(ExitReason::CapitalFree, delta);
    }
    if ctx.elapsed_secs >= TIME_DECAY_SECS && ctx.net_pnl_dollars >= Decimal::new(-10, 0) {
        return close(ExitReason::TimeDecayExit, delta);
    }

    // Rule 8: wrong-direction cuts. Both require a minimum hold so noise
    // cannot trigger them.
    if ctx.elapsed_secs >= THESIS_WRONG_SECS && ctx.gross_pnl_pct < Decimal::new(-30, 2) {
        return close(ExitReason::ThesisWrong, delta);
    }
    if ctx.elapsed_secs >= TREND_FAILED_SECS && ctx.gross_pnl_dollars < Decimal::new(-3, 0) {
        return close(ExitReason::TrendFailed, delta);
    }

    // Rule 9: nominal timeout, clamped to the absolute ceiling.
    let effective_max = override_max_hold_secs
        .unwrap_or(position.max_trade_secs)
        .min(exit_cfg.absolute_max_hold_secs);
    if ctx.elapsed_secs >= effective_max {
        let reason = if ctx.net_pnl_dollars >= Decimal::ZERO {
            ExitReason::TimeoutGreen
        } else {
            ExitReason::TimeoutRed
        };
        return close(reason, delta);
    }

    ExitDecision::Hold { delta }
}
