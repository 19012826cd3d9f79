//! Position types for leveraged trade lifecycle tracking.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a leveraged position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// +1 for Long, -1 for Short. Used to apply side-aware price offsets.
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Long => Decimal::ONE,
            Side::Short => -Decimal::ONE,
        }
    }

    /// Whether `candidate` is a more favorable stop level than `incumbent`
    /// for this side (higher for Long, lower for Short).
    pub fn tightens_stop(&self, candidate: Decimal, incumbent: Decimal) -> bool {
        match self {
            Side::Long => candidate > incumbent,
            Side::Short => candidate < incumbent,
        }
    }

    /// Whether `price` has crossed `stop` against this side.
    pub fn stop_hit(&self, price: Decimal, stop: Decimal) -> bool {
        match self {
            Side::Long => price <= stop,
            Side::Short => price >= stop,
        }
    }

    /// Whether `price` has reached `target` in this side's favor.
    pub fn target_hit(&self, price: Decimal, target: Decimal) -> bool {
        match self {
            Side::Long => price >= target,
            Side::Short => price <= target,
        }
    }

    /// Whether `price` is a new favorable extreme beyond `peak`.
    pub fn beyond_peak(&self, price: Decimal, peak: Decimal) -> bool {
        match self {
            Side::Long => price > peak,
            Side::Short => price < peak,
        }
    }
}

/// Trading mode that parametrized the position at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    Momentum,
    MeanReversion,
    Swing,
}

/// Lifecycle state. Transitions open -> closed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Open,
    Closed,
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Hard hold-time ceiling reached. Overrides everything.
    CircuitBreakerTime,
    /// Net loss reached the absolute dollar cap (e.g. price gapped
    /// through the nominal stop).
    CircuitBreakerLoss,
    /// Static stop-loss level crossed.
    StopLoss,
    /// Trailing (or breakeven) stop level crossed.
    TrailingStop,
    /// Net profit reached the mode's maximum profit target.
    MaxProfit,
    /// Take-profit price level reached after the minimum hold.
    TakeProfit,
    /// Graduated exit: minimum profit target met after the scale window.
    SwingProfit,
    /// Graduated exit: any non-negative net after the generous window.
    GenerousExit,
    /// Graduated exit: near-breakeven accepted to free capital.
    CapitalFree,
    /// Graduated exit: small loss accepted very late in the hold.
    TimeDecayExit,
    /// Early cut: price moved sharply against the entry thesis.
    ThesisWrong,
    /// Mid-hold cut: sustained dollar loss with no recovery.
    TrendFailed,
    /// Nominal timeout with non-negative net P&L.
    TimeoutGreen,
    /// Nominal timeout with negative net P&L.
    TimeoutRed,
}

impl ExitReason {
    /// Stable label for logs and ledgers (matches the serde name).
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::CircuitBreakerTime => "circuit_breaker_time",
            ExitReason::CircuitBreakerLoss => "circuit_breaker_loss",
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TrailingStop => "trailing_stop",
            ExitReason::MaxProfit => "max_profit",
            ExitReason::TakeProfit => "take_profit",
            ExitReason::SwingProfit => "swing_profit",
            ExitReason::GenerousExit => "generous_exit",
            ExitReason::CapitalFree => "capital_free",
            ExitReason::TimeDecayExit => "time_decay_exit",
            ExitReason::ThesisWrong => "thesis_wrong",
            ExitReason::TrendFailed => "trend_failed",
            ExitReason::TimeoutGreen => "timeout_green",
            ExitReason::TimeoutRed => "timeout_red",
        }
    }
}

/// A single leveraged position from open to close.
///
/// The aggregate is exclusively owned by the caller between ticks. The exit
/// engine never mutates it in place: evaluation returns a [`PositionDelta`]
/// which the caller merges via [`apply_delta`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: Uuid,

    // Immutable after creation.
    pub side: Side,
    pub entry_price: Decimal,
    pub entry_time: DateTime<Utc>,
    pub collateral: Decimal,
    pub leverage: Decimal,
    pub mode: StrategyMode,

    // Risk state snapshotted from config at creation.
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub min_profit_target: Decimal,
    pub max_profit_target: Decimal,
    pub max_trade_secs: i64,

    // Trailing-stop state.
    pub peak_gross_pnl: Decimal,
    pub peak_price: Decimal,
    pub breakeven_stop_active: bool,
    pub trailing_stop_active: bool,
    pub trailing_stop_price: Option<Decimal>,

    // Lifecycle.
    pub status: PositionStatus,
    pub exit_price: Option<Decimal>,
    pub exit_time: Option<DateTime<Utc>>,
    pub pnl: Option<Decimal>,
    pub fees: Option<Decimal>,
    pub gross_pnl: Option<Decimal>,
    pub exit_reason: Option<ExitReason>,
}

impl Position {
    /// Effective position size in USD.
    pub fn notional(&self) -> Decimal {
        self.collateral * self.leverage
    }

    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }

    /// Seconds held as of `now`.
    pub fn holding_secs(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.entry_time).num_seconds()
    }

    /// The stop level currently in force: the trailing stop once set,
    /// otherwise the static stop-loss.
    pub fn effective_stop(&self) -> Decimal {
        self.trailing_stop_price.unwrap_or(self.stop_loss)
    }

    /// Human-readable status line.
    pub fn status_message(&self) -> String {
        match self.status {
            PositionStatus::Open => format!(
                "Open {:?} @ {} (stop {}, target {})",
                self.side,
                self.entry_price,
                self.effective_stop(),
                self.take_profit
            ),
            PositionStatus::Closed => match (self.pnl, self.exit_reason) {
                (Some(pnl), Some(reason)) => {
                    format!("Closed ({}), net P&L: {:.4}", reason.as_str(), pnl)
                }
                _ => "Closed".to_string(),
            },
        }
    }
}

/// Partial-update record produced by the exit evaluation pipeline.
///
/// Only fields the pipeline actually changed are `Some`; everything else is
/// left untouched on merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionDelta {
    pub peak_gross_pnl: Option<Decimal>,
    pub peak_price: Option<Decimal>,
    pub breakeven_stop_active: Option<bool>,
    pub trailing_stop_active: Option<bool>,
    pub trailing_stop_price: Option<Decimal>,
}

impl PositionDelta {
    pub fn is_empty(&self) -> bool {
        self.peak_gross_pnl.is_none()
            && self.peak_price.is_none()
            && self.breakeven_stop_active.is_none()
            && self.trailing_stop_active.is_none()
            && self.trailing_stop_price.is_none()
    }
}

/// Merge a delta onto a position snapshot.
///
/// Pure merge with no validation: all delta values originate from the
/// pipeline itself. Deltas are never produced for closed positions.
pub fn apply_delta(mut position: Position, delta: &PositionDelta) -> Position {
    if let Some(peak_gross_pnl) = delta.peak_gross_pnl {
        position.peak_gross_pnl = peak_gross_pnl;
    }
    if let Some(peak_price) = delta.peak_price {
        position.peak_price = peak_price;
    }
    if let Some(active) = delta.breakeven_stop_active {
        position.breakeven_stop_active = active;
    }
    if let Some(active) = delta.trailing_stop_active {
        position.trailing_stop_active = active;
    }
    if let Some(price) = delta.trailing_stop_price {
        position.trailing_stop_price = Some(price);
    }
    position
}

/// Summary statistics over a trade history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionStats {
    pub total_positions: u64,
    pub open_positions: u64,
    pub closed_positions: u64,
    pub total_realized_pnl: Decimal,
    pub total_fees: Decimal,
    pub win_count: u64,
    pub loss_count: u64,
}

impl PositionStats {
    /// Aggregate stats over a slice of positions (open and closed).
    pub fn from_positions(positions: &[Position]) -> Self {
        let mut stats = Self {
            total_positions: positions.len() as u64,
            ..Default::default()
        };

        for position in positions {
            match position.status {
                PositionStatus::Open => stats.open_positions += 1,
                PositionStatus::Closed => {
                    stats.closed_positions += 1;
                    if let Some(pnl) = position.pnl {
                        stats.total_realized_pnl += pnl;
                        if pnl >= Decimal::ZERO {
                            stats.win_count += 1;
                        } else {
                            stats.loss_count += 1;
                        }
                    }
                    if let Some(fees) = position.fees {
                        stats.total_fees += fees;
                    }
                }
            }
        }

        stats
    }

    pub fn win_rate(&self) -> Option<f64> {
        let total = self.win_count + self.loss_count;
        if total == 0 {
            None
        } else {
            Some(self.win_count as f64 / total as f64)
        }
    }
}
