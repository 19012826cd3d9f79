//! Pre-trade risk gate.
//!
//! A pure function of recent trade history and current balance, evaluated
//! before any new position is opened. Four independent checks; any one is
//! sufficient to block. The gate owns no state between calls.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sentinel_core::config::RiskLimits;
use sentinel_core::types::{Position, PositionStatus};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Why the gate blocked a new entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockReason {
    /// Too many entries within the last hour.
    RateLimited {
        trades_last_hour: usize,
        max_trades_per_hour: usize,
    },
    /// A run of consecutive losses triggered a cooling-off pause.
    LossPause {
        consecutive_losses: usize,
        resume_in_minutes: i64,
    },
    /// Realized losses over the last 24h hit the daily limit.
    DailyLossLimit {
        daily_pnl: Decimal,
        limit_dollars: Decimal,
    },
    /// Balance fell below half of the initial balance.
    BalanceSanity {
        current_balance: Decimal,
        initial_balance: Decimal,
    },
}

/// Result of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    pub allowed: bool,
    pub reason: Option<BlockReason>,
}

impl GateDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn block(reason: BlockReason) -> Self {
        warn!(reason = ?reason, "Risk gate blocked new entry");
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Decide whether a new position may be opened right now.
///
/// `recent` is the caller's trade history window (open and closed
/// positions, any order).
pub fn check_risk_gate(
    recent: &[Position],
    current_balance: Decimal,
    now: DateTime<Utc>,
    limits: &RiskLimits,
) -> GateDecision {
    // Rate limit: entries within the last hour, open or closed.
    let hour_ago = now - Duration::hours(1);
    let trades_last_hour = recent
        .iter()
        .filter(|p| p.entry_time > hour_ago && p.entry_time <= now)
        .count();
    if trades_last_hour >= limits.max_trades_per_hour {
        return GateDecision::block(BlockReason::RateLimited {
            trades_last_hour,
            max_trades_per_hour: limits.max_trades_per_hour,
        });
    }

    // Consecutive-loss pause: scan closed trades most-recent-first and
    // count the run of losses at the head.
    let mut closed: Vec<&Position> = recent
        .iter()
        .filter(|p| p.status == PositionStatus::Closed && p.exit_time.is_some())
        .collect();
    closed.sort_by_key(|p| std::cmp::Reverse(p.exit_time));

    let mut consecutive_losses = 0usize;
    let mut last_loss_exit: Option<DateTime<Utc>> = None;
    for position in &closed {
        match position.pnl {
            Some(pnl) if pnl < Decimal::ZERO => {
                consecutive_losses += 1;
                if last_loss_exit.is_none() {
                    last_loss_exit = position.exit_time;
                }
            }
            _ => break,
        }
    }
    if consecutive_losses >= limits.max_consecutive_losses {
        if let Some(exit_time) = last_loss_exit {
            let resume_at = exit_time + Duration::minutes(limits.pause_after_losses_minutes);
            if now < resume_at {
                return GateDecision::block(BlockReason::LossPause {
                    consecutive_losses,
                    resume_in_minutes: (resume_at - now).num_minutes(),
                });
            }
        }
    }

    // Daily loss limit: realized P&L over the last 24h, dollar cap and
    // percent-of-initial-balance cap (percent only when the sum is a loss).
    let day_ago = now - Duration::hours(24);
    let daily_pnl: Decimal = closed
        .iter()
        .filter(|p| p.exit_time.is_some_and(|t| t > day_ago))
        .filter_map(|p| p.pnl)
        .sum();

    let over_dollar_limit = daily_pnl <= -limits.max_daily_loss_dollars;
    let over_pct_limit = daily_pnl < Decimal::ZERO
        && limits.initial_balance > Decimal::ZERO
        && (-daily_pnl) / limits.initial_balance * Decimal::ONE_HUNDRED
            >= limits.max_daily_loss_pct;
    if over_dollar_limit || over_pct_limit {
        return GateDecision::block(BlockReason::DailyLossLimit {
            daily_pnl,
            limit_dollars: limits.max_daily_loss_dollars,
        });
    }

    // Balance sanity: half the starting capital gone means something is
    // wrong beyond any single trade.
    if current_balance < limits.initial_balance / Decimal::new(2, 0) {
        return GateDecision::block(BlockReason::BalanceSanity {
            current_balance,
            initial_balance: limits.initial_balance,
        });
    }

    GateDecision::allow()
}
