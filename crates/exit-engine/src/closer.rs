//! Position closer: finalizes exit economics.
//!
//! Recomputes fees and gross P&L with the same math as the pipeline and
//! re-applies the absolute loss cap independently of whichever rule
//! triggered the close.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sentinel_core::config::{ExitConfig, FeeConfig};
use sentinel_core::types::{ExitReason, Position, PositionStatus};
use sentinel_core::{Error, Result};
use tracing::info;

use crate::fees;

/// Close a position at `exit_price`, computing realized fees and capped
/// net P&L. Fails if the position is already closed.
pub fn close_position(
    mut position: Position,
    exit_price: Decimal,
    exit_time: DateTime<Utc>,
    reason: ExitReason,
    exit_cfg: &ExitConfig,
    fee_cfg: &FeeConfig,
) -> Result<Position> {
    if !position.is_open() {
        return Err(Error::Position(format!(
            "position {} is already closed",
            position.id
        )));
    }

    let notional = position.notional();
    let gross_pnl_pct = fees::gross_pnl_pct(position.side, position.entry_price, exit_price);
    let gross_pnl = fees::gross_pnl_dollars(gross_pnl_pct, notional);
    let fees_paid = fees::round_trip_fees(notional, fee_cfg);

    // Realized loss never exceeds the cap plus the fees it cost to find
    // out.
    let floor = -(exit_cfg.absolute_max_loss_dollars + fees_paid);
    let net_pnl = (gross_pnl - fees_paid).max(floor);

    position.status = PositionStatus::Closed;
    position.exit_price = Some(exit_price);
    position.exit_time = Some(exit_time);
    position.gross_pnl = Some(gross_pnl);
    position.fees = Some(fees_paid);
    position.pnl = Some(net_pnl);
    position.exit_reason = Some(reason);

    info!(
        position_id = %position.id,
        reason = reason.as_str(),
        exit_price = %exit_price,
        gross_pnl = %gross_pnl,
        fees = %fees_paid,
        net_pnl = %net_pnl,
        "Closed position"
    );

    Ok(position)
}
