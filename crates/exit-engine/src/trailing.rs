//! Trailing-stop state machine.
//!
//! Tracks peak favorable excursion and derives a monotonically improving
//! stop once activated. Pure: takes the position's trailing state as input
//! and returns a delta, never mutating in place.
//!
//! Progression: breakeven stop (small profit locks the stop near entry,
//! one-way flip) -> full trailing (stop follows the peak price at a fixed
//! distance, ratcheting only in the favorable direction).

use rust_decimal::Decimal;
use sentinel_core::config::ExitConfig;
use sentinel_core::types::{Position, PositionDelta, Side};
use tracing::debug;

/// Trailing stop derived from a peak price at the configured distance.
fn trail_from_peak(side: Side, peak_price: Decimal, cfg: &ExitConfig) -> Decimal {
    peak_price * (Decimal::ONE - side.sign() * cfg.trailing_distance_pct / Decimal::ONE_HUNDRED)
}

/// Advance the trailing-stop state for one tick.
///
/// Never signals a close; stop crossings are detected by the pipeline's
/// stop rule on the *next* evaluation of the merged state (or on this one,
/// against the pre-update stop, which is the stricter reading).
pub fn update(
    position: &Position,
    current_price: Decimal,
    gross_pnl_pct: Decimal,
    gross_pnl_dollars: Decimal,
    cfg: &ExitConfig,
) -> PositionDelta {
    let mut delta = PositionDelta::default();

    // Peak tracking: dollar peak is monotone; the peak price only moves
    // when the price is a new favorable extreme.
    let mut peak_price = position.peak_price;
    let mut new_peak_price = false;
    if gross_pnl_dollars > position.peak_gross_pnl {
        delta.peak_gross_pnl = Some(gross_pnl_dollars);
        if position.side.beyond_peak(current_price, peak_price) {
            peak_price = current_price;
            delta.peak_price = Some(current_price);
            new_peak_price = true;
            debug!(
                position_id = %position.id,
                peak_price = %current_price,
                peak_gross_pnl = %gross_pnl_dollars,
                "New favorable excursion peak"
            );
        }
    }

    // Breakeven activation: one-way flip, stop parked just beyond entry
    // with a fixed fee-covering buffer.
    if !position.breakeven_stop_active && gross_pnl_pct >= cfg.breakeven_activation_pct {
        let buffer = position.entry_price * cfg.breakeven_fee_buffer_pct / Decimal::ONE_HUNDRED;
        let stop = position.entry_price + position.side.sign() * buffer;
        delta.breakeven_stop_active = Some(true);
        delta.trailing_stop_price = Some(stop);
        debug!(
            position_id = %position.id,
            stop_price = %stop,
            "Breakeven stop activated"
        );
    }

    if !position.trailing_stop_active && gross_pnl_pct >= cfg.trailing_activation_pct {
        // Full trailing activation. Supersedes the breakeven level: at the
        // activation threshold the trail price is always beyond it.
        let stop = trail_from_peak(position.side, peak_price, cfg);
        delta.trailing_stop_active = Some(true);
        delta.trailing_stop_price = Some(stop);
        debug!(
            position_id = %position.id,
            peak_price = %peak_price,
            stop_price = %stop,
            "Trailing stop activated"
        );
    } else if position.trailing_stop_active && new_peak_price {
        // Ratchet: recompute from the new peak, adopt only if tighter.
        let candidate = trail_from_peak(position.side, peak_price, cfg);
        let incumbent = position.effective_stop();
        if position.side.tightens_stop(candidate, incumbent) {
            delta.trailing_stop_price = Some(candidate);
            debug!(
                position_id = %position.id,
                old_stop = %incumbent,
                new_stop = %candidate,
                "Trailing stop ratcheted"
            );
        }
    }

    delta
}
