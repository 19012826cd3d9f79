//! Fee and P&L math shared by the evaluation pipeline and the closer.
//!
//! Both call sites must agree exactly: the closer re-derives the numbers
//! the pipeline saw so the loss cap holds on either path.

use rust_decimal::Decimal;
use sentinel_core::config::FeeConfig;
use sentinel_core::types::Side;

/// Side-aware price move from entry, in percent.
pub fn gross_pnl_pct(side: Side, entry_price: Decimal, current_price: Decimal) -> Decimal {
    let move_pct = (current_price - entry_price) / entry_price * Decimal::ONE_HUNDRED;
    match side {
        Side::Long => move_pct,
        Side::Short => -move_pct,
    }
}

/// Gross P&L in dollars for a percentage move on the given notional.
pub fn gross_pnl_dollars(gross_pnl_pct: Decimal, notional: Decimal) -> Decimal {
    gross_pnl_pct / Decimal::ONE_HUNDRED * notional
}

/// Round-trip (entry + exit) fees in dollars on the given notional.
pub fn round_trip_fees(notional: Decimal, fees: &FeeConfig) -> Decimal {
    notional * fees.round_trip_pct() / Decimal::ONE_HUNDRED
}
