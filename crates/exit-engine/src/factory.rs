//! Position factory: builds an open position from entry parameters and
//! per-mode strategy configuration.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sentinel_core::config::{ExitConfig, StrategyConfig};
use sentinel_core::types::{Position, PositionStatus, Side, StrategyMode};
use tracing::info;
use uuid::Uuid;

/// Create a new open position.
///
/// The configured stop percentage for the mode is capped so the initial
/// stop alone can never lose more than the absolute dollar cap:
/// `min(stop_loss_pct, absolute_max_loss_dollars / notional * 100)`.
///
/// Inputs are assumed pre-validated by the caller; non-positive prices,
/// collateral, or leverage are out of domain.
pub fn create_position(
    side: Side,
    entry_price: Decimal,
    collateral: Decimal,
    mode: StrategyMode,
    entry_time: DateTime<Utc>,
    strategy: &StrategyConfig,
    exit: &ExitConfig,
) -> Position {
    debug_assert!(entry_price > Decimal::ZERO, "entry price must be positive");
    debug_assert!(collateral > Decimal::ZERO, "collateral must be positive");
    debug_assert!(
        strategy.leverage > Decimal::ZERO,
        "leverage must be positive"
    );

    let params = strategy.params(mode);
    let notional = collateral * strategy.leverage;

    let max_loss_pct = exit.absolute_max_loss_dollars / notional * Decimal::ONE_HUNDRED;
    let stop_pct = params.stop_loss_pct.min(max_loss_pct);

    let sign = side.sign();
    let stop_loss = entry_price * (Decimal::ONE - sign * stop_pct / Decimal::ONE_HUNDRED);
    let take_profit =
        entry_price * (Decimal::ONE + sign * params.take_profit_pct / Decimal::ONE_HUNDRED);

    let position = Position {
        id: Uuid::new_v4(),
        side,
        entry_price,
        entry_time,
        collateral,
        leverage: strategy.leverage,
        mode,
        stop_loss,
        take_profit,
        min_profit_target: params.min_profit_target,
        max_profit_target: params.max_profit_target,
        max_trade_secs: params.max_trade_secs,
        peak_gross_pnl: Decimal::ZERO,
        peak_price: entry_price,
        breakeven_stop_active: false,
        trailing_stop_active: false,
        trailing_stop_price: None,
        status: PositionStatus::Open,
        exit_price: None,
        exit_time: None,
        pnl: None,
        fees: None,
        gross_pnl: None,
        exit_reason: None,
    };

    info!(
        position_id = %position.id,
        side = ?side,
        mode = ?mode,
        entry_price = %entry_price,
        notional = %notional,
        stop_loss = %stop_loss,
        take_profit = %take_profit,
        "Opened position"
    );

    position
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_levels() {
        let strategy = StrategyConfig::default();
        let exit = ExitConfig::default();

        let pos = create_position(
            Side::Long,
            Decimal::new(100, 0),
            Decimal::new(500, 0),
            StrategyMode::Momentum,
            Utc::now(),
            &strategy,
            &exit,
        );

        // Notional $5000, cap pct = 25/5000*100 = 0.5%, equal to the
        // configured momentum stop.
        assert_eq!(pos.notional(), Decimal::new(5000, 0));
        assert_eq!(pos.stop_loss, Decimal::new(995, 1)); // 99.5
        assert_eq!(pos.take_profit, Decimal::new(1009, 1)); // 100.9
        assert_eq!(pos.peak_price, pos.entry_price);
        assert_eq!(pos.peak_gross_pnl, Decimal::ZERO);
        assert!(!pos.breakeven_stop_active);
        assert!(!pos.trailing_stop_active);
        assert!(pos.trailing_stop_price.is_none());
        assert!(pos.is_open());
    }

    #[test]
    fn test_short_levels_mirrored() {
        let strategy = StrategyConfig::default();
        let exit = ExitConfig::default();

        let pos = create_position(
            Side::Short,
            Decimal::new(100, 0),
            Decimal::new(500, 0),
            StrategyMode::Momentum,
            Utc::now(),
            &strategy,
            &exit,
        );

        // Short: stop above entry, target below.
        assert_eq!(pos.stop_loss, Decimal::new(1005, 1)); // 100.5
        assert_eq!(pos.take_profit, Decimal::new(991, 1)); // 99.1
    }

    #[test]
    fn test_stop_pct_capped_by_absolute_loss() {
        let strategy = StrategyConfig::default();
        let exit = ExitConfig::default();

        // Swing configures 0.6%, but on $5000 notional the $25 cap allows
        // at most 0.5%.
        let pos = create_position(
            Side::Long,
            Decimal::new(100, 0),
            Decimal::new(500, 0),
            StrategyMode::Swing,
            Utc::now(),
            &strategy,
            &exit,
        );
        assert_eq!(pos.stop_loss, Decimal::new(995, 1)); // capped at 0.5%

        // Smaller notional: the configured 0.6% is below the cap and wins.
        let small = create_position(
            Side::Long,
            Decimal::new(100, 0),
            Decimal::new(100, 0), // notional $1000, cap pct = 2.5%
            StrategyMode::Swing,
            Utc::now(),
            &strategy,
            &exit,
        );
        assert_eq!(small.stop_loss, Decimal::new(994, 1)); // 0.6% stop
    }

    #[test]
    fn test_mode_params_snapshotted() {
        let strategy = StrategyConfig::default();
        let exit = ExitConfig::default();

        let pos = create_position(
            Side::Long,
            Decimal::new(50, 0),
            Decimal::new(200, 0),
            StrategyMode::MeanReversion,
            Utc::now(),
            &strategy,
            &exit,
        );

        assert_eq!(pos.min_profit_target, strategy.mean_reversion.min_profit_target);
        assert_eq!(pos.max_profit_target, strategy.mean_reversion.max_profit_target);
        assert_eq!(pos.max_trade_secs, strategy.mean_reversion.max_trade_secs);
        assert_eq!(pos.leverage, strategy.leverage);
    }
}
