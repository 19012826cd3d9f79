//! Configuration for strategy parameters, fees, exit rules, and risk limits.

use crate::types::StrategyMode;
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;

/// Per-mode strategy parameters.
///
/// Percentages are expressed in percent units (0.5 = 0.5%), dollar targets
/// in USD on the position's notional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeParams {
    /// Stop-loss distance from entry, percent of price.
    pub stop_loss_pct: Decimal,
    /// Take-profit distance from entry, percent of price.
    pub take_profit_pct: Decimal,
    /// Minimum acceptable profit for graduated exits, USD.
    pub min_profit_target: Decimal,
    /// Profit level that forces an immediate close, USD.
    pub max_profit_target: Decimal,
    /// Nominal maximum hold time for this mode, seconds.
    pub max_trade_secs: i64,
}

/// Strategy configuration: leverage plus parameters for each trading mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub leverage: Decimal,
    pub momentum: ModeParams,
    pub mean_reversion: ModeParams,
    pub swing: ModeParams,
}

impl StrategyConfig {
    /// Parameters for the given trading mode.
    pub fn params(&self, mode: StrategyMode) -> &ModeParams {
        match mode {
            StrategyMode::Momentum => &self.momentum,
            StrategyMode::MeanReversion => &self.mean_reversion,
            StrategyMode::Swing => &self.swing,
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            leverage: Decimal::new(10, 0),
            momentum: ModeParams {
                stop_loss_pct: Decimal::new(50, 2),    // 0.50%
                take_profit_pct: Decimal::new(90, 2),  // 0.90%
                min_profit_target: Decimal::new(25, 1), // $2.50
                max_profit_target: Decimal::new(30, 0), // $30
                max_trade_secs: 900,
            },
            mean_reversion: ModeParams {
                stop_loss_pct: Decimal::new(45, 2),    // 0.45%
                take_profit_pct: Decimal::new(70, 2),  // 0.70%
                min_profit_target: Decimal::new(2, 0),  // $2
                max_profit_target: Decimal::new(25, 0), // $25
                max_trade_secs: 1200,
            },
            swing: ModeParams {
                stop_loss_pct: Decimal::new(60, 2),     // 0.60%
                take_profit_pct: Decimal::new(120, 2),  // 1.20%
                min_profit_target: Decimal::new(3, 0),  // $3
                max_profit_target: Decimal::new(40, 0), // $40
                max_trade_secs: 1800,
            },
        }
    }
}

/// Which fee rate applies to fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeMode {
    Taker,
    Maker,
}

/// Exchange fee configuration. Rates are percent of notional per fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    pub taker_fee_pct: Decimal,
    pub maker_fee_pct: Decimal,
    pub mode: FeeMode,
}

impl FeeConfig {
    /// Fee rate for the configured mode, percent per fill.
    pub fn fill_rate_pct(&self) -> Decimal {
        match self.mode {
            FeeMode::Taker => self.taker_fee_pct,
            FeeMode::Maker => self.maker_fee_pct,
        }
    }

    /// Round-trip fee rate (entry + exit), percent of notional.
    pub fn round_trip_pct(&self) -> Decimal {
        self.fill_rate_pct() * Decimal::new(2, 0)
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            taker_fee_pct: Decimal::new(45, 3), // 0.045%
            maker_fee_pct: Decimal::new(15, 3), // 0.015%
            mode: FeeMode::Taker,
        }
    }
}

/// Hard exit limits and trailing-stop constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitConfig {
    /// Loss ceiling in dollars. Never breached regardless of other signals.
    pub absolute_max_loss_dollars: Decimal,
    /// Hold-time ceiling in seconds. Always fires.
    pub absolute_max_hold_secs: i64,
    /// Gross profit percent that moves the stop to breakeven.
    pub breakeven_activation_pct: Decimal,
    /// Buffer above/below entry for the breakeven stop, percent of price.
    /// Fixed constant, independent of the configured fee rate.
    pub breakeven_fee_buffer_pct: Decimal,
    /// Gross profit percent that activates full trailing.
    pub trailing_activation_pct: Decimal,
    /// Distance of the trailing stop from the peak price, percent.
    pub trailing_distance_pct: Decimal,
    /// Minimum hold before take-profit may fire, seconds.
    pub swing_min_hold_secs: i64,
    /// After this hold time, accept net P&L >= min_profit_target.
    pub swing_profit_scale_secs: i64,
    /// After this hold time, accept any non-negative net P&L.
    pub generous_profit_secs: i64,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            absolute_max_loss_dollars: Decimal::new(25, 0),
            absolute_max_hold_secs: 3600,
            breakeven_activation_pct: Decimal::new(35, 2), // 0.35%
            breakeven_fee_buffer_pct: Decimal::new(6, 2),  // 0.06%
            trailing_activation_pct: Decimal::new(50, 2),  // 0.50%
            trailing_distance_pct: Decimal::new(30, 2),    // 0.30%
            swing_min_hold_secs: 240,
            swing_profit_scale_secs: 600,
            generous_profit_secs: 1200,
        }
    }
}

/// Pre-trade risk gate limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskLimits {
    pub max_trades_per_hour: usize,
    pub max_consecutive_losses: usize,
    pub pause_after_losses_minutes: i64,
    pub max_daily_loss_dollars: Decimal,
    /// Daily loss as percent of initial balance.
    pub max_daily_loss_pct: Decimal,
    pub initial_balance: Decimal,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_trades_per_hour: 6,
            max_consecutive_losses: 4,
            pause_after_losses_minutes: 30,
            max_daily_loss_dollars: Decimal::new(50, 0),
            max_daily_loss_pct: Decimal::new(5, 0), // 5%
            initial_balance: Decimal::new(1000, 0),
        }
    }
}

/// Top-level configuration bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    pub strategy: StrategyConfig,
    pub fees: FeeConfig,
    pub exit: ExitConfig,
    pub risk: RiskLimits,
}

impl BotConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut cfg = Self::default();

        if let Some(leverage) = parse_env_decimal("SENTINEL_LEVERAGE")? {
            cfg.strategy.leverage = leverage;
        }
        if let Some(max_loss) = parse_env_decimal("SENTINEL_MAX_LOSS_DOLLARS")? {
            cfg.exit.absolute_max_loss_dollars = max_loss;
        }
        if let Some(max_hold) = parse_env_i64("SENTINEL_MAX_HOLD_SECS")? {
            cfg.exit.absolute_max_hold_secs = max_hold;
        }
        if let Some(initial) = parse_env_decimal("SENTINEL_INITIAL_BALANCE")? {
            cfg.risk.initial_balance = initial;
        }
        if let Ok(mode) = env::var("SENTINEL_FEE_MODE") {
            cfg.fees.mode = match mode.as_str() {
                "taker" => FeeMode::Taker,
                "maker" => FeeMode::Maker,
                other => {
                    return Err(Error::Config {
                        message: format!("SENTINEL_FEE_MODE must be taker or maker, got {other}"),
                    })
                }
            };
        }

        Ok(cfg)
    }
}

fn parse_env_decimal(key: &str) -> Result<Option<Decimal>> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| Error::Config {
                message: format!("{key} is not a valid decimal: {raw}"),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_env_i64(key: &str) -> Result<Option<i64>> {
    match env::var(key) {
        Ok(raw) => raw.parse::<i64>().map(Some).map_err(|_| Error::Config {
            message: format!("{key} is not a valid integer: {raw}"),
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_params_lookup() {
        let cfg = StrategyConfig::default();

        assert_eq!(
            cfg.params(StrategyMode::Momentum).max_trade_secs,
            cfg.momentum.max_trade_secs
        );
        assert_eq!(
            cfg.params(StrategyMode::Swing).stop_loss_pct,
            Decimal::new(60, 2)
        );
    }

    #[test]
    fn test_round_trip_fee_rate() {
        let fees = FeeConfig::default();
        // Taker: 0.045% per fill, 0.09% round trip
        assert_eq!(fees.round_trip_pct(), Decimal::new(90, 3));

        let maker = FeeConfig {
            mode: FeeMode::Maker,
            ..Default::default()
        };
        assert_eq!(maker.round_trip_pct(), Decimal::new(30, 3));
    }

    #[test]
    fn test_exit_defaults_are_ordered() {
        let exit = ExitConfig::default();
        // Breakeven must trigger before full trailing, and the graduated
        // exit windows must open in ascending order.
        assert!(exit.breakeven_activation_pct < exit.trailing_activation_pct);
        assert!(exit.swing_min_hold_secs < exit.swing_profit_scale_secs);
        assert!(exit.swing_profit_scale_secs < exit.generous_profit_secs);
        assert!(exit.generous_profit_secs < exit.absolute_max_hold_secs);
    }

    #[test]
    fn test_mode_max_trade_secs_within_hard_cap() {
        let strategy = StrategyConfig::default();
        let exit = ExitConfig::default();
        for mode in [
            StrategyMode::Momentum,
            StrategyMode::MeanReversion,
            StrategyMode::Swing,
        ] {
            assert!(strategy.params(mode).max_trade_secs <= exit.absolute_max_hold_secs);
        }
    }
}
