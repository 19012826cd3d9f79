//! Run one position through the full lifecycle on a synthetic price path.
//!
//! Run with:
//! ```
//! cargo run --example tick_loop
//! ```

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use sentinel::core::config::BotConfig;
use sentinel::core::types::{apply_delta, Side, StrategyMode};
use sentinel::engine;
use sentinel::engine::pipeline::ExitDecision;
use sentinel::risk;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let config = BotConfig::from_env()?;

    println!("=== Tick Loop Demo ===\n");

    // Step 1: pre-trade risk gate (empty history, fresh balance)
    println!("1. Checking risk gate...");
    let balance = config.risk.initial_balance;
    let gate = risk::check_risk_gate(&[], balance, Utc::now(), &config.risk);
    if !gate.allowed {
        println!("   ✗ Entry blocked: {:?}", gate.reason);
        return Ok(());
    }
    println!("   ✓ Entry allowed");

    // Step 2: open a long at 100 with $500 collateral
    println!("\n2. Opening position...");
    let entry_time = Utc::now();
    let mut position = engine::create_position(
        Side::Long,
        Decimal::new(100, 0),
        Decimal::new(500, 0),
        StrategyMode::Swing,
        entry_time,
        &config.strategy,
        &config.exit,
    );
    println!("   ✓ {}", position.status_message());

    // Step 3: feed a rise-then-pullback price path, one tick per 30s
    println!("\n3. Running tick loop...");
    let path = [
        Decimal::new(10015, 2),
        Decimal::new(10040, 2), // breakeven stop arms
        Decimal::new(10065, 2), // full trailing arms
        Decimal::new(10085, 2), // ratchet
        Decimal::new(10070, 2),
        Decimal::new(10045, 2), // crosses the trail
    ];

    for (i, price) in path.iter().enumerate() {
        let now = entry_time + Duration::seconds(30 * (i as i64 + 1));
        match engine::evaluate(&position, *price, now, None, &config.exit, &config.fees) {
            ExitDecision::Hold { delta } => {
                position = apply_delta(position, &delta);
                println!(
                    "   tick {} @ {}: hold (stop {})",
                    i + 1,
                    price,
                    position.effective_stop()
                );
            }
            ExitDecision::Close {
                reason,
                exit_price,
                delta,
            } => {
                position = apply_delta(position, &delta);
                println!("   tick {} @ {}: close ({})", i + 1, price, reason.as_str());
                position = engine::close_position(
                    position,
                    exit_price,
                    now,
                    reason,
                    &config.exit,
                    &config.fees,
                )?;
                break;
            }
        }
    }

    // Step 4: print the closed position
    println!("\n4. Final position:");
    println!("{}", serde_json::to_string_pretty(&position)?);
    if let Some(pnl) = position.pnl {
        println!("\nNet P&L: ${pnl}");
    }

    Ok(())
}
