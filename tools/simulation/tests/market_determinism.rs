//! Seeded market runs, scripted draws and replay

use simulation::config::SimulationConfig;
use simulation::market::MarketSimulator;
use simulation::metrics::SimMetrics;
use simulation::replay;
use simulation::rng::{ScriptedRandom, SeededRandom};
use types::trade::Side;

const CONFIG_JSON: &str = r#"{
    "pool": { "reserve_a": 20000.0, "reserve_b": 100000.0, "buy_fee_pct": 0.5, "sell_fee_pct": 1.0 },
    "market": { "seed": 1234 }
}"#;

#[test]
fn test_same_seed_same_trade_log() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let config = SimulationConfig::from_json_str(CONFIG_JSON).unwrap();
    let mut first = MarketSimulator::new(config.clone()).unwrap();
    let mut second = MarketSimulator::with_random(config.clone(), SeededRandom::new(config.market.seed)).unwrap();
    first.step_days(25);
    second.step_days(25);

    assert_eq!(first.trades(), second.trades());
    assert_eq!(first.snapshots(), second.snapshots());
    assert_eq!(first.pool().reserves(), second.pool().reserves());
}

#[test]
fn test_trades_tagged_with_their_day() {
    let mut sim = MarketSimulator::new(SimulationConfig::default()).unwrap();
    sim.step_days(12);
    assert!(sim.trades().iter().all(|t| (1..=12).contains(&t.day)));
    let days: Vec<u32> = sim.snapshots().iter().map(|s| s.day).collect();
    assert_eq!(days, (1..=12).collect::<Vec<_>>());
    assert!(sim.trades().windows(2).all(|w| w[0].day <= w[1].day));
}

#[test]
fn test_always_trade_script_buys_on_first_day() {
    // every draw 0.0: trade, holders of only A must buy, jitter 0.5
    let mut sim = MarketSimulator::with_random(SimulationConfig::default(), ScriptedRandom::constant(0.0)).unwrap();
    let summary = sim.step_days(1);
    assert_eq!(summary.trades_executed, 10);
    assert_eq!(summary.trades_rejected, 0);
    assert!(sim.trades().iter().all(|t| t.side == Side::BUY));
    assert!(sim.current_price() > 0.1);
}

#[test]
fn test_never_trade_script_keeps_pool_still() {
    let mut sim = MarketSimulator::with_random(SimulationConfig::default(), ScriptedRandom::constant(0.99)).unwrap();
    let summary = sim.step_days(5);
    assert_eq!(summary.trades_executed, 0);
    assert_eq!(sim.current_price(), 0.1);
    assert_eq!(sim.snapshots().len(), 5);
    assert!(sim.snapshots().iter().all(|s| s.total_pl() == 0.0));
}

#[test]
fn test_metrics_match_pool_counters() {
    let mut sim = MarketSimulator::new(SimulationConfig::default()).unwrap();
    let summary = sim.step_days(30);
    let mut metrics = SimMetrics::from_trades(sim.trades());
    metrics.record_step(&summary);

    assert_eq!(metrics.total_trades, summary.trades_executed);
    assert_eq!(metrics.buy_count + metrics.sell_count, metrics.total_trades);
    assert!((metrics.total_fees - sim.pool().total_fees()).abs() < 1e-6);
    assert!((metrics.total_volume_a() - sim.pool().total_volume()).abs() < 1e-6);
    assert_eq!(metrics.last_price, sim.trades().last().map(|t| t.pool_after.price()));
}

#[test]
fn test_reset_all_restores_seed_state() {
    let mut sim = MarketSimulator::new(SimulationConfig::default()).unwrap();
    let fresh = replay::capture_snapshot(&sim);
    sim.step_days(10);
    sim.reset_all().unwrap();

    assert_eq!(replay::capture_snapshot(&sim), fresh);
    assert_eq!(sim.current_day(), 0);
    assert!(sim.snapshots().is_empty());
    assert_eq!(sim.roster().len(), 10);
}

#[test]
fn test_replay_from_json_config() {
    let config = SimulationConfig::from_json_str(CONFIG_JSON).unwrap();
    let original = replay::run_and_snapshot(config.clone(), 15).unwrap();
    let validation = replay::validate_replay(config, 15, &original).unwrap();
    assert!(validation.matches);
}
