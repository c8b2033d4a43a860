//! Metrics and report export
//!
//! Serializes a market run, its reports and any scenario results to JSON.

use crate::config::SimulationConfig;
use crate::market::{DailySnapshot, MarketSimulator};
use crate::metrics::SimMetrics;
use crate::reports::{profitability, slippage};
use crate::rng::RandomSource;
use crate::scenarios::ScenarioResult;
use crate::settlement::PoolStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use types::trade::PoolState;

/// Combined export containing all simulation outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationExport {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub config: SimulationConfig,
    pub day: u32,
    pub pool: PoolState,
    pub metrics: SimMetrics,
    pub pool_stats: PoolStats,
    pub slippage: slippage::SlippageReport,
    pub profitability: profitability::ProfitabilityReport,
    pub snapshots: Vec<DailySnapshot>,
    pub scenarios: Vec<ScenarioResult>,
    pub trade_count: usize,
}

/// Build a complete simulation export from the simulator's current state.
pub fn build_export<R: RandomSource>(
    sim: &MarketSimulator<R>,
    metrics: &SimMetrics,
    scenarios: Vec<ScenarioResult>,
) -> SimulationExport {
    let pool = sim.pool();
    SimulationExport {
        version: crate::VERSION.to_string(),
        exported_at: Utc::now(),
        config: sim.config().clone(),
        day: sim.current_day(),
        pool: pool.reserves().state(),
        metrics: metrics.clone(),
        pool_stats: sim.pool_stats(),
        slippage: slippage::analyze(pool, sim.roster()),
        profitability: profitability::analyze(pool, sim.roster()),
        snapshots: sim.snapshots().to_vec(),
        scenarios,
        trade_count: pool.trade_count(),
    }
}

/// Export complete simulation data as JSON.
pub fn export_json(export: &SimulationExport) -> String {
    serde_json::to_string_pretty(export).unwrap_or_default()
}

pub fn import_json(json: &str) -> Result<SimulationExport, serde_json::Error> {
    serde_json::from_str(json)
}

/// Write export to a file path.
pub fn write_to_file(export: &SimulationExport, path: impl AsRef<Path>) -> std::io::Result<()> {
    std::fs::write(path, export_json(export))
}
