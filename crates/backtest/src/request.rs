//! Caller-facing simulation request and its conversion into engine
//! parameters.
//!
//! Requests use the conventions of the trading journal UI: win rate and risk
//! per trade are percentages, and counts are plain integers that may be
//! negative if the caller made a mistake.

use serde::{Deserialize, Serialize};
use trademind_core::SimulationLimits;

use crate::error::EngineError;
use crate::params::SimulationParameters;

pub const DEFAULT_NUM_SIMULATIONS: i64 = 1000;
pub const DEFAULT_NUM_TRADES: i64 = 50;

const fn default_num_simulations() -> i64 {
    DEFAULT_NUM_SIMULATIONS
}

const fn default_num_trades() -> i64 {
    DEFAULT_NUM_TRADES
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub starting_equity: f64,
    /// Win rate in percent (0-100).
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Percent of current equity risked per trade (0-100).
    pub risk_per_trade: f64,
    #[serde(default = "default_num_simulations")]
    pub num_simulations: i64,
    #[serde(default = "default_num_trades")]
    pub num_trades: i64,
    /// Optional seed for a reproducible run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationRequest {
    /// Converts percentages to fractions and checks the simulation size
    /// against `limits`.
    ///
    /// # Errors
    /// Returns `EngineError::NonPositiveCount` for a zero or negative count,
    /// or `EngineError::LimitExceeded` if the request would allocate more
    /// than `limits` allow.
    pub fn into_parameters(
        &self,
        limits: &SimulationLimits,
    ) -> Result<SimulationParameters, EngineError> {
        let num_paths = positive_count("num_simulations", self.num_simulations)?;
        let num_steps = positive_count("num_trades", self.num_trades)?;

        check_limit("num_simulations", num_paths, limits.max_paths)?;
        check_limit("num_trades", num_steps, limits.max_steps)?;
        let cells = num_paths.saturating_mul(num_steps.saturating_add(1));
        check_limit("num_simulations * (num_trades + 1)", cells, limits.max_cells)?;

        Ok(SimulationParameters {
            starting_equity: self.starting_equity,
            win_probability: self.win_rate / 100.0,
            average_win: self.avg_win,
            average_loss: self.avg_loss,
            risk_fraction: self.risk_per_trade / 100.0,
            num_paths,
            num_steps,
        })
    }
}

fn positive_count(field: &'static str, value: i64) -> Result<usize, EngineError> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or(EngineError::NonPositiveCount { field, value })
}

fn check_limit(field: &'static str, value: usize, max: usize) -> Result<(), EngineError> {
    if value > max {
        return Err(EngineError::LimitExceeded { field, value, max });
    }
    Ok(())
}
