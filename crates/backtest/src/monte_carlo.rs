//! Monte Carlo simulation of compounding equity curves.
//!
//! Given a strategy's per-trade statistics, this module projects many
//! independent random trade sequences forward, compounding a fixed fraction
//! of current equity on every trade, and summarizes the distribution of
//! outcomes: risk of ruin, final equity extremes and a 10/50/90 percentile
//! cone over time.
//!
//! # Example
//!
//! ```
//! use trademind_backtest::{simulate_seeded, SimulationParameters};
//!
//! let params = SimulationParameters::new(1000, 50, 10_000.0)
//!     .with_win_probability(0.45)
//!     .with_averages(200.0, 100.0)
//!     .with_risk_fraction(0.02);
//!
//! let result = simulate_seeded(&params, 42).unwrap();
//! assert_eq!(result.chart_data.median_case.len(), 51);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::equity::{EquityMatrix, OutcomeMatrix};
use crate::error::EngineError;
use crate::params::{SimulationParameters, ValidatedParameters};
use crate::stats::{median, round_money, round_series, PercentileBands};

/// A path is ruined when its final equity is strictly below this fraction of
/// the starting equity.
pub const RUIN_THRESHOLD_FRACTION: f64 = 0.5;

/// Percentiles reported as the worst, median and best case trajectories.
pub const PERCENTILE_BANDS: [f64; 3] = [10.0, 50.0, 90.0];

/// Summary figures over the final equity of every path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Percentage (0-100) of paths ending below the ruin threshold.
    pub risk_of_ruin: f64,
    /// Median final equity.
    pub median_equity: f64,
    /// Lowest final equity.
    pub min_equity: f64,
    /// Highest final equity.
    pub max_equity: f64,
    /// Starting equity actually used, after any fallback.
    pub starting_equity: f64,
}

/// Percentile trajectories, each of length `num_steps + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// 10th percentile equity at each step.
    pub worst_case: Vec<f64>,
    /// 50th percentile equity at each step.
    pub median_case: Vec<f64>,
    /// 90th percentile equity at each step.
    pub best_case: Vec<f64>,
}

/// Outcome distribution of one simulation, rounded for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub metrics: SimulationMetrics,
    pub chart_data: ChartData,
}

impl SimulationResult {
    /// Reduces an equity matrix to summary metrics and percentile bands.
    ///
    /// All figures are computed at full precision and rounded to 2 decimal
    /// places only here.
    #[must_use]
    pub fn from_equity(equity: &EquityMatrix, starting_equity: f64) -> Self {
        let finals = equity.final_equities();
        let ruin_level = starting_equity * RUIN_THRESHOLD_FRACTION;

        let ruined = finals.iter().filter(|&&e| e < ruin_level).count();
        let risk_of_ruin = ruined as f64 / finals.len() as f64 * 100.0;

        let min_equity = finals.iter().copied().fold(f64::INFINITY, f64::min);
        let max_equity = finals.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let bands = PercentileBands::from_matrix(equity, PERCENTILE_BANDS);

        Self {
            metrics: SimulationMetrics {
                risk_of_ruin: round_money(risk_of_ruin),
                median_equity: round_money(median(finals)),
                min_equity: round_money(min_equity),
                max_equity: round_money(max_equity),
                starting_equity: round_money(starting_equity),
            },
            chart_data: ChartData {
                worst_case: round_series(&bands.lower),
                median_case: round_series(&bands.middle),
                best_case: round_series(&bands.upper),
            },
        }
    }
}

/// Full output of one run: the raw equity matrix and its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub equity: EquityMatrix,
    pub result: SimulationResult,
}

/// Monte Carlo simulator for fixed-fractional position sizing.
///
/// Holds no random state between runs: every call to [`Self::run`] builds
/// its own generator.
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    params: ValidatedParameters,
    seed: Option<u64>,
}

impl MonteCarloSimulator {
    /// Creates a simulator after validating `params`.
    ///
    /// # Errors
    /// Returns an error if the parameters violate the engine contract; see
    /// [`SimulationParameters::validate`].
    pub fn new(params: &SimulationParameters) -> Result<Self, EngineError> {
        Ok(Self {
            params: params.validate()?,
            seed: None,
        })
    }

    /// Sets a seed for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the validated parameters the simulator runs on.
    #[must_use]
    pub fn params(&self) -> &ValidatedParameters {
        &self.params
    }

    /// Runs the simulation with a fresh generator, seeded if a seed was set
    /// and from OS entropy otherwise.
    ///
    /// # Errors
    /// Does not fail for validated parameters; the `Result` is shared with
    /// [`Self::run_with_outcomes`].
    pub fn run(&self) -> Result<SimulationRun, EngineError> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.run_with_rng(&mut rng)
    }

    /// Runs the simulation drawing outcomes from `rng`.
    ///
    /// # Errors
    /// See [`Self::run`].
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SimulationRun, EngineError> {
        let outcomes = OutcomeMatrix::draw(
            self.params.num_paths(),
            self.params.num_steps(),
            self.params.win_probability(),
            rng,
        );
        self.run_with_outcomes(&outcomes)
    }

    /// Runs the compounding walk over a given outcome matrix.
    ///
    /// # Errors
    /// Returns `EngineError::ShapeMismatch` if `outcomes` does not match the
    /// configured dimensions.
    pub fn run_with_outcomes(&self, outcomes: &OutcomeMatrix) -> Result<SimulationRun, EngineError> {
        let equity = EquityMatrix::compound(&self.params, outcomes)?;
        let result = SimulationResult::from_equity(&equity, self.params.starting_equity());

        tracing::debug!(
            paths = self.params.num_paths(),
            steps = self.params.num_steps(),
            reward_risk = self.params.reward_risk().value(),
            risk_of_ruin = result.metrics.risk_of_ruin,
            "monte carlo run complete"
        );

        Ok(SimulationRun { equity, result })
    }
}

/// Simulates `params` with a fresh entropy-seeded generator.
///
/// # Errors
/// Returns an error if the parameters violate the engine contract.
pub fn simulate(params: &SimulationParameters) -> Result<SimulationResult, EngineError> {
    Ok(MonteCarloSimulator::new(params)?.run()?.result)
}

/// Simulates `params` deterministically from `seed`.
///
/// # Errors
/// Returns an error if the parameters violate the engine contract.
pub fn simulate_seeded(
    params: &SimulationParameters,
    seed: u64,
) -> Result<SimulationResult, EngineError> {
    Ok(MonteCarloSimulator::new(params)?
        .with_seed(seed)
        .run()?
        .result)
}
