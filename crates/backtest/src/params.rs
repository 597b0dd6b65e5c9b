//! Input parameters for a Monte Carlo equity simulation.
//!
//! [`SimulationParameters`] is what callers fill in; [`ValidatedParameters`]
//! is what the engine runs on. Validation either normalizes a value with a
//! documented fallback or rejects it with an [`EngineError`].

use serde::{Deserialize, Serialize};
use trademind_core::RewardRiskRatio;

use crate::error::EngineError;

/// Starting equity substituted when the caller supplies zero or a negative
/// amount.
pub const DEFAULT_STARTING_EQUITY: f64 = 1000.0;

/// Per-trade statistics and dimensions for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Capital at step 0.
    pub starting_equity: f64,
    /// Probability a trade is a win (0.0-1.0).
    pub win_probability: f64,
    /// Typical size of a winning trade.
    pub average_win: f64,
    /// Typical size of a losing trade.
    pub average_loss: f64,
    /// Fraction of current equity risked per trade (e.g. 0.02 = 2%).
    pub risk_fraction: f64,
    /// Number of independent equity curves.
    pub num_paths: usize,
    /// Number of trades per curve.
    pub num_steps: usize,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            starting_equity: DEFAULT_STARTING_EQUITY,
            win_probability: 0.5,
            average_win: 200.0,
            average_loss: 100.0,
            risk_fraction: 0.02,
            num_paths: 1000,
            num_steps: 50,
        }
    }
}

impl SimulationParameters {
    /// Creates parameters with the given dimensions and default statistics.
    #[must_use]
    pub fn new(num_paths: usize, num_steps: usize, starting_equity: f64) -> Self {
        Self {
            num_paths,
            num_steps,
            starting_equity,
            ..Default::default()
        }
    }

    /// Sets the win probability.
    #[must_use]
    pub fn with_win_probability(mut self, win_probability: f64) -> Self {
        self.win_probability = win_probability;
        self
    }

    /// Sets the average win and average loss sizes.
    #[must_use]
    pub fn with_averages(mut self, average_win: f64, average_loss: f64) -> Self {
        self.average_win = average_win;
        self.average_loss = average_loss;
        self
    }

    /// Sets the fraction of current equity risked per trade.
    #[must_use]
    pub fn with_risk_fraction(mut self, risk_fraction: f64) -> Self {
        self.risk_fraction = risk_fraction;
        self
    }

    /// Checks the parameters and applies the documented fallbacks.
    ///
    /// # Errors
    /// Returns an error if any real-valued field is NaN or infinite, if a
    /// dimension is zero, if the win probability lies outside `[0, 1]` or if
    /// the risk fraction lies outside `(0, 1]`.
    pub fn validate(&self) -> Result<ValidatedParameters, EngineError> {
        for (field, value) in [
            ("starting_equity", self.starting_equity),
            ("win_probability", self.win_probability),
            ("average_win", self.average_win),
            ("average_loss", self.average_loss),
            ("risk_fraction", self.risk_fraction),
        ] {
            if !value.is_finite() {
                return Err(EngineError::NonFinite { field, value });
            }
        }

        if self.num_paths == 0 {
            return Err(EngineError::NonPositiveCount {
                field: "num_paths",
                value: 0,
            });
        }
        if self.num_steps == 0 {
            return Err(EngineError::NonPositiveCount {
                field: "num_steps",
                value: 0,
            });
        }

        if !(0.0..=1.0).contains(&self.win_probability) {
            return Err(EngineError::ProbabilityOutOfRange {
                field: "win_probability",
                value: self.win_probability,
            });
        }
        if self.risk_fraction <= 0.0 || self.risk_fraction > 1.0 {
            return Err(EngineError::RiskFractionOutOfRange {
                field: "risk_fraction",
                value: self.risk_fraction,
            });
        }

        let starting_equity = if self.starting_equity <= 0.0 {
            tracing::debug!(
                supplied = self.starting_equity,
                fallback = DEFAULT_STARTING_EQUITY,
                "non-positive starting equity replaced with default"
            );
            DEFAULT_STARTING_EQUITY
        } else {
            self.starting_equity
        };

        Ok(ValidatedParameters {
            starting_equity,
            win_probability: self.win_probability,
            risk_fraction: self.risk_fraction,
            reward_risk: RewardRiskRatio::from_averages(self.average_win, self.average_loss),
            num_paths: self.num_paths,
            num_steps: self.num_steps,
        })
    }
}

/// Parameters that passed validation, with fallbacks applied and the
/// reward-to-risk ratio derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedParameters {
    starting_equity: f64,
    win_probability: f64,
    risk_fraction: f64,
    reward_risk: RewardRiskRatio,
    num_paths: usize,
    num_steps: usize,
}

impl ValidatedParameters {
    #[must_use]
    pub const fn starting_equity(&self) -> f64 {
        self.starting_equity
    }

    #[must_use]
    pub const fn win_probability(&self) -> f64 {
        self.win_probability
    }

    #[must_use]
    pub const fn risk_fraction(&self) -> f64 {
        self.risk_fraction
    }

    #[must_use]
    pub const fn reward_risk(&self) -> RewardRiskRatio {
        self.reward_risk
    }

    #[must_use]
    pub const fn num_paths(&self) -> usize {
        self.num_paths
    }

    #[must_use]
    pub const fn num_steps(&self) -> usize {
        self.num_steps
    }
}
