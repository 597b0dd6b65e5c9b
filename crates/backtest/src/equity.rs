//! Trade outcomes and the compounded equity matrix built from them.

use rand::Rng;

use crate::error::EngineError;
use crate::params::ValidatedParameters;

/// Win/loss outcome of every trade on every path (`true` = win).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeMatrix {
    num_paths: usize,
    num_steps: usize,
    // path-major: wins[path * num_steps + step]
    wins: Vec<bool>,
}

impl OutcomeMatrix {
    /// Draws independent Bernoulli outcomes with success probability
    /// `win_probability`, path by path.
    pub fn draw<R: Rng + ?Sized>(
        num_paths: usize,
        num_steps: usize,
        win_probability: f64,
        rng: &mut R,
    ) -> Self {
        let wins = (0..num_paths * num_steps)
            .map(|_| rng.gen::<f64>() < win_probability)
            .collect();

        Self {
            num_paths,
            num_steps,
            wins,
        }
    }

    /// Builds a matrix from explicit per-path outcome rows.
    ///
    /// # Errors
    /// Returns `EngineError::ShapeMismatch` if there are no rows, a row is
    /// empty, or rows differ in length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, EngineError> {
        let num_paths = rows.len();
        let num_steps = rows.first().map_or(0, Vec::len);

        if let Some(bad) = rows.iter().find(|row| row.len() != num_steps) {
            return Err(EngineError::ShapeMismatch {
                expected_paths: num_paths,
                expected_steps: num_steps,
                actual_paths: num_paths,
                actual_steps: bad.len(),
            });
        }
        if num_paths == 0 || num_steps == 0 {
            return Err(EngineError::ShapeMismatch {
                expected_paths: num_paths.max(1),
                expected_steps: num_steps.max(1),
                actual_paths: num_paths,
                actual_steps: num_steps,
            });
        }

        Ok(Self {
            num_paths,
            num_steps,
            wins: rows.concat(),
        })
    }

    #[must_use]
    pub const fn num_paths(&self) -> usize {
        self.num_paths
    }

    #[must_use]
    pub const fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Returns whether trade `step` on path `path` was a win.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[must_use]
    pub fn is_win(&self, path: usize, step: usize) -> bool {
        assert!(step < self.num_steps, "step {step} out of bounds");
        self.wins[path * self.num_steps + step]
    }

    #[cfg(test)]
    fn win_rate(&self) -> f64 {
        if self.wins.is_empty() {
            return 0.0;
        }
        self.wins.iter().filter(|&&w| w).count() as f64 / self.wins.len() as f64
    }
}

/// Equity of every path after every trade.
///
/// Has `num_paths` rows and `num_steps + 1` columns; column 0 is the starting
/// equity. Every entry is non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityMatrix {
    num_paths: usize,
    num_steps: usize,
    // step-major: values[step * num_paths + path]
    values: Vec<f64>,
}

impl EquityMatrix {
    /// Runs the compounding walk over `outcomes`.
    ///
    /// Position size depends on current equity, so steps are processed in
    /// order; each step updates every path at once. A path that reaches zero
    /// risks nothing afterwards and stays at zero. Equity saturates at
    /// `f64::MAX` instead of overflowing to infinity.
    ///
    /// # Errors
    /// Returns `EngineError::ShapeMismatch` if `outcomes` does not have the
    /// dimensions in `params`.
    pub fn compound(
        params: &ValidatedParameters,
        outcomes: &OutcomeMatrix,
    ) -> Result<Self, EngineError> {
        let num_paths = params.num_paths();
        let num_steps = params.num_steps();

        if outcomes.num_paths() != num_paths || outcomes.num_steps() != num_steps {
            return Err(EngineError::ShapeMismatch {
                expected_paths: num_paths,
                expected_steps: num_steps,
                actual_paths: outcomes.num_paths(),
                actual_steps: outcomes.num_steps(),
            });
        }

        let risk_fraction = params.risk_fraction();
        let reward_risk = params.reward_risk().value();

        let mut values = Vec::with_capacity(num_paths * (num_steps + 1));
        let mut current = vec![params.starting_equity(); num_paths];
        values.extend_from_slice(&current);

        for step in 0..num_steps {
            for (path, equity) in current.iter_mut().enumerate() {
                // Bankrupt paths stay at zero
                if *equity <= 0.0 {
                    continue;
                }
                let risk_amount = *equity * risk_fraction;
                let pnl = if outcomes.is_win(path, step) {
                    risk_amount * reward_risk
                } else {
                    -risk_amount
                };
                *equity = (*equity + pnl).clamp(0.0, f64::MAX);
            }
            values.extend_from_slice(&current);
        }

        Ok(Self {
            num_paths,
            num_steps,
            values,
        })
    }

    #[must_use]
    pub const fn num_paths(&self) -> usize {
        self.num_paths
    }

    #[must_use]
    pub const fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Number of columns (`num_steps + 1`).
    #[must_use]
    pub const fn num_columns(&self) -> usize {
        self.num_steps + 1
    }

    /// Equity of `path` after `step` trades.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[must_use]
    pub fn get(&self, path: usize, step: usize) -> f64 {
        self.step(step)[path]
    }

    /// Equity of every path after `step` trades.
    ///
    /// # Panics
    /// Panics if `step > num_steps`.
    #[must_use]
    pub fn step(&self, step: usize) -> &[f64] {
        let start = step * self.num_paths;
        &self.values[start..start + self.num_paths]
    }

    /// Iterates over the columns from step 0 to `num_steps`.
    pub fn steps(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.num_paths)
    }

    /// The equity curve of a single path.
    ///
    /// # Panics
    /// Panics if `path` is out of bounds.
    #[must_use]
    pub fn path(&self, path: usize) -> Vec<f64> {
        self.steps().map(|column| column[path]).collect()
    }

    /// Equity of every path after the last trade.
    #[must_use]
    pub fn final_equities(&self) -> &[f64] {
        self.step(self.num_steps)
    }
}
