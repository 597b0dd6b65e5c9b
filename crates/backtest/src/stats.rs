//! Distribution statistics over simulated equity values.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::equity::EquityMatrix;

/// Percentile of an ascending-sorted slice using linear interpolation
/// between order statistics.
///
/// The rank is `h = (n - 1) * pct / 100`; the result interpolates between
/// `sorted[floor(h)]` and the next value. This is NumPy's default `linear`
/// method.
///
/// Returns 0.0 for an empty slice.
///
/// # Examples
/// ```
/// use trademind_backtest::stats::percentile_linear;
///
/// let values = [10.0, 20.0, 30.0, 40.0];
/// assert!((percentile_linear(&values, 50.0) - 25.0).abs() < 1e-9);
/// assert!((percentile_linear(&values, 10.0) - 13.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn percentile_linear(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => return 0.0,
        1 => return sorted[0],
        _ => {}
    }

    let n = sorted.len();
    let rank = (n - 1) as f64 * pct.clamp(0.0, 100.0) / 100.0;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Median of an unsorted slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    percentile_linear(&sorted_copy(values), 50.0)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Low, middle and high percentile trajectories across all paths.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileBands {
    pub lower: Vec<f64>,
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
}

impl PercentileBands {
    /// Computes the `pcts` percentiles of every column of `equity`.
    #[must_use]
    pub fn from_matrix(equity: &EquityMatrix, pcts: [f64; 3]) -> Self {
        let columns = equity.num_columns();
        let mut bands = Self {
            lower: Vec::with_capacity(columns),
            middle: Vec::with_capacity(columns),
            upper: Vec::with_capacity(columns),
        };

        for column in equity.steps() {
            let sorted = sorted_copy(column);
            bands.lower.push(percentile_linear(&sorted, pcts[0]));
            bands.middle.push(percentile_linear(&sorted, pcts[1]));
            bands.upper.push(percentile_linear(&sorted, pcts[2]));
        }

        bands
    }
}

/// Rounds a monetary or percentage figure to 2 decimal places for reporting.
///
/// Ties round to even, matching NumPy's `round`. The rounding is done in
/// `Decimal` so that values like `0.125` round on their decimal digits.
/// Values outside the `Decimal` range are returned unchanged; at that
/// magnitude an `f64` has no fractional digits left to round.
#[must_use]
pub fn round_money(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Rounds every value of a trajectory; see [`round_money`].
#[must_use]
pub fn round_series(values: &[f64]) -> Vec<f64> {
    values.iter().copied().map(round_money).collect()
}
