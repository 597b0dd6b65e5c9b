//! Closed-form trade expectancy and analytic risk of ruin.
//!
//! These are the back-of-the-envelope counterparts to the Monte Carlo
//! simulation: they use the same per-trade statistics but no randomness.

use serde::{Deserialize, Serialize};

use crate::reward_risk::RewardRiskRatio;

/// Risk capital, in units of the average loss, assumed by
/// [`TradeExpectancy::analytic_risk_of_ruin`] when none is given.
pub const DEFAULT_CAPITAL_UNITS: u32 = 20;

/// Expected outcome of a single trade given its win rate and average sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeExpectancy {
    /// Probability that a trade is a winner (0.0-1.0).
    pub win_probability: f64,
    /// Magnitude of the average winning trade.
    pub average_win: f64,
    /// Magnitude of the average losing trade.
    pub average_loss: f64,
    /// Expected profit per trade: `p * avg_win - (1 - p) * avg_loss`.
    pub expectancy: f64,
    /// Expectancy in units of the average loss (the trader's edge).
    /// Zero when the average loss is zero.
    pub expectancy_r: f64,
    /// Reward-to-risk ratio of the average trade.
    pub reward_risk: RewardRiskRatio,
}

impl TradeExpectancy {
    /// Computes expectancy from a win probability and average trade sizes.
    ///
    /// Sizes are taken by magnitude, so a loss entered as `-100` is the same
    /// as `100`.
    ///
    /// # Examples
    /// ```
    /// use trademind_core::TradeExpectancy;
    ///
    /// let stats = TradeExpectancy::from_stats(0.5, 200.0, 100.0);
    /// assert!((stats.expectancy - 50.0).abs() < 1e-9);
    /// assert!((stats.expectancy_r - 0.5).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn from_stats(win_probability: f64, average_win: f64, average_loss: f64) -> Self {
        let average_win = average_win.abs();
        let average_loss = average_loss.abs();
        let loss_probability = 1.0 - win_probability;

        let expectancy = win_probability * average_win - loss_probability * average_loss;
        let expectancy_r = if average_loss > 0.0 {
            expectancy / average_loss
        } else {
            0.0
        };

        Self {
            win_probability,
            average_win,
            average_loss,
            expectancy,
            expectancy_r,
            reward_risk: RewardRiskRatio::from_averages(average_win, average_loss),
        }
    }

    /// Returns true if the average trade makes money.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.expectancy > 0.0
    }

    /// Classic gambler's-ruin approximation of the probability of losing
    /// `capital_units` average losses before recovering.
    ///
    /// ```text
    /// RoR = ((1 - edge) / (1 + edge)) ^ capital_units
    /// ```
    ///
    /// Returns a probability in `[0, 1]`: certain ruin when the edge is -1 or
    /// worse, no ruin when it is 1 or better.
    #[must_use]
    pub fn analytic_risk_of_ruin(&self, capital_units: u32) -> f64 {
        let edge = self.expectancy_r;
        if edge <= -1.0 {
            1.0
        } else if edge >= 1.0 {
            0.0
        } else {
            let base = (1.0 - edge) / (1.0 + edge);
            base.powi(i32::try_from(capital_units).unwrap_or(i32::MAX))
                .clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // Expectancy
    // ============================================================

    #[test]
    fn expectancy_for_two_to_one_coin_flip() {
        let stats = TradeExpectancy::from_stats(0.5, 200.0, 100.0);

        assert!((stats.expectancy - 50.0).abs() < 1e-9);
        assert!((stats.expectancy_r - 0.5).abs() < 1e-9);
        assert!((stats.reward_risk.value() - 2.0).abs() < 1e-9);
        assert!(stats.is_positive());
    }

    #[test]
    fn expectancy_uses_magnitudes() {
        let signed = TradeExpectancy::from_stats(0.4, 100.0, -100.0);
        let unsigned = TradeExpectancy::from_stats(0.4, 100.0, 100.0);

        assert_eq!(signed, unsigned);
        assert!((signed.expectancy + 20.0).abs() < 1e-9);
        assert!(!signed.is_positive());
    }

    #[test]
    fn zero_average_loss_has_zero_edge() {
        let stats = TradeExpectancy::from_stats(0.6, 100.0, 0.0);

        assert!((stats.expectancy - 60.0).abs() < 1e-9);
        assert_eq!(stats.expectancy_r, 0.0);
    }

    // ============================================================
    // Analytic risk of ruin
    // ============================================================

    #[test]
    fn zero_edge_gives_certain_ruin() {
        let stats = TradeExpectancy::from_stats(0.5, 100.0, 100.0);

        assert!((stats.analytic_risk_of_ruin(DEFAULT_CAPITAL_UNITS) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn positive_edge_shrinks_with_more_capital() {
        let stats = TradeExpectancy::from_stats(0.55, 100.0, 100.0);

        let small = stats.analytic_risk_of_ruin(5);
        let large = stats.analytic_risk_of_ruin(40);

        assert!(small > large);
        assert!(large > 0.0 && small < 1.0);
    }

    #[test]
    fn known_value_for_ten_percent_edge() {
        // edge = 0.55 - 0.45 = 0.1; base = 0.9 / 1.1
        let stats = TradeExpectancy::from_stats(0.55, 100.0, 100.0);
        let expected = (0.9_f64 / 1.1).powi(20);

        assert!((stats.analytic_risk_of_ruin(20) - expected).abs() < 1e-12);
    }

    #[test]
    fn edge_at_or_above_one_never_ruins() {
        let stats = TradeExpectancy::from_stats(0.8, 300.0, 100.0);

        assert!(stats.expectancy_r >= 1.0);
        assert_eq!(stats.analytic_risk_of_ruin(DEFAULT_CAPITAL_UNITS), 0.0);
    }

    #[test]
    fn edge_at_or_below_minus_one_always_ruins() {
        let stats = TradeExpectancy::from_stats(0.0, 100.0, 100.0);

        assert!((stats.expectancy_r + 1.0).abs() < 1e-12);
        assert_eq!(stats.analytic_risk_of_ruin(DEFAULT_CAPITAL_UNITS), 1.0);
    }
}
