//! Reward-to-risk ratio (R-multiple) derived from average win and loss sizes.

use serde::{Deserialize, Serialize};

/// Units gained per unit risked on a winning trade.
///
/// Built from the magnitudes of the average win and average loss, so the
/// sign convention used for losses does not matter.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardRiskRatio(f64);

impl RewardRiskRatio {
    /// Ratio used when the average loss is zero but the average win is not.
    ///
    /// The ratio is undefined there; reward is treated as equal to risk.
    pub const UNDEFINED_FALLBACK: f64 = 1.0;

    /// Derives the ratio `|average_win / average_loss|`.
    ///
    /// A zero average loss cannot be divided by: the ratio is 0 when the
    /// average win is also zero and [`Self::UNDEFINED_FALLBACK`] otherwise.
    ///
    /// # Examples
    /// ```
    /// use trademind_core::RewardRiskRatio;
    ///
    /// assert_eq!(RewardRiskRatio::from_averages(200.0, 100.0).value(), 2.0);
    /// assert_eq!(RewardRiskRatio::from_averages(200.0, -100.0).value(), 2.0);
    /// assert_eq!(RewardRiskRatio::from_averages(0.0, 0.0).value(), 0.0);
    /// assert_eq!(RewardRiskRatio::from_averages(10.0, 0.0).value(), 1.0);
    /// ```
    #[must_use]
    pub fn from_averages(average_win: f64, average_loss: f64) -> Self {
        if average_loss == 0.0 {
            if average_win == 0.0 {
                Self(0.0)
            } else {
                Self(Self::UNDEFINED_FALLBACK)
            }
        } else {
            Self((average_win / average_loss).abs())
        }
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Win probability at which a trade has zero expectancy: `1 / (1 + R)`.
    #[must_use]
    pub fn breakeven_win_probability(self) -> f64 {
        1.0 / (1.0 + self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_magnitudes() {
        assert!((RewardRiskRatio::from_averages(150.0, 50.0).value() - 3.0).abs() < f64::EPSILON);
        assert!((RewardRiskRatio::from_averages(-150.0, 50.0).value() - 3.0).abs() < f64::EPSILON);
        assert!((RewardRiskRatio::from_averages(50.0, 200.0).value() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_loss_and_zero_win_is_zero() {
        assert_eq!(RewardRiskRatio::from_averages(0.0, 0.0).value(), 0.0);
    }

    #[test]
    fn zero_loss_with_nonzero_win_falls_back_to_one() {
        assert_eq!(RewardRiskRatio::from_averages(10.0, 0.0).value(), 1.0);
        assert_eq!(RewardRiskRatio::from_averages(-10.0, 0.0).value(), 1.0);
    }

    #[test]
    fn zero_win_with_nonzero_loss_is_zero() {
        assert_eq!(RewardRiskRatio::from_averages(0.0, 100.0).value(), 0.0);
    }

    #[test]
    fn breakeven_for_two_to_one_is_one_third() {
        let ratio = RewardRiskRatio::from_averages(200.0, 100.0);
        assert!((ratio.breakeven_win_probability() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn breakeven_for_zero_ratio_is_certainty() {
        let ratio = RewardRiskRatio::from_averages(0.0, 0.0);
        assert!((ratio.breakeven_win_probability() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&RewardRiskRatio::from_averages(3.0, 2.0)).unwrap();
        assert_eq!(json, "1.5");
    }
}
