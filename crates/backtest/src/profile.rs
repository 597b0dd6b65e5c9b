//! Closed-form strategy profile: expectancy, breakeven win rate and analytic
//! risk of ruin for the same statistics the simulator consumes.

use serde::{Deserialize, Serialize};
use trademind_core::{TradeExpectancy, DEFAULT_CAPITAL_UNITS};

use crate::error::EngineError;
use crate::stats::round_money;

const fn default_capital_units() -> u32 {
    DEFAULT_CAPITAL_UNITS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRequest {
    /// Win rate in percent (0-100).
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Risk capital in units of the average loss.
    #[serde(default = "default_capital_units")]
    pub capital_units: u32,
}

impl ProfileRequest {
    /// Validates the request and computes the trade expectancy.
    ///
    /// # Errors
    /// Returns an error if a value is not finite or the win rate lies outside
    /// 0-100.
    pub fn expectancy(&self) -> Result<TradeExpectancy, EngineError> {
        for (field, value) in [
            ("win_rate", self.win_rate),
            ("avg_win", self.avg_win),
            ("avg_loss", self.avg_loss),
        ] {
            if !value.is_finite() {
                return Err(EngineError::NonFinite { field, value });
            }
        }

        let win_probability = self.win_rate / 100.0;
        if !(0.0..=1.0).contains(&win_probability) {
            return Err(EngineError::ProbabilityOutOfRange {
                field: "win_rate",
                value: win_probability,
            });
        }

        Ok(TradeExpectancy::from_stats(
            win_probability,
            self.avg_win,
            self.avg_loss,
        ))
    }
}

/// Rounded, percent-scaled view of a [`TradeExpectancy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub reward_risk_ratio: f64,
    /// Win rate (percent) at which expectancy is zero.
    pub breakeven_win_rate: f64,
    /// Expected profit per trade, in the units of the averages.
    pub expectancy: f64,
    /// Expected profit per trade in units of the average loss.
    pub expectancy_r: f64,
    /// Analytic risk of ruin in percent.
    pub analytic_risk_of_ruin: f64,
    pub capital_units: u32,
}

impl ProfileSummary {
    /// Builds the summary for `capital_units` of risk capital.
    #[must_use]
    pub fn new(stats: &TradeExpectancy, capital_units: u32) -> Self {
        Self {
            reward_risk_ratio: round_money(stats.reward_risk.value()),
            breakeven_win_rate: round_money(stats.reward_risk.breakeven_win_probability() * 100.0),
            expectancy: round_money(stats.expectancy),
            expectancy_r: round_money(stats.expectancy_r),
            analytic_risk_of_ruin: round_money(stats.analytic_risk_of_ruin(capital_units) * 100.0),
            capital_units,
        }
    }
}

impl TryFrom<&ProfileRequest> for ProfileSummary {
    type Error = EngineError;

    fn try_from(request: &ProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self::new(&request.expectancy()?, request.capital_units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(win_rate: f64, avg_win: f64, avg_loss: f64) -> ProfileRequest {
        ProfileRequest {
            win_rate,
            avg_win,
            avg_loss,
            capital_units: DEFAULT_CAPITAL_UNITS,
        }
    }

    #[test]
    fn summary_for_two_to_one_coin_flip() {
        let summary = ProfileSummary::try_from(&request(50.0, 200.0, 100.0)).unwrap();

        assert_eq!(summary.reward_risk_ratio, 2.0);
        assert!((summary.breakeven_win_rate - 33.33).abs() < 1e-9);
        assert_eq!(summary.expectancy, 50.0);
        assert_eq!(summary.expectancy_r, 0.5);
        assert_eq!(summary.capital_units, 20);
    }

    #[test]
    fn losing_profile_has_negative_expectancy() {
        let summary = ProfileSummary::try_from(&request(30.0, 100.0, 100.0)).unwrap();

        assert_eq!(summary.expectancy, -40.0);
        assert_eq!(summary.analytic_risk_of_ruin, 100.0);
    }

    #[test]
    fn capital_units_default_when_omitted() {
        let req: ProfileRequest =
            serde_json::from_str(r#"{"win_rate": 55, "avg_win": 100, "avg_loss": 100}"#).unwrap();

        assert_eq!(req.capital_units, DEFAULT_CAPITAL_UNITS);
    }

    #[test]
    fn win_rate_above_hundred_rejected() {
        let err = request(101.0, 100.0, 100.0).expectancy().unwrap_err();

        assert!(matches!(
            err,
            EngineError::ProbabilityOutOfRange {
                field: "win_rate",
                ..
            }
        ));
    }

    #[test]
    fn nan_average_rejected() {
        let err = request(50.0, f64::NAN, 100.0).expectancy().unwrap_err();
        assert!(err.to_string().contains("avg_win"));
    }
}
