#![allow(clippy::format_push_string)]
#![allow(clippy::uninlined_format_args)]

use crate::monte_carlo::{SimulationResult, RUIN_THRESHOLD_FRACTION};
use crate::params::SimulationParameters;

/// Risk of ruin (percent) at or above which the report adds a warning.
const WARN_RISK_OF_RUIN_PCT: f64 = 10.0;

pub struct ReportFormatter;

impl ReportFormatter {
    #[must_use]
    pub fn format(result: &SimulationResult, params: &SimulationParameters) -> String {
        let metrics = &result.metrics;
        let chart = &result.chart_data;
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                 MONTE CARLO SIMULATION                        \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        // Inputs
        output.push_str("Strategy Profile\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "Starting Equity:       ${:.2}\n",
            metrics.starting_equity
        ));
        output.push_str(&format!(
            "Win Rate:              {:.2}%\n",
            params.win_probability * 100.0
        ));
        output.push_str(&format!(
            "Average Win / Loss:    {:.2} / {:.2}\n",
            params.average_win.abs(),
            params.average_loss.abs()
        ));
        output.push_str(&format!(
            "Risk Per Trade:        {:.2}%\n",
            params.risk_fraction * 100.0
        ));
        output.push_str(&format!(
            "Paths x Trades:        {} x {}\n",
            params.num_paths, params.num_steps
        ));
        output.push('\n');

        // Outcome distribution
        output.push_str("Final Equity\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("Median:                ${:.2}\n", metrics.median_equity));
        output.push_str(&format!("Minimum:               ${:.2}\n", metrics.min_equity));
        output.push_str(&format!("Maximum:               ${:.2}\n", metrics.max_equity));
        if let (Some(worst), Some(best)) = (chart.worst_case.last(), chart.best_case.last()) {
            output.push_str(&format!(
                "10th - 90th pct:       ${:.2} - ${:.2}\n",
                worst, best
            ));
        }
        output.push('\n');

        output.push_str("Risk\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "Risk of Ruin:          {:.2}% (final equity < {:.0}% of start)\n",
            metrics.risk_of_ruin,
            RUIN_THRESHOLD_FRACTION * 100.0
        ));

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        if !Self::is_favorable(result) {
            output.push_str("\n⚠️  This profile is not favorable at the chosen risk.\n");
            output.push_str("    Consider reducing risk per trade or improving the edge.\n\n");
        }

        output
    }

    /// Fewer than 10% of paths ruined and a median path that finished above
    /// its starting equity.
    fn is_favorable(result: &SimulationResult) -> bool {
        result.metrics.risk_of_ruin < WARN_RISK_OF_RUIN_PCT
            && result.metrics.median_equity > result.metrics.starting_equity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equity::OutcomeMatrix;
    use crate::monte_carlo::MonteCarloSimulator;

    fn result_for(rows: &[Vec<bool>], params: &SimulationParameters) -> SimulationResult {
        MonteCarloSimulator::new(params)
            .unwrap()
            .run_with_outcomes(&OutcomeMatrix::from_rows(rows).unwrap())
            .unwrap()
            .result
    }

    #[test]
    fn report_lists_metrics() {
        let params = SimulationParameters::new(1, 1, 1000.0).with_risk_fraction(0.02);
        let result = result_for(&[vec![true]], &params);

        let report = ReportFormatter::format(&result, &params);

        assert!(report.contains("MONTE CARLO SIMULATION"));
        assert!(report.contains("Starting Equity:       $1000.00"));
        assert!(report.contains("Median:                $1040.00"));
        assert!(report.contains("Risk Per Trade:        2.00%"));
        assert!(report.contains("Risk of Ruin:          0.00%"));
        assert!(report.contains("1 x 1"));
    }

    #[test]
    fn unfavorable_profile_is_flagged() {
        let params = SimulationParameters::new(1, 2, 1000.0).with_risk_fraction(0.5);
        let result = result_for(&[vec![false, false]], &params);

        let report = ReportFormatter::format(&result, &params);

        assert!(report.contains("Risk of Ruin:          100.00%"));
        assert!(report.contains("not favorable"));
    }

    #[test]
    fn winning_profile_has_no_warning() {
        let params = SimulationParameters::new(2, 2, 1000.0).with_risk_fraction(0.02);
        let result = result_for(&[vec![true, true], vec![true, false]], &params);

        let report = ReportFormatter::format(&result, &params);

        assert!(!report.contains("not favorable"));
    }

    #[test]
    fn flat_median_is_not_favorable() {
        // One winner and one loser leave the median exactly at the start
        let params = SimulationParameters::new(2, 1, 1000.0)
            .with_averages(100.0, 100.0)
            .with_risk_fraction(0.02);
        let result = result_for(&[vec![true], vec![false]], &params);

        assert_eq!(result.metrics.median_equity, 1000.0);
        assert!(!ReportFormatter::is_favorable(&result));
    }
}
