pub mod equity;
pub mod error;
pub mod formatter;
pub mod monte_carlo;
pub mod params;
pub mod profile;
pub mod request;
pub mod stats;

pub use equity::{EquityMatrix, OutcomeMatrix};
pub use error::EngineError;
pub use formatter::ReportFormatter;
pub use monte_carlo::{
    simulate, simulate_seeded, ChartData, MonteCarloSimulator, SimulationMetrics,
    SimulationResult, SimulationRun, PERCENTILE_BANDS, RUIN_THRESHOLD_FRACTION,
};
pub use params::{SimulationParameters, ValidatedParameters, DEFAULT_STARTING_EQUITY};
pub use profile::{ProfileRequest, ProfileSummary};
pub use request::{SimulationRequest, DEFAULT_NUM_SIMULATIONS, DEFAULT_NUM_TRADES};
