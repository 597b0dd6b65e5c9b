pub mod config;
pub mod config_loader;
pub mod expectancy;
pub mod reward_risk;

pub use config::{AppConfig, CorsConfig, ServerConfig, SimulationLimits};
pub use config_loader::ConfigLoader;
pub use expectancy::{TradeExpectancy, DEFAULT_CAPITAL_UNITS};
pub use reward_risk::RewardRiskRatio;
