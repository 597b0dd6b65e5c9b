use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub simulation: SimulationLimits,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Returns the `host:port` string the API server binds to.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upper bounds on caller-supplied simulation dimensions.
///
/// The equity matrix holds `paths * (steps + 1)` values, so these caps bound
/// the allocation a single request can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationLimits {
    /// Maximum number of simulated paths.
    pub max_paths: usize,
    /// Maximum number of trades per path.
    pub max_steps: usize,
    /// Maximum number of equity matrix cells.
    pub max_cells: usize,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            max_paths: 100_000,
            max_steps: 10_000,
            max_cells: 20_000_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            simulation: SimulationLimits::default(),
            cors: CorsConfig {
                allowed_origins: vec![
                    "http://localhost:5173".to_string(),
                    "http://localhost:3000".to_string(),
                ],
            },
        }
    }
}
