use clap::{Args, Parser, Subcommand};
use trademind_backtest::{
    simulate, simulate_seeded, ProfileRequest, ProfileSummary, ReportFormatter,
    SimulationRequest, DEFAULT_NUM_SIMULATIONS, DEFAULT_NUM_TRADES,
};
use trademind_core::{AppConfig, ConfigLoader, TradeExpectancy, DEFAULT_CAPITAL_UNITS};

#[derive(Parser)]
#[command(name = "trademind")]
#[command(about = "Monte Carlo equity-curve simulator for trading strategies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web API server
    Server {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Server address (overrides the configured host and port)
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Run a Monte Carlo simulation and print the outcome distribution
    Simulate(SimulateArgs),
    /// Print the closed-form expectancy and risk of ruin for a strategy
    Profile {
        /// Win rate in percent (0-100)
        #[arg(long)]
        win_rate: f64,
        /// Average winning trade
        #[arg(long)]
        avg_win: f64,
        /// Average losing trade
        #[arg(long, allow_hyphen_values = true)]
        avg_loss: f64,
        /// Risk capital in units of the average loss
        #[arg(long, default_value_t = DEFAULT_CAPITAL_UNITS)]
        capital_units: u32,
    },
}

#[derive(Args)]
struct SimulateArgs {
    /// Starting account equity
    #[arg(long, allow_hyphen_values = true)]
    starting_equity: f64,
    /// Win rate in percent (0-100)
    #[arg(long)]
    win_rate: f64,
    /// Average winning trade
    #[arg(long)]
    avg_win: f64,
    /// Average losing trade
    #[arg(long, allow_hyphen_values = true)]
    avg_loss: f64,
    /// Percent of current equity risked per trade
    #[arg(long)]
    risk_per_trade: f64,
    /// Number of simulated equity curves
    #[arg(long, default_value_t = DEFAULT_NUM_SIMULATIONS, allow_hyphen_values = true)]
    num_simulations: i64,
    /// Number of trades per curve
    #[arg(long, default_value_t = DEFAULT_NUM_TRADES, allow_hyphen_values = true)]
    num_trades: i64,
    /// Seed for a reproducible run
    #[arg(long, env = "TRADEMIND_SEED")]
    seed: Option<u64>,
    /// Print the JSON document instead of the text report
    #[arg(long)]
    json: bool,
}

impl From<&SimulateArgs> for SimulationRequest {
    fn from(args: &SimulateArgs) -> Self {
        Self {
            starting_equity: args.starting_equity,
            win_rate: args.win_rate,
            avg_win: args.avg_win,
            avg_loss: args.avg_loss,
            risk_per_trade: args.risk_per_trade,
            num_simulations: args.num_simulations,
            num_trades: args.num_trades,
            seed: args.seed,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Server { config, addr } => {
            run_server(&config, addr.as_deref()).await?;
        }
        Commands::Simulate(args) => {
            run_simulate(&args)?;
        }
        Commands::Profile {
            win_rate,
            avg_win,
            avg_loss,
            capital_units,
        } => {
            run_profile(&ProfileRequest {
                win_rate,
                avg_win,
                avg_loss,
                capital_units,
            })?;
        }
    }

    Ok(())
}

async fn run_server(config_path: &str, addr: Option<&str>) -> anyhow::Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    let addr = addr.map_or_else(|| config.server.addr(), str::to_string);

    tracing::info!("Starting web API server on {}", addr);

    let server = trademind_web_api::ApiServer::new(&config);
    server.serve(&addr).await?;

    Ok(())
}

fn run_simulate(args: &SimulateArgs) -> anyhow::Result<()> {
    // Limits come from configuration so the CLI and API accept the same sizes
    let config = ConfigLoader::load().unwrap_or_else(|e| {
        tracing::warn!("Falling back to default configuration: {}", e);
        AppConfig::default()
    });

    let request = SimulationRequest::from(args);
    let params = request.into_parameters(&config.simulation)?;

    tracing::info!(
        "Simulating {} paths of {} trades",
        params.num_paths,
        params.num_steps
    );

    let result = match request.seed {
        Some(seed) => simulate_seeded(&params, seed)?,
        None => simulate(&params)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", ReportFormatter::format(&result, &params));
    }

    Ok(())
}

fn run_profile(request: &ProfileRequest) -> anyhow::Result<()> {
    let stats: TradeExpectancy = request.expectancy()?;
    let summary = ProfileSummary::new(&stats, request.capital_units);

    println!();
    println!("Strategy Profile");
    println!("───────────────────────────────────────────────────────────────");
    println!("Reward / Risk:         {:.2}", summary.reward_risk_ratio);
    println!("Breakeven Win Rate:    {:.2}%", summary.breakeven_win_rate);
    println!("Expectancy / Trade:    {:.2}", summary.expectancy);
    println!("Expectancy (R):        {:.2}", summary.expectancy_r);
    println!(
        "Risk of Ruin:          {:.2}% ({} units of capital)",
        summary.analytic_risk_of_ruin, summary.capital_units
    );

    if !stats.is_positive() {
        println!("\n⚠️  Negative expectancy: this strategy loses money on average.");
    }

    Ok(())
}
