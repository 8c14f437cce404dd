use clap::Parser;
use pvp_parts::core::report::simulation_text_table;
use pvp_parts::core::simulation::{simulate, MAX_SIMULATION_COSTS};
use pvp_parts::utils::{logger, validation::Validate};
use pvp_parts::SimulationParams;

#[derive(Parser)]
#[command(name = "pvp-simulate")]
#[command(about = "Simulate sale prices from raw FOB costs with custom markup parameters")]
struct Args {
    /// FOB cost to simulate (repeat up to 5 times)
    #[arg(long = "cost")]
    costs: Vec<String>,

    /// Remittance tax rate in percent (0-200)
    #[arg(long, default_value = "65.0")]
    remittance: f64,

    /// Gross margin in percent (0-100, exclusive)
    #[arg(long, default_value = "40.0")]
    margin: f64,

    /// Import index for sea freight in percent
    #[arg(long, default_value = "20.0")]
    import_sea: f64,

    /// Import index for air freight in percent
    #[arg(long, default_value = "90.0")]
    import_air: f64,

    /// Multiplier applied to every cost before pricing
    #[arg(long, default_value = "1.0")]
    scale: f64,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn params(&self) -> SimulationParams {
        SimulationParams {
            remittance_rate: self.remittance / 100.0,
            margin_rate: self.margin / 100.0,
            import_index_sea: self.import_sea / 100.0,
            import_index_air: self.import_air / 100.0,
            cost_scale: self.scale,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    if args.costs.is_empty() {
        eprintln!(
            "❌ Provide at least one --cost (up to {})",
            MAX_SIMULATION_COSTS
        );
        std::process::exit(1);
    }

    let params = args.params();
    let rows = match params.validate().and_then(|_| simulate(&args.costs, &params)) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("❌ Simulation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", simulation_text_table(&rows));
    }

    Ok(())
}
