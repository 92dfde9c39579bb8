use std::collections::HashMap;
use std::path::PathBuf;

use color_eyre::eyre;
use structopt::StructOpt;
use tracing::info;

use sim_orderflow::config::{BurstSizeRange, GenerationConfig};
use sim_orderflow::domain::{BASE_PRICES, DEFAULT_BASE_PRICE};
use sim_orderflow::logger::init_tracing;
use sim_orderflow::sink::{open_sink, OutputFormat};
use sim_orderflow::{FlowScheduler, FlowSummary};

#[derive(Debug, StructOpt)]
#[structopt(name = "orderflow", about = "Synthetic order-flow generator for matching engine tests")]
struct Cli {
    /// Also append logs to a dated file in this directory
    #[structopt(long, parse(from_os_str), global = true)]
    log_dir: Option<PathBuf>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Generate an order file
    Generate(GenerateArgs),
    /// Print the built-in base price table
    Instruments,
}

#[derive(Debug, StructOpt)]
struct GenerateArgs {
    /// Output path, `-` for stdout
    #[structopt(short, long, parse(from_os_str), default_value = "data/sample_orders.csv")]
    output: PathBuf,

    /// Output format (csv or json); inferred from the extension when omitted
    #[structopt(long)]
    format: Option<OutputFormat>,

    /// Number of orders to generate
    #[structopt(short, long, default_value = "100000")]
    num_orders: usize,

    /// Comma separated symbols
    #[structopt(short, long, use_delimiter = true, default_value = "AAPL,GOOGL,MSFT")]
    symbols: Vec<String>,

    /// Duration of the order flow in hours
    #[structopt(short, long, default_value = "1.0")]
    duration: f64,

    /// RNG seed; random (and logged) when omitted
    #[structopt(long, env = "ORDERFLOW_SEED")]
    seed: Option<u64>,

    /// Chance that a scheduling step becomes a burst
    #[structopt(long, default_value = "0.05")]
    burst_probability: f64,

    #[structopt(long, default_value = "10")]
    burst_min: usize,

    #[structopt(long, default_value = "50")]
    burst_max: usize,

    /// Std-dev of the per-step relative price shock
    #[structopt(long, default_value = "0.02")]
    volatility: f64,

    #[structopt(long, default_value = "10000")]
    quantity_cap: u32,

    /// Base price override, e.g. `--base-price NVDA=900`
    #[structopt(long, parse(try_from_str = parse_base_price), number_of_values = 1)]
    base_price: Vec<(String, f64)>,

    /// Microseconds added to every timestamp
    #[structopt(long, default_value = "0")]
    start_time_us: u64,
}

impl GenerateArgs {
    fn to_config(&self) -> GenerationConfig {
        GenerationConfig {
            symbols: self.symbols.iter().map(|s| s.trim().to_string()).collect(),
            num_orders: self.num_orders,
            duration_hours: self.duration,
            burst_probability: self.burst_probability,
            burst_size_range: BurstSizeRange {
                min: self.burst_min,
                max: self.burst_max,
            },
            volatility: self.volatility,
            quantity_cap: self.quantity_cap,
            base_prices: self.base_price.iter().cloned().collect::<HashMap<_, _>>(),
            start_time_us: self.start_time_us,
            seed: self.seed,
        }
    }
}

fn parse_base_price(s: &str) -> Result<(String, f64), String> {
    let (symbol, price) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=PRICE, got {s:?}"))?;
    let price = price
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid price in {s:?}: {e}"))?;
    Ok((symbol.trim().to_string(), price))
}

fn main() -> eyre::Result<()> {
    // init error reporting
    color_eyre::install()?;

    dotenv::dotenv().ok();

    let cli = Cli::from_args();

    // init logging
    let _guards = init_tracing(cli.log_dir.as_deref())?;

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Instruments => {
            print_instruments();
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> eyre::Result<()> {
    let config = args.to_config();
    let scheduler = FlowScheduler::new(config)?;
    if let Some(seed) = scheduler.seed() {
        info!("seed: {} (rerun with --seed {} to reproduce)", seed, seed);
    }

    let orders = scheduler.run();

    FlowSummary::from_orders(&orders).log();

    let mut sink = open_sink(&args.output, args.format)?;
    sink.write_orders(&orders)?;

    info!("Generated {} orders", orders.len());
    info!("Output saved to: {}", args.output.display());

    Ok(())
}

fn print_instruments() {
    println!("{:<8} {:>10}", "SYMBOL", "BASE");
    for (symbol, price) in BASE_PRICES {
        println!("{:<8} {:>10.2}", symbol, price);
    }
    println!("{:<8} {:>10.2}", "(other)", DEFAULT_BASE_PRICE);
}
