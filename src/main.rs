//! Serpentarium - CLI Entry Point
//!
//! Evolutionary snake simulation.

use clap::{Parser, Subcommand};
use serpentarium::{benchmark, web::run_server, Config, World};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "serpentarium")]
#[command(version)]
#[command(about = "Evolutionary snake simulation with a browser view")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the simulation over HTTP
    Serve {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Address to bind the server to
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        bind: String,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a headless simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of steps to simulate
        #[arg(short, long, default_value = "1000")]
        steps: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of steps
        #[arg(short, long, default_value = "1000")]
        steps: u64,

        /// Population size
        #[arg(short, long, default_value = "50")]
        population: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind, seed } => {
            let config = load_config(&config)?;

            let bind: SocketAddr = bind
                .parse()
                .map_err(|e| format!("Invalid bind address '{}': {}", bind, e))?;

            let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
            runtime.block_on(run_server(config, bind, seed))
        }

        Commands::Run {
            config,
            steps,
            seed,
            quiet,
        } => {
            let config = load_config(&config)?;
            run_simulation(config, steps, seed, quiet)
        }

        Commands::Benchmark { steps, population } => {
            init_logging("info");
            run_benchmark(steps, population)
        }

        Commands::Init { output } => {
            init_logging("info");
            generate_config(output)
        }
    }
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Load configuration from file, or the defaults when the file is absent.
/// Logging is initialised with the configured level.
fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        let config = Config::from_file(path)?;
        init_logging(&config.logging.log_level);
        log::info!("Loaded config from: {:?}", path);
        Ok(config)
    } else {
        let config = Config::default();
        init_logging(&config.logging.log_level);
        log::info!("Config {:?} not found, using default configuration", path);
        Ok(config)
    }
}

fn run_simulation(
    config: Config,
    steps: u64,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut world = if let Some(s) = seed {
        println!("Using seed: {}", s);
        World::new_with_seed(config.clone(), s)?
    } else {
        World::new(config.clone())?
    };

    println!("Starting simulation (seed {})", world.seed());
    println!("  Initial population: {}", world.population());
    println!("  Grid size: {}x{}", config.world.width, config.world.height);
    println!("  Steps: {}", steps);
    println!();

    let start = Instant::now();
    let stats_interval = config.logging.stats_interval;

    for _ in 0..steps {
        world.step();

        if !quiet && world.time % stats_interval == 0 {
            println!("{}", world.stats.summary());
        }

        if world.is_extinct() {
            println!("\nPopulation extinct at step {}", world.time);
            break;
        }
    }

    let elapsed = start.elapsed();
    let steps_per_sec = world.time as f64 / elapsed.as_secs_f64().max(f64::EPSILON);

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Steps: {}", world.time);
    println!("Speed: {:.1} steps/s", steps_per_sec);
    println!("Final population: {}", world.population());
    println!("Snakes ever born: {}", world.last_snake_id());

    Ok(())
}

fn run_benchmark(steps: u64, population: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Serpentarium Benchmark ===");
    println!("Steps: {}", steps);
    println!("Population: {}", population);
    println!();

    let result = benchmark(steps, population)?;
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
