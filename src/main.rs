use anyhow::{Context, Result};
use clap::Parser;
use farmwise::app::{
    read_input, AdviseInput, Advisor, AllocateInput, CostsInput, EfficiencyInput, ProjectInput,
    RecommendInput, RoiInput, RotateInput, SeasonalityInput,
};
use farmwise::cli::{Cli, Commands};
use farmwise::config::Config;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Init = cli.command {
        let (_, path) = Config::setup_interactive().context("Interactive setup failed")?;
        println!("Run `farmwise check --config {}` to verify.", path.display());
        return Ok(());
    }

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let advisor =
        Advisor::load(config, cli.crops.as_deref()).context("Failed to load crop table")?;

    match &cli.command {
        Commands::Recommend { input } => {
            let input: RecommendInput = load(input)?;
            print_json(&advisor.recommend(&input))
        }
        Commands::Rotate { input } => {
            let input: RotateInput = load(input)?;
            print_json(&advisor.rotate(&input))
        }
        Commands::Allocate { input } => {
            let input: AllocateInput = load(input)?;
            print_json(&advisor.allocate(&input))
        }
        Commands::Efficiency { input } => {
            let input: EfficiencyInput = load(input)?;
            print_json(&advisor.efficiency(&input))
        }
        Commands::Project { input } => {
            let input: ProjectInput = load(input)?;
            print_json(&advisor.project(&input))
        }
        Commands::Seasonality { input } => {
            let input: SeasonalityInput = load(input)?;
            print_json(&advisor.seasonality(&input))
        }
        Commands::Advise { input } => {
            let input: AdviseInput = load(input)?;
            print_json(&advisor.advise(&input))
        }
        Commands::Roi { input } => {
            let input: RoiInput = load(input)?;
            print_json(&advisor.roi(&input))
        }
        Commands::Costs { input } => {
            let input: CostsInput = load(input)?;
            print_json(&advisor.costs(&input))
        }
        Commands::Crops => print_json(&advisor.crops.profiles()),
        Commands::Check => {
            let config_path = Config::resolve_path(cli.config.as_ref());
            print_check(&advisor, config_path.as_deref());
            Ok(())
        }
        Commands::Init => Ok(()),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    read_input(path).with_context(|| format!("Failed to read input {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_check(advisor: &Advisor, config_path: Option<&Path>) {
    match config_path {
        Some(path) => println!("Config: OK ({})", path.display()),
        None => println!("Config: OK (built-in defaults)"),
    }

    let crops = &advisor.crops;
    println!("Crop table: {} profiles", crops.len());
    for skipped in crops.skipped() {
        println!(
            "  skipped entry {} ({}): {}",
            skipped.index,
            skipped.name.as_deref().unwrap_or("unnamed"),
            skipped.reason
        );
    }

    println!("Suitability factors:");
    for (id, name) in advisor.list_factors() {
        println!("  {:<12} {}", id, name);
    }

    println!("Advisory rules:");
    for (id, name) in advisor.list_rules() {
        println!("  {:<22} {}", id, name);
    }
}
