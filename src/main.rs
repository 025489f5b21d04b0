//! Dynasty fantasy football scraper CLI.

use std::path::Path;

use clap::{Parser, Subcommand};
use ffl_scraper::{compare_lineups, files, Config, FflError, Lineup, Pipeline, Result};
use itertools::Itertools;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ffl")]
#[command(about = "Scrape NFL fantasy scores and value dynasty league players", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "ffl.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Scrape weekly points and write the valued player table
    Run {
        /// Override the configured season
        #[arg(long)]
        season: Option<u16>,
        /// Override the last week to aggregate
        #[arg(long)]
        last_week: Option<u8>,
    },
    /// Scrape season stat categories and write scored stat lines
    Stats {
        /// Override the configured season
        #[arg(long)]
        season: Option<u16>,
    },
    /// Simulate two lineups against each other using the player table
    Compare {
        /// Current starters, comma separated in slot order
        /// (QB,RB1,RB2,WR1,WR2,WR3,TE,FLEX,K,DST)
        #[arg(long, value_delimiter = ',')]
        original: Vec<String>,
        /// Alternative starters, same order
        #[arg(long, value_delimiter = ',')]
        alternative: Vec<String>,
        /// Override the number of simulated weeks
        #[arg(long)]
        iterations: Option<usize>,
        /// Seed for a reproducible simulation
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Init { force } = cli.command {
        return init(&cli.config, force);
    }

    let mut config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Run { season, last_week } => {
            if let Some(season) = season {
                config.scrape.season = season;
            }
            if let Some(last_week) = last_week {
                config.scrape.last_week = last_week;
            }
            run_players(config).await
        }
        Commands::Stats { season } => {
            if let Some(season) = season {
                config.scrape.season = season;
            }
            run_stats(config).await
        }
        Commands::Compare {
            original,
            alternative,
            iterations,
            seed,
        } => compare(&config, original, alternative, iterations, seed),
    }
}

fn init(path: &str, force: bool) -> Result<()> {
    if Path::new(path).exists() && !force {
        return Err(FflError::Config(format!(
            "{path} already exists, use --force to overwrite"
        )));
    }
    Config::default().save(path)?;
    println!("Wrote default config to {path}");
    Ok(())
}

async fn run_players(config: Config) -> Result<()> {
    let output = config.data.output_path.clone();
    let players = Pipeline::new(config)?.run().await?;

    println!("Wrote {} players to {output}", players.len());
    let top = players
        .iter()
        .filter(|p| p.free_agent)
        .sorted_by(|a, b| b.points_above_replacement.total_cmp(&a.points_above_replacement))
        .take(10)
        .collect_vec();
    if !top.is_empty() {
        println!("\nBest free agents by points above replacement:");
        for player in top {
            println!(
                "  {:<28} {:<4} {:>8.1}",
                player.name, player.position, player.points_above_replacement
            );
        }
    }
    Ok(())
}

async fn run_stats(config: Config) -> Result<()> {
    let output = config.stats.output_path.clone();
    let lines = Pipeline::new(config)?.run_stats().await?;
    println!("Wrote {} stat lines to {output}", lines.len());
    Ok(())
}

fn compare(
    config: &Config,
    original: Vec<String>,
    alternative: Vec<String>,
    iterations: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let players = files::read_players(&config.data.output_path)?;
    let original = Lineup::from_names(original)?;
    let alternative = Lineup::from_names(alternative)?;

    let result = compare_lineups(
        &players,
        &original,
        &alternative,
        iterations.unwrap_or(config.simulation.iterations),
        seed.or(config.simulation.seed),
    )?;

    println!(
        "Original:    median {:>6.1}  mean {:>6.1}",
        result.original.median, result.original.mean
    );
    println!(
        "Alternative: median {:>6.1}  mean {:>6.1}",
        result.alternative.median, result.alternative.mean
    );
    println!(
        "Alternative outscores original in {:.1}% of simulated weeks",
        result.alternative_win_rate * 100.0
    );
    Ok(())
}
