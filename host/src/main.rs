use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use host::benchmark::{run_benchmark, BenchmarkConfig};
use host::runner::{run_session, RunOptions};
use host::util::{parse_seed, parse_seed_csv, seed_range, ship_index};
use leaderboard::{LeaderboardConfig, LeaderboardSync};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "asteroids-host")]
#[command(about = "Headless asteroids driver: scripted play, seed benchmarks and the leaderboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one scripted session and print its metrics as JSON
    Play {
        #[arg(long, default_value = "0xdeadbeef")]
        seed: String,
        #[arg(long, default_value_t = 7_200)]
        frames: u64,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Ship number as shown on the select screen (1-3)
        #[arg(long, default_value_t = 1)]
        ship: usize,
        /// Name typed when a score qualifies
        #[arg(long, default_value = "PILOT")]
        name: String,
        /// Fail on the first invariant violation
        #[arg(long)]
        strict: bool,
        /// Ignore LEADERBOARD_* settings and use only the local file
        #[arg(long)]
        offline: bool,
        /// Write the final world snapshot to this path
        #[arg(long)]
        dump_snapshot: Option<PathBuf>,
    },
    /// Run many seeds in parallel and report aggregate results
    Bench {
        /// Comma-separated seeds; overrides --seed-start/--seed-count
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long, default_value = "0x00000001")]
        seed_start: String,
        #[arg(long, default_value_t = 16)]
        seed_count: u32,
        #[arg(long, default_value_t = 18_000)]
        frames: u64,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        #[arg(long, default_value_t = 1)]
        ship: usize,
        #[arg(long)]
        jobs: Option<usize>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch and print the highscore table
    Scores {
        #[arg(long, default_value_t = 5_000)]
        wait_ms: u64,
        #[arg(long)]
        offline: bool,
    },
}

fn leaderboard_config(offline: bool) -> LeaderboardConfig {
    let config = LeaderboardConfig::from_env();
    if offline {
        LeaderboardConfig::offline(config.highscore_file)
    } else {
        config
    }
}

fn write_json(path: &Path, value: &impl serde::Serialize) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed writing {}", path.display()))
}

#[allow(clippy::too_many_arguments)]
fn play(
    seed: &str,
    frames: u64,
    fps: f64,
    ship: usize,
    name: String,
    strict: bool,
    offline: bool,
    dump_snapshot: Option<PathBuf>,
) -> Result<()> {
    let options = RunOptions {
        seed: parse_seed(seed)?,
        frames,
        fps,
        ship: ship_index(ship)?,
        name,
        strict,
    };
    let sync = LeaderboardSync::spawn(&leaderboard_config(offline))
        .context("failed to start leaderboard worker")?;
    let outcome = run_session(&options, Some(&sync))?;

    if let Some(path) = dump_snapshot {
        write_json(&path, &outcome.session.snapshot())?;
    }
    println!("{}", serde_json::to_string_pretty(&outcome.metrics)?);
    Ok(())
}

fn scores(wait_ms: u64, offline: bool) -> Result<()> {
    let sync = LeaderboardSync::spawn(&leaderboard_config(offline))
        .context("failed to start leaderboard worker")?;
    sync.request_fetch(true)?;

    let (highscores, offline) = match sync.wait(Duration::from_millis(wait_ms)) {
        Some(update) => (update.highscores, update.offline),
        None => {
            warn!(wait_ms, "leaderboard did not answer in time, showing local file");
            (sync.local_store().load(), true)
        }
    };

    println!(
        "{}",
        if offline {
            "HIGH SCORES (OFFLINE)"
        } else {
            "GLOBAL HIGH SCORES"
        }
    );
    if highscores.is_empty() {
        println!("  NO SCORES YET");
    }
    for (rank, entry) in highscores.entries().iter().enumerate() {
        println!(
            "{:>2}. {:<5} {:>8}  W{:<3} {}",
            rank + 1,
            entry.name,
            entry.score,
            entry.wave,
            entry.ship
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Play {
            seed,
            frames,
            fps,
            ship,
            name,
            strict,
            offline,
            dump_snapshot,
        } => play(&seed, frames, fps, ship, name, strict, offline, dump_snapshot),
        Commands::Bench {
            seeds,
            seed_start,
            seed_count,
            frames,
            fps,
            ship,
            jobs,
            output,
        } => {
            let seeds = match seeds {
                Some(csv) => parse_seed_csv(&csv)?,
                None => seed_range(parse_seed(&seed_start)?, seed_count),
            };
            let report = run_benchmark(&BenchmarkConfig {
                seeds,
                frames,
                fps,
                ship: ship_index(ship)?,
                jobs,
            })?;
            match output {
                Some(path) => write_json(&path, &report)?,
                None => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            Ok(())
        }
        Commands::Scores { wait_ms, offline } => scores(wait_ms, offline),
    }
}
