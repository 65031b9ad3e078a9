use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use asteroids_core::SHIP_TYPES;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::runner::{run_session, RunMetrics, RunOptions};
use crate::util::seed_to_hex;

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub seeds: Vec<u32>,
    pub frames: u64,
    pub fps: f64,
    pub ship: usize,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub frames: u64,
    pub fps: f64,
    pub ship: String,
    pub jobs: Option<usize>,
    pub run_count: usize,
    pub avg_best_score: f64,
    pub max_best_score: u32,
    pub avg_max_wave: f64,
    pub runs_finished: u32,
    pub invariant_failures: usize,
    pub runs: Vec<RunMetrics>,
}

/// Plays every seed headless, in parallel, and aggregates the results.
/// Benchmarks never touch the leaderboard.
pub fn run_benchmark(config: &BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }
    let ship = SHIP_TYPES
        .get(config.ship)
        .ok_or_else(|| anyhow!("unknown ship index {}", config.ship))?;

    let run_one = |seed: &u32| -> Result<RunMetrics> {
        let options = RunOptions {
            seed: *seed,
            frames: config.frames,
            fps: config.fps,
            ship: config.ship,
            name: "BENCH".to_string(),
            strict: false,
        };
        run_session(&options, None)
            .map(|outcome| outcome.metrics)
            .with_context(|| format!("benchmark run failed for seed={}", seed_to_hex(*seed)))
    };

    let results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| config.seeds.par_iter().map(run_one).collect())
    } else {
        config.seeds.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(results.len());
    for result in results {
        runs.push(result?);
    }

    let count = runs.len() as f64;
    let avg_best_score = runs.iter().map(|run| f64::from(run.best_score)).sum::<f64>() / count;
    let avg_max_wave = runs.iter().map(|run| f64::from(run.max_wave)).sum::<f64>() / count;
    let max_best_score = runs.iter().map(|run| run.best_score).max().unwrap_or(0);
    let runs_finished: u32 = runs.iter().map(|run| run.runs_finished).sum();
    let invariant_failures = runs
        .iter()
        .filter(|run| run.invariant_violation.is_some())
        .count();

    info!(
        runs = runs.len(),
        avg_best_score, max_best_score, invariant_failures, "benchmark complete"
    );

    Ok(BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        frames: config.frames,
        fps: config.fps,
        ship: ship.name.to_string(),
        jobs: config.jobs,
        run_count: runs.len(),
        avg_best_score,
        max_best_score,
        avg_max_wave,
        runs_finished,
        invariant_failures,
        runs,
    })
}
