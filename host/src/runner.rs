use anyhow::{anyhow, Context, Result};
use asteroids_core::{FrameClock, GameSession, GameState, PlayField, SHIP_TYPES};
use leaderboard::LeaderboardSync;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audio::TraceSink;
use crate::pilot::ScriptedPilot;
use crate::util::seed_to_hex;

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub seed: u32,
    pub frames: u64,
    pub fps: f64,
    /// Catalogue index of the ship the pilot picks.
    pub ship: usize,
    pub name: String,
    /// Abort on the first invariant violation instead of recording it.
    pub strict: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: 0xDEAD_BEEF,
            frames: 7_200,
            fps: 60.0,
            ship: 0,
            name: "PILOT".to_string(),
            strict: false,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub seed: u32,
    pub seed_hex: String,
    pub ship: String,
    pub frame_count: u64,
    pub final_state: GameState,
    pub final_score: u32,
    pub final_wave: u32,
    pub final_lives: u32,
    pub best_score: u32,
    pub max_wave: u32,
    pub runs_finished: u32,
    pub sound_events: u64,
    pub leaderboard_offline: bool,
    pub invariant_violation: Option<String>,
}

pub struct RunOutcome {
    pub metrics: RunMetrics,
    pub session: GameSession,
}

/// Drives one session with the scripted pilot on a synthetic clock of
/// `options.fps` timestamps per second.
pub fn run_session(
    options: &RunOptions,
    leaderboard: Option<&LeaderboardSync>,
) -> Result<RunOutcome> {
    if !(options.fps.is_finite() && options.fps > 0.0) {
        return Err(anyhow!("fps must be a positive number, got {}", options.fps));
    }
    let ship = SHIP_TYPES
        .get(options.ship)
        .ok_or_else(|| anyhow!("unknown ship index {}", options.ship))?;

    let mut session = GameSession::new(PlayField::default(), options.seed);
    let mut pilot = ScriptedPilot::new(options.ship, &options.name);
    let mut clock = FrameClock::new();
    let mut audio = TraceSink::default();

    let mut best_score = 0;
    let mut max_wave = 0;
    let mut runs_finished = 0;
    let mut violation = None;

    for step in 0..options.frames {
        let dt = clock.tick(step as f64 / options.fps);
        let input = pilot.next_input(&session);
        let before = session.state();
        session.update(dt, &input);
        session.flush_sounds(&mut audio);

        if before == GameState::Playing
            && matches!(session.state(), GameState::EnterName | GameState::GameOver)
        {
            runs_finished += 1;
            info!(
                seed = %seed_to_hex(options.seed),
                score = session.score(),
                wave = session.wave(),
                "scripted run finished"
            );
        }
        best_score = best_score.max(session.score());
        max_wave = max_wave.max(session.wave());

        service_leaderboard(&mut session, leaderboard)?;

        if let Err(rule) = session.validate_invariants() {
            let frame = session.frame_count();
            if options.strict {
                return Err(anyhow!("invariant {rule} violated at frame {frame}"));
            }
            if violation.is_none() {
                warn!(%rule, frame, "invariant violated");
                violation = Some(format!("{rule} at frame {frame}"));
            }
        }
    }

    debug!(sounds = audio.total(), "session drained");
    let metrics = RunMetrics {
        seed: options.seed,
        seed_hex: seed_to_hex(options.seed),
        ship: ship.name.to_string(),
        frame_count: session.frame_count(),
        final_state: session.state(),
        final_score: session.score(),
        final_wave: session.wave(),
        final_lives: session.lives(),
        best_score,
        max_wave,
        runs_finished,
        sound_events: audio.total(),
        leaderboard_offline: session.leaderboard_offline(),
        invariant_violation: violation,
    };
    Ok(RunOutcome { metrics, session })
}

/// Forwards queued requests to the worker and applies any finished refresh.
/// Without a worker the requests are dropped.
fn service_leaderboard(
    session: &mut GameSession,
    leaderboard: Option<&LeaderboardSync>,
) -> Result<()> {
    let requests = session.take_leaderboard_requests();
    let Some(sync) = leaderboard else {
        return Ok(());
    };
    for request in requests {
        sync.handle(request, session.highscores())
            .context("leaderboard worker rejected request")?;
    }
    if let Some(update) = sync.poll() {
        session.apply_leaderboard(update.highscores, update.offline);
    }
    Ok(())
}
