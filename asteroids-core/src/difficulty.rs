//! Wave-derived difficulty curve. Everything here is a pure function of the
//! wave number so the session can re-derive it at any time.

use crate::constants::{
    INITIAL_ASTEROIDS, SPEED_MULTIPLIER_CAP, SPEED_MULTIPLIER_STEP, UFO_AIM_SPREAD_BASE,
    UFO_AIM_SPREAD_MIN, UFO_AIM_SPREAD_STEP, UFO_FIRE_INTERVAL_LARGE, UFO_FIRE_INTERVAL_MIN,
    UFO_FIRE_INTERVAL_SMALL, UFO_FIRE_INTERVAL_STEP, UFO_SMALL_PROB_CAP, UFO_SMALL_PROB_STEP,
    UFO_SPAWN_INTERVAL_BASE, UFO_SPAWN_INTERVAL_MIN, UFO_SPAWN_INTERVAL_STEP,
};
use crate::entities::UfoKind;
use crate::rng::SeededRng;

#[inline]
fn waves_elapsed(wave: u32) -> f32 {
    wave.saturating_sub(1) as f32
}

/// Multiplier applied to the speed of newly created asteroids.
pub fn speed_multiplier(wave: u32) -> f32 {
    (1.0 + waves_elapsed(wave) * SPEED_MULTIPLIER_STEP).min(SPEED_MULTIPLIER_CAP)
}

pub fn ufo_spawn_interval(wave: u32) -> f32 {
    (UFO_SPAWN_INTERVAL_BASE - waves_elapsed(wave) * UFO_SPAWN_INTERVAL_STEP)
        .max(UFO_SPAWN_INTERVAL_MIN)
}

/// Spawn timer armed after a UFO leaves play: 60–100 % of the wave interval.
pub fn rearmed_ufo_spawn_timer(rng: &mut SeededRng, wave: u32) -> f32 {
    ufo_spawn_interval(wave) * rng.range_f32(0.6, 1.0)
}

pub fn asteroid_count(wave: u32) -> u32 {
    INITIAL_ASTEROIDS + wave.saturating_sub(1)
}

pub fn ufo_small_probability(wave: u32) -> f32 {
    (waves_elapsed(wave) * UFO_SMALL_PROB_STEP).min(UFO_SMALL_PROB_CAP)
}

pub fn pick_ufo_kind(rng: &mut SeededRng, wave: u32) -> UfoKind {
    if rng.chance(ufo_small_probability(wave)) {
        UfoKind::Small
    } else {
        UfoKind::Large
    }
}

/// Total width (radians) of the random offset a small UFO adds to its aim.
pub fn ufo_aim_spread(wave: u32) -> f32 {
    (UFO_AIM_SPREAD_BASE - wave as f32 * UFO_AIM_SPREAD_STEP).max(UFO_AIM_SPREAD_MIN)
}

pub fn ufo_fire_interval(kind: UfoKind, wave: u32) -> f32 {
    let base = match kind {
        UfoKind::Large => UFO_FIRE_INTERVAL_LARGE,
        UfoKind::Small => UFO_FIRE_INTERVAL_SMALL,
    };
    (base - waves_elapsed(wave) * UFO_FIRE_INTERVAL_STEP).max(UFO_FIRE_INTERVAL_MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn speed_multiplier_clamps_after_wave_thirteen() {
        assert!((speed_multiplier(1) - 1.0).abs() < EPS);
        assert!((speed_multiplier(13) - 1.96).abs() < EPS);
        assert!(speed_multiplier(13) < SPEED_MULTIPLIER_CAP);
        assert_eq!(speed_multiplier(14), 2.0);
        assert_eq!(speed_multiplier(40), 2.0);
    }

    #[test]
    fn speed_multiplier_is_monotonic() {
        let mut previous = speed_multiplier(1);
        for wave in 2..100 {
            let current = speed_multiplier(wave);
            assert!(current >= previous, "wave {wave}: {current} < {previous}");
            previous = current;
        }
    }

    #[test]
    fn ufo_interval_floors_at_eight_seconds() {
        assert_eq!(ufo_spawn_interval(1), 15.0);
        assert!((ufo_spawn_interval(2) - 14.2).abs() < EPS);
        assert_eq!(ufo_spawn_interval(20), 8.0);
    }

    #[test]
    fn rearmed_timer_stays_within_jitter_band() {
        let mut rng = SeededRng::new(99);
        for _ in 0..500 {
            let timer = rearmed_ufo_spawn_timer(&mut rng, 1);
            assert!((9.0..15.0).contains(&timer), "{timer}");
        }
    }

    #[test]
    fn asteroid_count_grows_by_one_per_wave() {
        assert_eq!(asteroid_count(1), 4);
        assert_eq!(asteroid_count(5), 8);
    }

    #[test]
    fn first_wave_only_spawns_large_ufos() {
        let mut rng = SeededRng::new(3);
        assert_eq!(ufo_small_probability(1), 0.0);
        for _ in 0..200 {
            assert_eq!(pick_ufo_kind(&mut rng, 1), UfoKind::Large);
        }
        assert!((ufo_small_probability(30) - 0.85).abs() < EPS);
    }

    #[test]
    fn aim_spread_narrows_to_floor() {
        assert!((ufo_aim_spread(1) - 0.28).abs() < EPS);
        assert_eq!(ufo_aim_spread(20), 0.05);
    }

    #[test]
    fn fire_interval_floor() {
        assert_eq!(ufo_fire_interval(UfoKind::Large, 1), 2.0);
        assert_eq!(ufo_fire_interval(UfoKind::Small, 100), 0.5);
    }
}
