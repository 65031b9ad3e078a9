//! Flying-saucer behaviour: zigzag flight across the field, off-screen exit
//! and aimed fire.

use crate::constants::{
    UFO_BULLET_LIFE_FACTOR, UFO_BULLET_RADIUS, UFO_BULLET_SPEED, UFO_EXIT_MARGIN,
    UFO_ZIGZAG_INTERVAL, UFO_ZIGZAG_SPEED,
};
use crate::difficulty::ufo_aim_spread;
use crate::entities::{Bullet, Ufo, UfoKind};
use crate::geometry::PlayField;
use crate::rng::SeededRng;

impl Ufo {
    /// Integrates one step. Returns `false` once the saucer has crossed fully
    /// past the edge opposite its entry side.
    pub fn advance(&mut self, rng: &mut SeededRng, dt: f32, field: &PlayField) -> bool {
        self.x += self.vx * dt;
        self.y += self.vy * dt;

        self.zigzag_timer -= dt;
        if self.zigzag_timer <= 0.0 {
            self.vy = rng.range_f32(-0.5, 0.5) * UFO_ZIGZAG_SPEED;
            self.zigzag_timer = UFO_ZIGZAG_INTERVAL * rng.range_f32(0.7, 1.3);
        }
        field.wrap_vertical(&mut self.y);

        !self.has_exited(field)
    }

    fn has_exited(&self, field: &PlayField) -> bool {
        if self.direction > 0.0 {
            self.x > field.width + self.size + UFO_EXIT_MARGIN
        } else {
            self.x < -self.size - UFO_EXIT_MARGIN
        }
    }

    /// Counts down the fire timer; returns `true` on the step a shot is due.
    /// The timer re-arms whether or not the shot is actually taken.
    pub fn fire_due(&mut self, dt: f32) -> bool {
        self.fire_timer -= dt;
        if self.fire_timer <= 0.0 {
            self.fire_timer = self.fire_interval;
            true
        } else {
            false
        }
    }

    /// Large saucers spray at random; small ones lead toward `target` with a
    /// wave-dependent error.
    pub fn aim(&self, rng: &mut SeededRng, wave: u32, target: (f32, f32)) -> f32 {
        match self.kind {
            UfoKind::Large => rng.angle(),
            UfoKind::Small => {
                let (tx, ty) = target;
                let direct = (ty - self.y).atan2(tx - self.x);
                direct + rng.range_f32(-0.5, 0.5) * ufo_aim_spread(wave)
            }
        }
    }

    pub fn fire(
        &self,
        rng: &mut SeededRng,
        wave: u32,
        target: (f32, f32),
        bullet_lifetime: f32,
    ) -> Bullet {
        let angle = self.aim(rng, wave, target);
        Bullet::new(
            self.x,
            self.y,
            angle,
            UFO_BULLET_SPEED,
            UFO_BULLET_RADIUS,
            bullet_lifetime * UFO_BULLET_LIFE_FACTOR,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_ufo(rng: &mut SeededRng, field: &PlayField) -> Ufo {
        Ufo::new(rng, field, UfoKind::Small, 1)
    }

    #[test]
    fn exits_past_far_edge_only() {
        let field = PlayField::default();
        let mut rng = SeededRng::new(21);
        let mut ufo = small_ufo(&mut rng, &field);
        ufo.direction = 1.0;
        ufo.vx = 150.0;
        ufo.x = field.width + ufo.size + UFO_EXIT_MARGIN - 1.0;
        assert!(ufo.advance(&mut rng, 0.001, &field));
        ufo.x = field.width + ufo.size + UFO_EXIT_MARGIN + 0.5;
        assert!(!ufo.advance(&mut rng, 0.001, &field));

        // Entering from the left never counts as leaving.
        ufo.x = -ufo.size;
        assert!(ufo.advance(&mut rng, 0.001, &field));
    }

    #[test]
    fn zigzag_repicks_vertical_speed() {
        let field = PlayField::default();
        let mut rng = SeededRng::new(4);
        let mut ufo = small_ufo(&mut rng, &field);
        let vx = ufo.vx;
        ufo.zigzag_timer = 0.01;
        ufo.advance(&mut rng, 0.02, &field);
        assert!(ufo.vy.abs() <= UFO_ZIGZAG_SPEED / 2.0);
        assert!(ufo.zigzag_timer >= UFO_ZIGZAG_INTERVAL * 0.7);
        assert!(ufo.zigzag_timer <= UFO_ZIGZAG_INTERVAL * 1.3);
        assert_eq!(ufo.vx, vx);
    }

    #[test]
    fn fire_timer_rearms() {
        let field = PlayField::default();
        let mut rng = SeededRng::new(4);
        let mut ufo = small_ufo(&mut rng, &field);
        ufo.fire_timer = 0.1;
        assert!(!ufo.fire_due(0.05));
        assert!(ufo.fire_due(0.06));
        assert_eq!(ufo.fire_timer, ufo.fire_interval);
    }

    #[test]
    fn small_saucer_aims_within_spread() {
        let field = PlayField::default();
        let mut rng = SeededRng::new(9);
        let mut ufo = small_ufo(&mut rng, &field);
        ufo.x = 100.0;
        ufo.y = 100.0;
        let spread = ufo_aim_spread(5);
        for _ in 0..100 {
            let angle = ufo.aim(&mut rng, 5, (200.0, 100.0));
            assert!(angle.abs() <= spread / 2.0 + 1e-5);
        }
    }

    #[test]
    fn bullet_outlives_player_shot() {
        let field = PlayField::default();
        let mut rng = SeededRng::new(9);
        let ufo = Ufo::new(&mut rng, &field, UfoKind::Large, 1);
        let bullet = ufo.fire(&mut rng, 1, (0.0, 0.0), 0.9);
        assert!((bullet.life - 1.08).abs() < 1e-5);
        assert!((bullet.vx.hypot(bullet.vy) - UFO_BULLET_SPEED).abs() < 1e-2);
        assert_eq!((bullet.x, bullet.y), (ufo.x, ufo.y));
    }
}
