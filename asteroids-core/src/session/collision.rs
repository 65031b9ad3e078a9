use tracing::debug;

use super::{
    GameSession, PRUNE_ASTEROIDS, PRUNE_BULLETS, PRUNE_ITEMS, PRUNE_UFO_BULLETS,
};
use crate::audio::SoundEvent;
use crate::constants::{
    PARTICLES_BULLET_CLASH, PARTICLES_SHIP, PARTICLES_UFO, PARTICLES_UFO_RAM, RESPAWN_DELAY,
};
use crate::difficulty::rearmed_ufo_spawn_timer;
use crate::entities::{AsteroidSize, Item, Particle, SplashRing};
use crate::geometry::{circles_overlap, dist};
use crate::powerups::{roll_mark, splash_radius, ItemKind};

/// Who gets credit for a kill, which decides the side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KillSource {
    Shot,
    Blast,
    Hostile,
}

impl KillSource {
    fn rewards(self) -> bool {
        !matches!(self, Self::Hostile)
    }
}

impl GameSession {
    // Test order decides scoring.
    pub(super) fn handle_collisions(&mut self) {
        // Player bullet vs asteroid.
        for bullet_index in (0..self.bullets.len()).rev() {
            let bullet = &self.bullets[bullet_index];
            if !bullet.alive {
                continue;
            }
            let (bx, by, br) = (bullet.x, bullet.y, bullet.radius);

            for asteroid_index in (0..self.asteroids.len()).rev() {
                let asteroid = &self.asteroids[asteroid_index];
                if asteroid.alive && circles_overlap(bx, by, br, asteroid.x, asteroid.y, asteroid.radius)
                {
                    self.bullets[bullet_index].alive = false;
                    self.prune_mask |= PRUNE_BULLETS;
                    self.destroy_asteroid(asteroid_index, KillSource::Shot, (bx, by));
                    break;
                }
            }
        }

        // Player bullet vs UFO.
        for bullet_index in (0..self.bullets.len()).rev() {
            let Some(ufo) = &self.ufo else {
                break;
            };
            let bullet = &self.bullets[bullet_index];
            if bullet.alive
                && circles_overlap(bullet.x, bullet.y, bullet.radius, ufo.x, ufo.y, ufo.radius)
            {
                let hit = (bullet.x, bullet.y);
                self.bullets[bullet_index].alive = false;
                self.prune_mask |= PRUNE_BULLETS;
                self.destroy_ufo(KillSource::Shot, hit, PARTICLES_UFO);
                break;
            }
        }

        // Player bullet vs UFO bullet.
        for bullet_index in (0..self.bullets.len()).rev() {
            let bullet = &self.bullets[bullet_index];
            if !bullet.alive {
                continue;
            }
            let (bx, by, br) = (bullet.x, bullet.y, bullet.radius);

            for hostile_index in (0..self.ufo_bullets.len()).rev() {
                let hostile = &self.ufo_bullets[hostile_index];
                if hostile.alive && circles_overlap(bx, by, br, hostile.x, hostile.y, hostile.radius)
                {
                    let (hx, hy) = (hostile.x, hostile.y);
                    self.bullets[bullet_index].alive = false;
                    self.ufo_bullets[hostile_index].alive = false;
                    self.prune_mask |= PRUNE_BULLETS | PRUNE_UFO_BULLETS;
                    self.explode(hx, hy, PARTICLES_BULLET_CLASH);
                    break;
                }
            }
        }

        // UFO bullet vs asteroid.
        for hostile_index in (0..self.ufo_bullets.len()).rev() {
            let hostile = &self.ufo_bullets[hostile_index];
            if !hostile.alive {
                continue;
            }
            let (hx, hy, hr) = (hostile.x, hostile.y, hostile.radius);

            for asteroid_index in (0..self.asteroids.len()).rev() {
                let asteroid = &self.asteroids[asteroid_index];
                if asteroid.alive && circles_overlap(hx, hy, hr, asteroid.x, asteroid.y, asteroid.radius)
                {
                    self.ufo_bullets[hostile_index].alive = false;
                    self.prune_mask |= PRUNE_UFO_BULLETS;
                    self.destroy_asteroid(asteroid_index, KillSource::Hostile, (hx, hy));
                    break;
                }
            }
        }

        // Ship vs asteroid. The asteroid survives.
        if self.ship_vulnerable() {
            let (sx, sy, sr) = (self.ship.x, self.ship.y, self.ship.radius);
            let struck = self
                .asteroids
                .iter()
                .rev()
                .any(|asteroid| {
                    asteroid.alive
                        && circles_overlap(sx, sy, sr, asteroid.x, asteroid.y, asteroid.radius)
                });
            if struck {
                self.kill_ship();
            }
        }

        // Ship vs UFO.
        if self.ship_vulnerable() {
            if let Some(ufo) = &self.ufo {
                let ship = &self.ship;
                if circles_overlap(ship.x, ship.y, ship.radius, ufo.x, ufo.y, ufo.radius) {
                    let hit = (ufo.x, ufo.y);
                    self.destroy_ufo(KillSource::Blast, hit, PARTICLES_UFO_RAM);
                    self.kill_ship();
                }
            }
        }

        // UFO bullet vs ship.
        if self.ship_vulnerable() {
            let (sx, sy, sr) = (self.ship.x, self.ship.y, self.ship.radius);
            for hostile_index in (0..self.ufo_bullets.len()).rev() {
                let hostile = &self.ufo_bullets[hostile_index];
                if hostile.alive && circles_overlap(sx, sy, sr, hostile.x, hostile.y, hostile.radius)
                {
                    self.ufo_bullets[hostile_index].alive = false;
                    self.prune_mask |= PRUNE_UFO_BULLETS;
                    self.kill_ship();
                    break;
                }
            }
        }
    }

    fn ship_vulnerable(&self) -> bool {
        self.ship.alive && self.invincible_timer <= 0.0
    }

    pub(super) fn destroy_asteroid(&mut self, index: usize, source: KillSource, hit: (f32, f32)) {
        let Some(asteroid) = self.asteroids.get_mut(index) else {
            return;
        };
        if !asteroid.alive {
            return;
        }
        asteroid.alive = false;
        let (size, x, y) = (asteroid.size, asteroid.x, asteroid.y);
        self.prune_mask |= PRUNE_ASTEROIDS;

        if source.rewards() {
            self.add_score(size.points());
        }
        self.explode(x, y, size.explosion_particles());
        self.sound(match size {
            AsteroidSize::Large => SoundEvent::ExplosionLarge,
            AsteroidSize::Medium => SoundEvent::ExplosionMedium,
            AsteroidSize::Small => SoundEvent::ExplosionSmall,
        });

        let fragments = self.asteroids[index].split(&mut self.rng, self.speed_multiplier);
        self.asteroids.extend(fragments);

        if source == KillSource::Shot {
            self.apply_splash(hit.0, hit.1);
        }
        if source.rewards() && self.drops.roll_asteroid_drop(&mut self.rng) {
            self.spawn_item_drop(x, y);
        }
    }

    pub(super) fn destroy_ufo(&mut self, source: KillSource, hit: (f32, f32), particles: u32) {
        let Some(ufo) = self.ufo.take() else {
            return;
        };
        if source.rewards() {
            self.add_score(ufo.kind.points());
        }
        self.explode(ufo.x, ufo.y, particles);
        self.sound(SoundEvent::UfoExplosion);
        self.retire_ufo();
        debug!(kind = ?ufo.kind, ?source, "ufo destroyed");

        if source == KillSource::Shot {
            self.apply_splash(hit.0, hit.1);
        }
        if source.rewards() && self.drops.roll_ufo_drop(&mut self.rng) {
            self.spawn_item_drop(ufo.x, ufo.y);
        }
    }

    pub(super) fn despawn_ufo(&mut self) {
        if let Some(ufo) = self.ufo.take() {
            self.retire_ufo();
            debug!(kind = ?ufo.kind, "ufo left the field");
        }
    }

    fn retire_ufo(&mut self) {
        self.stop_ufo_hum();
        self.ufo_spawn_timer = rearmed_ufo_spawn_timer(&mut self.rng, self.wave);
    }

    // Only asteroids present when the splash starts are candidates.
    fn apply_splash(&mut self, x: f32, y: f32) {
        let archetype_splash = self.ship_type().has_splash();
        let Some(radius) = splash_radius(archetype_splash, &self.inventory) else {
            return;
        };
        self.splash_rings.push(SplashRing::new(x, y, radius));
        self.sound(SoundEvent::Splash);

        for index in (0..self.asteroids.len()).rev() {
            let asteroid = &self.asteroids[index];
            if asteroid.alive && dist(x, y, asteroid.x, asteroid.y) < radius + asteroid.radius {
                let at = (asteroid.x, asteroid.y);
                self.destroy_asteroid(index, KillSource::Blast, at);
            }
        }

        if let Some(ufo) = &self.ufo {
            if dist(x, y, ufo.x, ufo.y) < radius + ufo.radius {
                let at = (ufo.x, ufo.y);
                self.destroy_ufo(KillSource::Blast, at, PARTICLES_UFO);
            }
        }
    }

    pub(super) fn sweep_lightning(&mut self) {
        let Some(aura) = self.lightning else {
            return;
        };
        if !self.ship.alive {
            return;
        }
        let (sx, sy) = (self.ship.x, self.ship.y);

        for index in (0..self.asteroids.len()).rev() {
            let asteroid = &self.asteroids[index];
            if asteroid.alive && dist(sx, sy, asteroid.x, asteroid.y) < aura.radius + asteroid.radius
            {
                let at = (asteroid.x, asteroid.y);
                self.destroy_asteroid(index, KillSource::Blast, at);
            }
        }

        if let Some(ufo) = &self.ufo {
            if dist(sx, sy, ufo.x, ufo.y) < aura.radius + ufo.radius {
                let at = (ufo.x, ufo.y);
                self.destroy_ufo(KillSource::Blast, at, PARTICLES_UFO);
            }
        }

        for hostile in &mut self.ufo_bullets {
            if hostile.alive && dist(sx, sy, hostile.x, hostile.y) < aura.radius + hostile.radius {
                hostile.alive = false;
                self.prune_mask |= PRUNE_UFO_BULLETS;
            }
        }
    }

    pub(super) fn collect_items(&mut self) {
        if !self.ship.alive {
            return;
        }
        let (sx, sy, sr) = (self.ship.x, self.ship.y, self.ship.radius);

        for index in (0..self.items.len()).rev() {
            let item = &self.items[index];
            if !item.alive || !circles_overlap(sx, sy, sr, item.x, item.y, item.radius) {
                continue;
            }
            let (kind, mark) = (item.kind, item.mark);
            self.items[index].alive = false;
            self.prune_mask |= PRUNE_ITEMS;

            let entry = self.inventory.collect(kind, mark);
            self.refresh_stats();
            self.sound(SoundEvent::ItemCollect);
            debug!(
                ?kind,
                mark = mark.get(),
                count = entry.stack().count,
                held_mark = entry.stack().mark.get(),
                "item collected"
            );
        }
    }

    fn spawn_item_drop(&mut self, x: f32, y: f32) {
        let kind = ItemKind::random(&mut self.rng);
        let mark = roll_mark(&mut self.rng, self.inventory.mark(kind));
        let item = Item::new(&mut self.rng, x, y, kind, mark);
        self.items.push(item);
        self.sound(SoundEvent::ItemDrop);
    }

    pub(super) fn kill_ship(&mut self) {
        self.ship.alive = false;
        self.lives = self.lives.saturating_sub(1);
        self.respawn_timer = RESPAWN_DELAY;
        self.sound(SoundEvent::Death);
        self.explode(self.ship.x, self.ship.y, PARTICLES_SHIP);
        debug!(lives = self.lives, score = self.score, "ship destroyed");
    }

    pub(super) fn explode(&mut self, x: f32, y: f32, count: u32) {
        self.particles
            .extend(Particle::burst(&mut self.rng, x, y, count));
    }

    pub(super) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub(super) fn prune_destroyed_entities(&mut self) {
        if self.prune_mask == 0 {
            return;
        }

        if (self.prune_mask & PRUNE_ASTEROIDS) != 0 {
            self.asteroids.retain(|entry| entry.alive);
        }
        if (self.prune_mask & PRUNE_BULLETS) != 0 {
            self.bullets.retain(|entry| entry.alive);
        }
        if (self.prune_mask & PRUNE_UFO_BULLETS) != 0 {
            self.ufo_bullets.retain(|entry| entry.alive);
        }
        if (self.prune_mask & PRUNE_ITEMS) != 0 {
            self.items.retain(|entry| entry.alive);
        }

        self.prune_mask = 0;
    }
}
