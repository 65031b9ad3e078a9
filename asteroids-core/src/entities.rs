//! Entity records and their factories. Entities are plain data; the session
//! owns every collection and is the only writer.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ASTEROID_EXTRA_VERTS, ASTEROID_MAX_ROT_SPEED, ASTEROID_MIN_VERTS, ASTEROID_RADIUS_LARGE,
    ASTEROID_RADIUS_MEDIUM, ASTEROID_RADIUS_SMALL, ASTEROID_SPEED_BASE, ASTEROID_SPEED_JITTER,
    ASTEROID_SPEED_SIZE_STEP, ITEM_DAMPING, ITEM_LIFETIME, ITEM_MAX_DRIFT, ITEM_MIN_DRIFT,
    ITEM_RADIUS, PARTICLES_LARGE, PARTICLES_MEDIUM, PARTICLES_SMALL, PARTICLE_LIFETIME,
    PARTICLE_MIN_SPEED, PARTICLE_SPEED_JITTER, REFERENCE_FPS, SCORE_LARGE_ASTEROID,
    SCORE_LARGE_UFO, SCORE_MEDIUM_ASTEROID, SCORE_SMALL_ASTEROID, SCORE_SMALL_UFO, SHIP_RADIUS,
    SPLASH_RING_LIFE, SPLASH_RING_START_RADIUS, UFO_ENTRY_DRIFT, UFO_RADIUS_FACTOR,
    UFO_SIZE_LARGE, UFO_SIZE_SMALL, UFO_SPEED_LARGE, UFO_SPEED_SMALL, UFO_ZIGZAG_INTERVAL,
};
use crate::difficulty::ufo_fire_interval;
use crate::geometry::PlayField;
use crate::powerups::{ItemKind, Mark};
use crate::rng::SeededRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    /// Size of the two fragments left behind, `None` ends the chain.
    pub fn child_size(self) -> Option<AsteroidSize> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            Self::Large => ASTEROID_RADIUS_LARGE,
            Self::Medium => ASTEROID_RADIUS_MEDIUM,
            Self::Small => ASTEROID_RADIUS_SMALL,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Self::Large => SCORE_LARGE_ASTEROID,
            Self::Medium => SCORE_MEDIUM_ASTEROID,
            Self::Small => SCORE_SMALL_ASTEROID,
        }
    }

    pub fn explosion_particles(self) -> u32 {
        match self {
            Self::Large => PARTICLES_LARGE,
            Self::Medium => PARTICLES_MEDIUM,
            Self::Small => PARTICLES_SMALL,
        }
    }

    fn speed_bonus(self) -> f32 {
        let steps = match self {
            Self::Large => 3.0,
            Self::Medium => 2.0,
            Self::Small => 1.0,
        };
        steps * ASTEROID_SPEED_SIZE_STEP
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub angle: f32,
    pub radius: f32,
    pub alive: bool,
}

impl Ship {
    /// A fresh ship at the field center, facing up.
    pub fn spawn(field: &PlayField) -> Self {
        let (x, y) = field.center();
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            angle: -core::f32::consts::FRAC_PI_2,
            radius: SHIP_RADIUS,
            alive: true,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub life: f32,
    #[serde(skip)]
    pub(crate) alive: bool,
}

impl Bullet {
    pub fn new(x: f32, y: f32, angle: f32, speed: f32, radius: f32, life: f32) -> Self {
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            radius,
            life,
            alive: true,
        }
    }

    /// Moves the bullet and burns its life. Returns `false` once expired.
    pub fn advance(&mut self, dt: f32, field: &PlayField) -> bool {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.life -= dt;
        field.wrap(&mut self.x, &mut self.y);
        self.life > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct Asteroid {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub size: AsteroidSize,
    /// Outline in local space, used only for drawing.
    pub verts: Vec<Vertex>,
    pub rot_angle: f32,
    pub rot_speed: f32,
    #[serde(skip)]
    pub(crate) alive: bool,
}

impl Asteroid {
    pub fn new(rng: &mut SeededRng, x: f32, y: f32, size: AsteroidSize, speed_mult: f32) -> Self {
        let base_speed =
            ASTEROID_SPEED_BASE + rng.next_f32() * ASTEROID_SPEED_JITTER + size.speed_bonus();
        let speed = base_speed * speed_mult;
        let heading = rng.angle();
        let radius = size.radius();

        let vert_count = ASTEROID_MIN_VERTS + rng.next_int(ASTEROID_EXTRA_VERTS);
        let verts = (0..vert_count)
            .map(|i| {
                let a = (i as f32 / vert_count as f32) * core::f32::consts::TAU;
                let r = radius * rng.range_f32(0.7, 1.0);
                Vertex {
                    x: a.cos() * r,
                    y: a.sin() * r,
                }
            })
            .collect();

        Self {
            x,
            y,
            vx: heading.cos() * speed,
            vy: heading.sin() * speed,
            radius,
            size,
            verts,
            rot_angle: 0.0,
            rot_speed: rng.range_f32(-ASTEROID_MAX_ROT_SPEED, ASTEROID_MAX_ROT_SPEED),
            alive: true,
        }
    }

    /// Fragments produced when this asteroid is destroyed: two of the next
    /// size down at the same position, none for a small asteroid.
    pub fn split(&self, rng: &mut SeededRng, speed_mult: f32) -> Vec<Asteroid> {
        match self.size.child_size() {
            Some(child) => (0..2)
                .map(|_| Asteroid::new(rng, self.x, self.y, child, speed_mult))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn integrate(&mut self, dt: f32, field: &PlayField) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.rot_angle += self.rot_speed * dt;
        field.wrap(&mut self.x, &mut self.y);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UfoKind {
    Large,
    Small,
}

impl UfoKind {
    pub fn size(self) -> f32 {
        match self {
            Self::Large => UFO_SIZE_LARGE,
            Self::Small => UFO_SIZE_SMALL,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            Self::Large => UFO_SPEED_LARGE,
            Self::Small => UFO_SPEED_SMALL,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Self::Large => SCORE_LARGE_UFO,
            Self::Small => SCORE_SMALL_UFO,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Ufo {
    pub kind: UfoKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub radius: f32,
    pub fire_interval: f32,
    pub fire_timer: f32,
    pub zigzag_timer: f32,
    /// +1 when entering from the left edge, -1 from the right.
    pub direction: f32,
}

impl Ufo {
    pub fn new(rng: &mut SeededRng, field: &PlayField, kind: UfoKind, wave: u32) -> Self {
        let from_left = rng.chance(0.5);
        let size = kind.size();
        let direction = if from_left { 1.0 } else { -1.0 };
        let fire_interval = ufo_fire_interval(kind, wave);
        let y = rng.next_f32() * field.height * 0.6 + field.height * 0.2;
        let vy = (rng.next_f32() - 0.5) * UFO_ENTRY_DRIFT;

        Self {
            kind,
            x: if from_left { -size } else { field.width + size },
            y,
            vx: direction * kind.speed(),
            vy,
            size,
            radius: size * UFO_RADIUS_FACTOR,
            fire_interval,
            fire_timer: fire_interval * 0.5,
            zigzag_timer: UFO_ZIGZAG_INTERVAL,
            direction,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    pub fn burst(
        rng: &mut SeededRng,
        x: f32,
        y: f32,
        count: u32,
    ) -> impl Iterator<Item = Particle> + '_ {
        (0..count).map(move |_| {
            let heading = rng.angle();
            let speed = PARTICLE_MIN_SPEED + rng.next_f32() * PARTICLE_SPEED_JITTER;
            Particle {
                x,
                y,
                vx: heading.cos() * speed,
                vy: heading.sin() * speed,
                life: PARTICLE_LIFETIME * rng.range_f32(0.5, 1.0),
                max_life: PARTICLE_LIFETIME,
            }
        })
    }

    pub fn advance(&mut self, dt: f32) -> bool {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.life -= dt;
        self.life > 0.0
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SplashRing {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub max_radius: f32,
    pub life: f32,
    pub max_life: f32,
}

impl SplashRing {
    pub fn new(x: f32, y: f32, max_radius: f32) -> Self {
        Self {
            x,
            y,
            radius: SPLASH_RING_START_RADIUS,
            max_radius,
            life: SPLASH_RING_LIFE,
            max_life: SPLASH_RING_LIFE,
        }
    }

    /// Returns `false` once the ring has faded out.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.life -= dt;
        self.radius = self.max_radius * (1.0 - self.life / self.max_life);
        self.life > 0.0
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Item {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub kind: ItemKind,
    pub mark: Mark,
    pub life: f32,
    #[serde(skip)]
    pub(crate) alive: bool,
}

impl Item {
    pub fn new(rng: &mut SeededRng, x: f32, y: f32, kind: ItemKind, mark: Mark) -> Self {
        let heading = rng.angle();
        let speed = rng.range_f32(ITEM_MIN_DRIFT, ITEM_MAX_DRIFT);
        Self {
            x,
            y,
            vx: heading.cos() * speed,
            vy: heading.sin() * speed,
            radius: ITEM_RADIUS,
            kind,
            mark,
            life: ITEM_LIFETIME,
            alive: true,
        }
    }

    /// Drifts with frame-rate independent damping. Returns `false` once the
    /// pickup has timed out.
    pub fn advance(&mut self, dt: f32, field: &PlayField) -> bool {
        let damping = ITEM_DAMPING.powf(dt * REFERENCE_FPS);
        self.vx *= damping;
        self.vy *= damping;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.life -= dt;
        field.wrap(&mut self.x, &mut self.y);
        self.life > 0.0
    }
}
