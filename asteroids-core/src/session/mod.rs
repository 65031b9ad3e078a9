//! One owned game session: every entity collection, the menu state machine,
//! and the timers that drive a run. The session is the only writer of game
//! state; renderers read it through accessors or [`GameSession::snapshot`].

mod collision;

pub use collision::KillSource;

use serde::Serialize;
use tracing::{debug, info};

use crate::audio::{AudioSink, SoundEvent};
use crate::constants::{
    BULLET_INHERIT_VELOCITY, BULLET_RADIUS, BULLET_SPEED, GRAVITY_BOOM_COOLDOWN, INVINCIBLE_TIME,
    ITEM_LIFETIME, MAX_FRAME_DT, MAX_HIGHSCORES, NAME_LENGTH, PISTOL_MAX_BULLETS, REFERENCE_FPS,
    RESPAWN_DELAY, SELECT_INITIAL_COOLDOWN, SELECT_REPEAT_COOLDOWN, SHIP_FRICTION, SHIP_SIZE,
    STARTING_LIVES, THRUST_SOUND_INTERVAL, TITLE_SCREEN_ASTEROIDS, UFO_RADIUS_FACTOR,
    WAVE_BANNER_DURATION, WAVE_PLACEMENT_ATTEMPTS, WAVE_SAFE_DISTANCE,
};
use crate::difficulty::{asteroid_count, pick_ufo_kind, speed_multiplier, ufo_spawn_interval};
use crate::entities::{Asteroid, AsteroidSize, Bullet, Item, Particle, Ship, SplashRing, Ufo};
use crate::error::RuleCode;
use crate::geometry::{dist, PlayField, WRAP_MARGIN};
use crate::highscore::{HighscoreEntry, HighscoreList};
use crate::input::{Action, InputFrame, KeyLatch};
use crate::powerups::{spread_angles, DropTable, Inventory, LightningAura};
use crate::rng::SeededRng;
use crate::ship_stats::{ship_type, ShipStats, ShipType, SHIP_TYPES};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Start,
    ShipSelect,
    Playing,
    EnterName,
    GameOver,
    Scores,
}

/// Turns animation-frame timestamps into simulation steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick, clamped to [`MAX_FRAME_DT`] so a
    /// stalled host cannot make the simulation jump. The first tick is zero.
    pub fn tick(&mut self, now_secs: f64) -> f32 {
        let dt = match self.last {
            Some(previous) => ((now_secs - previous).max(0.0) as f32).min(MAX_FRAME_DT),
            None => 0.0,
        };
        self.last = Some(now_secs);
        dt
    }
}

/// Work the session wants the leaderboard collaborator to do. Drained with
/// [`GameSession::take_leaderboard_requests`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeaderboardRequest {
    Fetch,
    Submit(HighscoreEntry),
}

#[derive(Clone, Debug, Serialize)]
pub struct WorldSnapshot {
    pub frame_count: u64,
    pub state: GameState,
    pub score: u32,
    pub top_score: u32,
    pub lives: u32,
    pub wave: u32,
    pub selected_ship: usize,
    pub ship_name: &'static str,
    pub rng_state: u32,
    pub speed_multiplier: f32,
    pub ufo_spawn_timer: f32,
    pub invincible_timer: f32,
    pub respawn_timer: f32,
    pub wave_banner_timer: f32,
    pub stats: ShipStats,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub ufo: Option<Ufo>,
    pub ufo_bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub splash_rings: Vec<SplashRing>,
    pub items: Vec<Item>,
    pub inventory: Inventory,
    pub lightning: Option<LightningAura>,
    pub entry_name: String,
    pub name_entry_rank: Option<usize>,
    pub highscores: HighscoreList,
    pub leaderboard_offline: bool,
}

const PRUNE_ASTEROIDS: u8 = 1 << 0;
const PRUNE_BULLETS: u8 = 1 << 1;
const PRUNE_UFO_BULLETS: u8 = 1 << 2;
const PRUNE_ITEMS: u8 = 1 << 3;

#[derive(Clone, Debug)]
pub struct GameSession {
    field: PlayField,
    state: GameState,
    rng: SeededRng,
    latch: KeyLatch,
    frame_count: u64,

    selected_ship: usize,
    select_cooldown: f32,
    stats: ShipStats,

    ship: Ship,
    bullets: Vec<Bullet>,
    asteroids: Vec<Asteroid>,
    ufo: Option<Ufo>,
    ufo_bullets: Vec<Bullet>,
    particles: Vec<Particle>,
    splash_rings: Vec<SplashRing>,
    items: Vec<Item>,
    prune_mask: u8,

    inventory: Inventory,
    drops: DropTable,
    lightning: Option<LightningAura>,

    score: u32,
    lives: u32,
    wave: u32,
    speed_multiplier: f32,
    ufo_spawn_timer: f32,
    invincible_timer: f32,
    respawn_timer: f32,
    shoot_cooldown: f32,
    thrust_sound_timer: f32,
    wave_banner_timer: f32,
    ufo_hum: bool,

    entry_name: String,
    entry_cursor_blink: f32,
    name_entry_rank: Option<usize>,

    highscores: HighscoreList,
    leaderboard_offline: bool,

    sounds: Vec<SoundEvent>,
    leaderboard_requests: Vec<LeaderboardRequest>,
}

impl GameSession {
    pub fn new(field: PlayField, seed: u32) -> Self {
        let default_ship = ship_type(0);
        let mut session = Self {
            field,
            state: GameState::Start,
            rng: SeededRng::new(seed),
            latch: KeyLatch::default(),
            frame_count: 0,
            selected_ship: 0,
            select_cooldown: 0.0,
            stats: ShipStats::derive(default_ship, 0.0),
            ship: Ship::spawn(&field),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            ufo: None,
            ufo_bullets: Vec::new(),
            particles: Vec::new(),
            splash_rings: Vec::new(),
            items: Vec::new(),
            prune_mask: 0,
            inventory: Inventory::new(),
            drops: DropTable::default(),
            lightning: None,
            score: 0,
            lives: 0,
            wave: 0,
            speed_multiplier: 1.0,
            ufo_spawn_timer: 0.0,
            invincible_timer: 0.0,
            respawn_timer: 0.0,
            shoot_cooldown: 0.0,
            thrust_sound_timer: 0.0,
            wave_banner_timer: 0.0,
            ufo_hum: false,
            entry_name: String::new(),
            entry_cursor_blink: 0.0,
            name_entry_rank: None,
            highscores: HighscoreList::new(),
            leaderboard_offline: false,
            sounds: Vec::new(),
            leaderboard_requests: Vec::new(),
        };
        session.init_title_screen();
        session
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn field(&self) -> &PlayField {
        &self.field
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn selected_ship(&self) -> usize {
        self.selected_ship
    }

    pub fn ship_type(&self) -> &'static ShipType {
        ship_type(self.selected_ship)
    }

    pub fn stats(&self) -> &ShipStats {
        &self.stats
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn ufo(&self) -> Option<&Ufo> {
        self.ufo.as_ref()
    }

    pub fn ufo_bullets(&self) -> &[Bullet] {
        &self.ufo_bullets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn splash_rings(&self) -> &[SplashRing] {
        &self.splash_rings
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn lightning(&self) -> Option<&LightningAura> {
        self.lightning.as_ref()
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn ufo_spawn_timer(&self) -> f32 {
        self.ufo_spawn_timer
    }

    pub fn invincible_timer(&self) -> f32 {
        self.invincible_timer
    }

    pub fn wave_banner_timer(&self) -> f32 {
        self.wave_banner_timer
    }

    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    pub fn entry_cursor_blink(&self) -> f32 {
        self.entry_cursor_blink
    }

    pub fn name_entry_rank(&self) -> Option<usize> {
        self.name_entry_rank
    }

    pub fn highscores(&self) -> &HighscoreList {
        &self.highscores
    }

    pub fn leaderboard_offline(&self) -> bool {
        self.leaderboard_offline
    }

    /// One-way write-back of a leaderboard snapshot fetched off-thread.
    pub fn apply_leaderboard(&mut self, highscores: HighscoreList, offline: bool) {
        self.highscores = highscores;
        self.leaderboard_offline = offline;
        if self.state == GameState::EnterName {
            self.name_entry_rank = self.highscores.rank_of(self.score);
        }
    }

    pub fn take_leaderboard_requests(&mut self) -> Vec<LeaderboardRequest> {
        std::mem::take(&mut self.leaderboard_requests)
    }

    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    pub fn flush_sounds(&mut self, sink: &mut impl AudioSink) {
        for event in self.sounds.drain(..) {
            sink.play(event);
        }
    }

    /// Advances the session by one frame. `dt` is clamped to
    /// [`MAX_FRAME_DT`]; the step itself never fails.
    pub fn update(&mut self, dt: f32, input: &InputFrame) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.frame_count += 1;
        self.latch.refresh(input);

        match self.state {
            GameState::Start | GameState::Scores => self.update_title(dt, input),
            GameState::ShipSelect => self.update_ship_select(dt, input),
            GameState::EnterName => {
                self.entry_cursor_blink += dt;
                self.handle_name_entry(input);
            }
            GameState::GameOver => {
                if self.latch.take_any(input, &[Action::Fire, Action::Confirm]) {
                    self.init_title_screen();
                }
            }
            GameState::Playing => self.update_playing(dt, input),
        }
    }

    fn sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    fn start_ufo_hum(&mut self) {
        if !self.ufo_hum {
            self.ufo_hum = true;
            self.sound(SoundEvent::UfoHumStart);
        }
    }

    fn stop_ufo_hum(&mut self) {
        if self.ufo_hum {
            self.ufo_hum = false;
            self.sound(SoundEvent::UfoHumStop);
        }
    }

    fn clear_world(&mut self) {
        self.ship = Ship::spawn(&self.field);
        self.bullets.clear();
        self.asteroids.clear();
        self.ufo = None;
        self.ufo_bullets.clear();
        self.particles.clear();
        self.splash_rings.clear();
        self.items.clear();
        self.lightning = None;
        self.prune_mask = 0;
        self.speed_multiplier = 1.0;
        self.stop_ufo_hum();
    }

    pub(crate) fn init_title_screen(&mut self) {
        self.state = GameState::Start;
        self.clear_world();
        self.selected_ship = 0;
        for _ in 0..TITLE_SCREEN_ASTEROIDS {
            let x = self.rng.next_f32() * self.field.width;
            let y = self.rng.next_f32() * self.field.height;
            let asteroid = Asteroid::new(&mut self.rng, x, y, AsteroidSize::Large, 1.0);
            self.asteroids.push(asteroid);
        }
        self.leaderboard_requests.push(LeaderboardRequest::Fetch);
    }

    pub(crate) fn init_game(&mut self) {
        self.clear_world();
        self.inventory = Inventory::new();
        self.drops.reset();
        self.refresh_stats();
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.wave = 0;
        self.invincible_timer = 0.0;
        self.respawn_timer = 0.0;
        self.shoot_cooldown = 0.0;
        self.thrust_sound_timer = 0.0;
        self.wave_banner_timer = 0.0;
        self.state = GameState::Playing;
        self.spawn_wave();
        info!(
            ship = self.ship_type().name,
            seed_state = self.rng.state(),
            "run started"
        );
    }

    fn refresh_stats(&mut self) {
        let bonus = self.inventory.speed_bonus();
        self.stats = ShipStats::derive(ship_type(self.selected_ship), bonus);
    }

    fn drift_backdrop(&mut self, dt: f32) {
        for asteroid in &mut self.asteroids {
            asteroid.integrate(dt, &self.field);
        }
    }

    fn update_title(&mut self, dt: f32, input: &InputFrame) {
        match self.state {
            GameState::Start => {
                if self.latch.take_any(input, &[Action::Fire, Action::Confirm]) {
                    self.selected_ship = 0;
                    self.select_cooldown = SELECT_INITIAL_COOLDOWN;
                    self.state = GameState::ShipSelect;
                } else if self.latch.take(input, Action::Scores) {
                    self.state = GameState::Scores;
                }
            }
            GameState::Scores => {
                let leave = [Action::Back, Action::Scores, Action::Fire, Action::Confirm];
                if self.latch.take_any(input, &leave) {
                    self.state = GameState::Start;
                }
            }
            _ => {}
        }
        self.drift_backdrop(dt);
    }

    fn select_ship(&mut self, index: usize) {
        self.selected_ship = index;
        self.select_cooldown = SELECT_REPEAT_COOLDOWN;
        self.sound(SoundEvent::Select);
    }

    fn update_ship_select(&mut self, dt: f32, input: &InputFrame) {
        let count = SHIP_TYPES.len();
        self.select_cooldown -= dt;
        if self.select_cooldown <= 0.0 {
            if input.is_held(Action::Left) {
                self.select_ship((self.selected_ship + count - 1) % count);
            }
            if input.is_held(Action::Right) {
                self.select_ship((self.selected_ship + 1) % count);
            }
            let direct = [Action::PickShip1, Action::PickShip2, Action::PickShip3];
            for (index, action) in direct.into_iter().enumerate() {
                if input.is_held(action) {
                    self.select_ship(index);
                }
            }
        }

        if self.latch.take_any(input, &[Action::Fire, Action::Confirm]) {
            self.sound(SoundEvent::Confirm);
            self.init_game();
            return;
        }
        if self.latch.take(input, Action::Back) {
            self.state = GameState::Start;
        }
        self.drift_backdrop(dt);
    }

    fn handle_name_entry(&mut self, input: &InputFrame) {
        let Some(event) = input.key_event.as_ref() else {
            return;
        };
        match event.code.as_str() {
            "Backspace" => {
                if self.entry_name.pop().is_some() {
                    self.sound(SoundEvent::NameEntryKey);
                }
            }
            "Enter" if !self.entry_name.is_empty() => self.submit_name(),
            _ => {
                // Non-letters are ignored without feedback.
                if let Some(c) = event.text {
                    if c.is_ascii_alphabetic() && self.entry_name.len() < NAME_LENGTH {
                        self.entry_name.push(c.to_ascii_uppercase());
                        self.sound(SoundEvent::NameEntryKey);
                    }
                }
            }
        }
    }

    fn submit_name(&mut self) {
        let name = format!("{:<width$}", self.entry_name, width = NAME_LENGTH);
        let ship = self.ship_type().name;
        let rank = self.highscores.insert(&name, self.score, self.wave, ship);
        self.sound(SoundEvent::NameEntryFanfare);
        self.state = GameState::Scores;
        // The Enter that submitted must not also leave the scores screen.
        self.latch.consume(Action::Confirm);
        let entry = HighscoreEntry::new(&name, self.score, self.wave, ship);
        self.leaderboard_requests.push(LeaderboardRequest::Submit(entry));
        info!(name = %name, score = self.score, wave = self.wave, ?rank, "highscore recorded");
    }

    fn end_run(&mut self) {
        self.stop_ufo_hum();
        // A held trigger must not skip straight past the next screen.
        self.latch.consume(Action::Fire);
        self.latch.consume(Action::Confirm);
        if self.highscores.qualifies(self.score) {
            self.state = GameState::EnterName;
            self.entry_name.clear();
            self.entry_cursor_blink = 0.0;
            self.name_entry_rank = self.highscores.rank_of(self.score);
            info!(score = self.score, wave = self.wave, "run over, score qualifies");
        } else {
            self.state = GameState::GameOver;
            info!(score = self.score, wave = self.wave, "run over");
        }
    }

    fn update_playing(&mut self, dt: f32, input: &InputFrame) {
        if self.wave_banner_timer > 0.0 {
            self.wave_banner_timer -= dt;
        }

        if self.ship.alive {
            self.update_ship(dt, input);
        } else {
            self.respawn_timer -= dt;
            if self.respawn_timer <= 0.0 {
                if self.lives > 0 {
                    self.ship = Ship::spawn(&self.field);
                    self.invincible_timer = INVINCIBLE_TIME;
                    debug!(lives = self.lives, "ship respawned");
                } else {
                    self.end_run();
                    return;
                }
            }
        }

        self.inventory.tick(dt);
        let aura_expired = self
            .lightning
            .as_mut()
            .is_some_and(|aura| !aura.tick(dt));
        if aura_expired {
            self.lightning = None;
            debug!("lightning aura expired");
        }

        let field = self.field;
        self.bullets.retain_mut(|bullet| bullet.advance(dt, &field));
        for asteroid in &mut self.asteroids {
            asteroid.integrate(dt, &field);
        }
        self.update_ufo(dt);
        self.ufo_bullets.retain_mut(|bullet| bullet.advance(dt, &field));
        self.items.retain_mut(|item| item.advance(dt, &field));

        self.handle_collisions();
        self.sweep_lightning();
        self.collect_items();
        self.prune_destroyed_entities();

        self.particles.retain_mut(|particle| particle.advance(dt));
        self.splash_rings.retain_mut(|ring| ring.advance(dt));

        if self.asteroids.is_empty()
            && self.ship.alive
            && self.ufo.is_none()
            && self.ufo_bullets.is_empty()
        {
            self.spawn_wave();
        }
    }

    fn update_ship(&mut self, dt: f32, input: &InputFrame) {
        if input.is_held(Action::Left) {
            self.ship.angle -= self.stats.turn_rate * dt;
        }
        if input.is_held(Action::Right) {
            self.ship.angle += self.stats.turn_rate * dt;
        }

        if input.is_held(Action::Thrust) {
            self.ship.vx += self.ship.angle.cos() * self.stats.thrust * dt;
            self.ship.vy += self.ship.angle.sin() * self.stats.thrust * dt;
            self.thrust_sound_timer -= dt;
            if self.thrust_sound_timer <= 0.0 {
                self.sound(SoundEvent::Thrust);
                self.thrust_sound_timer = THRUST_SOUND_INTERVAL;
            }
        } else {
            self.thrust_sound_timer = 0.0;
        }

        let friction = SHIP_FRICTION.powf(dt * REFERENCE_FPS);
        self.ship.vx *= friction;
        self.ship.vy *= friction;
        self.ship.x += self.ship.vx * dt;
        self.ship.y += self.ship.vy * dt;
        self.field.wrap(&mut self.ship.x, &mut self.ship.y);

        self.shoot_cooldown -= dt;
        if self.latch.is_live(input, Action::Fire) && self.shoot_cooldown <= 0.0 {
            self.fire_volley();
            self.shoot_cooldown = self.stats.fire_cooldown;
            self.sound(SoundEvent::Shoot);
        }

        if self.invincible_timer > 0.0 {
            self.invincible_timer -= dt;
        }

        if self.latch.take(input, Action::Lightning) {
            self.activate_lightning();
        }
        if self.latch.take(input, Action::GravityBoom) {
            self.activate_gravity_boom();
        }
    }

    fn fire_volley(&mut self) {
        let bullets = self.inventory.pistol_bullets();
        for angle in spread_angles(self.ship.angle, bullets) {
            let mut bullet = Bullet::new(
                self.ship.x + angle.cos() * SHIP_SIZE,
                self.ship.y + angle.sin() * SHIP_SIZE,
                angle,
                BULLET_SPEED,
                BULLET_RADIUS,
                self.stats.bullet_lifetime,
            );
            bullet.vx += self.ship.vx * BULLET_INHERIT_VELOCITY;
            bullet.vy += self.ship.vy * BULLET_INHERIT_VELOCITY;
            self.bullets.push(bullet);
        }
    }

    fn update_ufo(&mut self, dt: f32) {
        let field = self.field;
        if self.ufo.is_none() {
            self.ufo_spawn_timer -= dt;
            if self.ufo_spawn_timer <= 0.0 {
                self.spawn_ufo();
            }
            return;
        }
        let Some(ufo) = self.ufo.as_mut() else {
            return;
        };

        if !ufo.advance(&mut self.rng, dt, &field) {
            self.despawn_ufo();
            return;
        }
        if !ufo.fire_due(dt) || !self.ship.alive {
            return;
        }
        let target = (self.ship.x, self.ship.y);
        let bullet = ufo.fire(&mut self.rng, self.wave, target, self.stats.bullet_lifetime);
        self.ufo_bullets.push(bullet);
        self.sound(SoundEvent::UfoShoot);
    }

    fn spawn_ufo(&mut self) {
        let kind = pick_ufo_kind(&mut self.rng, self.wave);
        let ufo = Ufo::new(&mut self.rng, &self.field, kind, self.wave);
        debug!(?kind, wave = self.wave, y = ufo.y, "ufo spawned");
        self.ufo = Some(ufo);
        self.start_ufo_hum();
    }

    fn spawn_wave(&mut self) {
        self.wave += 1;
        self.speed_multiplier = speed_multiplier(self.wave);
        self.ufo_spawn_timer = ufo_spawn_interval(self.wave);
        self.drops.reset();

        let count = asteroid_count(self.wave);
        for _ in 0..count {
            let (x, y) = self.wave_spawn_point();
            let asteroid =
                Asteroid::new(&mut self.rng, x, y, AsteroidSize::Large, self.speed_multiplier);
            self.asteroids.push(asteroid);
        }
        self.wave_banner_timer = WAVE_BANNER_DURATION;
        debug!(
            wave = self.wave,
            asteroids = count,
            speed_multiplier = self.speed_multiplier,
            ufo_spawn_timer = self.ufo_spawn_timer,
            "wave started"
        );
    }

    // Falls back to pushing the last candidate out to the safe distance.
    fn wave_spawn_point(&mut self) -> (f32, f32) {
        let (sx, sy) = (self.ship.x, self.ship.y);
        let mut candidate = (sx, sy);
        for _ in 0..WAVE_PLACEMENT_ATTEMPTS {
            let x = self.rng.next_f32() * self.field.width;
            let y = self.rng.next_f32() * self.field.height;
            if dist(x, y, sx, sy) >= WAVE_SAFE_DISTANCE {
                return (x, y);
            }
            candidate = (x, y);
        }
        let (cx, cy) = candidate;
        let heading = if dist(sx, sy, cx, cy) > f32::EPSILON {
            (cy - sy).atan2(cx - sx)
        } else {
            self.rng.angle()
        };
        (
            (sx + heading.cos() * WAVE_SAFE_DISTANCE).rem_euclid(self.field.width),
            (sy + heading.sin() * WAVE_SAFE_DISTANCE).rem_euclid(self.field.height),
        )
    }

    /// Opens the lightning aura. Returns `false` (and keeps the charge) when
    /// no charge is held, the ship is down, or an aura is already running.
    pub fn activate_lightning(&mut self) -> bool {
        if self.state != GameState::Playing || !self.ship.alive || self.lightning.is_some() {
            return false;
        }
        let Some(aura) = self.inventory.use_lightning() else {
            return false;
        };
        debug!(
            radius = aura.radius,
            charges_left = self.inventory.lightning_charges(),
            "lightning aura opened"
        );
        self.lightning = Some(aura);
        self.sound(SoundEvent::AbilityActivate);
        true
    }

    /// Pushes every asteroid, the UFO and every UFO bullet in range away from
    /// the ship. Returns `false` while on cooldown or not held.
    pub fn activate_gravity_boom(&mut self) -> bool {
        if self.state != GameState::Playing || !self.ship.alive {
            return false;
        }
        let Some(pulse) = self.inventory.trigger_gravity_boom(self.ship.x, self.ship.y) else {
            return false;
        };

        let mut pushed = 0usize;
        let mut push = |x: f32, y: f32, vx: &mut f32, vy: &mut f32| {
            if let Some((dvx, dvy)) = pulse.impulse_at(x, y) {
                *vx += dvx;
                *vy += dvy;
                pushed += 1;
            }
        };
        for asteroid in &mut self.asteroids {
            push(asteroid.x, asteroid.y, &mut asteroid.vx, &mut asteroid.vy);
        }
        if let Some(ufo) = self.ufo.as_mut() {
            push(ufo.x, ufo.y, &mut ufo.vx, &mut ufo.vy);
        }
        for bullet in &mut self.ufo_bullets {
            push(bullet.x, bullet.y, &mut bullet.vx, &mut bullet.vy);
        }

        debug!(radius = pulse.radius, strength = pulse.strength, pushed, "gravity boom");
        self.sound(SoundEvent::AbilityActivate);
        true
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            frame_count: self.frame_count,
            state: self.state,
            score: self.score,
            top_score: self.highscores.top_score().max(self.score),
            lives: self.lives,
            wave: self.wave,
            selected_ship: self.selected_ship,
            ship_name: self.ship_type().name,
            rng_state: self.rng.state(),
            speed_multiplier: self.speed_multiplier,
            ufo_spawn_timer: self.ufo_spawn_timer,
            invincible_timer: self.invincible_timer,
            respawn_timer: self.respawn_timer,
            wave_banner_timer: self.wave_banner_timer,
            stats: self.stats,
            ship: self.ship.clone(),
            bullets: self.bullets.clone(),
            asteroids: self.asteroids.clone(),
            ufo: self.ufo.clone(),
            ufo_bullets: self.ufo_bullets.clone(),
            particles: self.particles.clone(),
            splash_rings: self.splash_rings.clone(),
            items: self.items.clone(),
            inventory: self.inventory.clone(),
            lightning: self.lightning,
            entry_name: self.entry_name.clone(),
            name_entry_rank: self.name_entry_rank,
            highscores: self.highscores.clone(),
            leaderboard_offline: self.leaderboard_offline,
        }
    }

    pub fn validate_invariants(&self) -> Result<(), RuleCode> {
        let in_field = |x: f32, y: f32| {
            x.is_finite()
                && y.is_finite()
                && (-WRAP_MARGIN..=self.field.width + WRAP_MARGIN).contains(&x)
                && (-WRAP_MARGIN..=self.field.height + WRAP_MARGIN).contains(&y)
        };

        if self.state == GameState::Playing && self.wave == 0 {
            return Err(RuleCode::GlobalWaveNonZero);
        }

        let lives_consistent = match self.state {
            GameState::Playing => !self.ship.alive || self.lives > 0,
            GameState::EnterName | GameState::GameOver => self.lives == 0,
            _ => true,
        };
        if !lives_consistent {
            return Err(RuleCode::GlobalStateLivesConsistency);
        }

        if self.state == GameState::Playing && self.ship.alive {
            let finite = self.ship.vx.is_finite() && self.ship.vy.is_finite();
            if !finite || !in_field(self.ship.x, self.ship.y) {
                return Err(RuleCode::ShipState);
            }
        }

        if self.invincible_timer > INVINCIBLE_TIME
            || self.respawn_timer > RESPAWN_DELAY
            || !self.invincible_timer.is_finite()
            || !self.respawn_timer.is_finite()
        {
            return Err(RuleCode::ShipTimerRange);
        }

        for bullet in &self.bullets {
            if !bullet.alive
                || bullet.life <= 0.0
                || bullet.life > self.stats.bullet_lifetime
                || !in_field(bullet.x, bullet.y)
            {
                return Err(RuleCode::PlayerBulletState);
            }
        }

        for bullet in &self.ufo_bullets {
            if !bullet.alive || bullet.life <= 0.0 || !in_field(bullet.x, bullet.y) {
                return Err(RuleCode::UfoBulletState);
            }
        }

        for asteroid in &self.asteroids {
            let vertex_count = asteroid.verts.len() as u32;
            if !asteroid.alive
                || asteroid.radius != asteroid.size.radius()
                || !(8..=12).contains(&vertex_count)
                || !in_field(asteroid.x, asteroid.y)
            {
                return Err(RuleCode::AsteroidState);
            }
        }

        if let Some(ufo) = &self.ufo {
            let y_ok = (-WRAP_MARGIN..=self.field.height + WRAP_MARGIN).contains(&ufo.y);
            if !y_ok
                || ufo.radius != ufo.kind.size() * UFO_RADIUS_FACTOR
                || ufo.fire_timer > ufo.fire_interval
            {
                return Err(RuleCode::UfoState);
            }
        }

        for item in &self.items {
            if !item.alive || item.life > ITEM_LIFETIME || !in_field(item.x, item.y) {
                return Err(RuleCode::ItemState);
            }
        }

        let cooldown = self.inventory.gravity_boom_cooldown();
        if self.inventory.pistol_bullets() > PISTOL_MAX_BULLETS
            || !(0.0..=GRAVITY_BOOM_COOLDOWN).contains(&cooldown)
        {
            return Err(RuleCode::InventoryState);
        }

        if self.highscores.len() > MAX_HIGHSCORES || !self.highscores.is_sorted() {
            return Err(RuleCode::HighscoreOrder);
        }

        Ok(())
    }
}
