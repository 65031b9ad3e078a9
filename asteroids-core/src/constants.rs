//! Game tunables. Distances are pixels, speeds pixels/second, times seconds.

// Frame loop
pub const MAX_FRAME_DT: f32 = 0.05;
pub const REFERENCE_FPS: f32 = 60.0;

// Ship
pub const SHIP_SIZE: f32 = 20.0;
pub const SHIP_RADIUS: f32 = SHIP_SIZE * 0.6;
pub const SHIP_FRICTION: f32 = 0.98;
pub const STARTING_LIVES: u32 = 3;
pub const INVINCIBLE_TIME: f32 = 2.5;
pub const RESPAWN_DELAY: f32 = 2.0;
pub const THRUST_SOUND_INTERVAL: f32 = 0.12;

// Ship stat derivation (stat 5 is the baseline)
pub const BASE_THRUST: f32 = 300.0;
pub const BASE_TURN_RATE: f32 = 5.0;
pub const BASE_FIRE_COOLDOWN: f32 = 0.15;
pub const BASE_BULLET_LIFETIME: f32 = 1.2;
pub const MIN_THRUST: f32 = 60.0;
pub const MIN_TURN_RATE: f32 = 1.0;
pub const MIN_FIRE_COOLDOWN: f32 = 0.05;
pub const MIN_BULLET_LIFETIME: f32 = 0.3;

// Player bullets
pub const BULLET_SPEED: f32 = 500.0;
pub const BULLET_INHERIT_VELOCITY: f32 = 0.3;
pub const BULLET_RADIUS: f32 = 4.0;

// Asteroids
pub const ASTEROID_RADIUS_LARGE: f32 = 50.0;
pub const ASTEROID_RADIUS_MEDIUM: f32 = 25.0;
pub const ASTEROID_RADIUS_SMALL: f32 = 12.0;
pub const ASTEROID_SPEED_BASE: f32 = 40.0;
pub const ASTEROID_SPEED_JITTER: f32 = 40.0;
pub const ASTEROID_SPEED_SIZE_STEP: f32 = 15.0;
pub const ASTEROID_MAX_ROT_SPEED: f32 = 0.75;
pub const ASTEROID_MIN_VERTS: u32 = 8;
pub const ASTEROID_EXTRA_VERTS: u32 = 5;
pub const SCORE_LARGE_ASTEROID: u32 = 20;
pub const SCORE_MEDIUM_ASTEROID: u32 = 50;
pub const SCORE_SMALL_ASTEROID: u32 = 100;
pub const INITIAL_ASTEROIDS: u32 = 4;
pub const TITLE_SCREEN_ASTEROIDS: u32 = 6;
pub const WAVE_SAFE_DISTANCE: f32 = 200.0;
pub const WAVE_PLACEMENT_ATTEMPTS: u32 = 64;

// Waves
pub const WAVE_BANNER_DURATION: f32 = 2.5;
pub const SPEED_MULTIPLIER_STEP: f32 = 0.08;
pub const SPEED_MULTIPLIER_CAP: f32 = 2.0;

// UFO
pub const UFO_SPAWN_INTERVAL_BASE: f32 = 15.0;
pub const UFO_SPAWN_INTERVAL_MIN: f32 = 8.0;
pub const UFO_SPAWN_INTERVAL_STEP: f32 = 0.8;
pub const UFO_SPEED_LARGE: f32 = 100.0;
pub const UFO_SPEED_SMALL: f32 = 150.0;
pub const UFO_SIZE_LARGE: f32 = 30.0;
pub const UFO_SIZE_SMALL: f32 = 16.0;
pub const UFO_RADIUS_FACTOR: f32 = 0.7;
pub const UFO_FIRE_INTERVAL_LARGE: f32 = 2.0;
pub const UFO_FIRE_INTERVAL_SMALL: f32 = 1.2;
pub const UFO_FIRE_INTERVAL_STEP: f32 = 0.05;
pub const UFO_FIRE_INTERVAL_MIN: f32 = 0.5;
pub const UFO_ZIGZAG_INTERVAL: f32 = 1.5;
pub const UFO_ZIGZAG_SPEED: f32 = 120.0;
pub const UFO_ENTRY_DRIFT: f32 = 60.0;
pub const UFO_EXIT_MARGIN: f32 = 20.0;
pub const UFO_SMALL_PROB_STEP: f32 = 0.12;
pub const UFO_SMALL_PROB_CAP: f32 = 0.85;
pub const UFO_AIM_SPREAD_BASE: f32 = 0.3;
pub const UFO_AIM_SPREAD_STEP: f32 = 0.02;
pub const UFO_AIM_SPREAD_MIN: f32 = 0.05;
pub const SCORE_LARGE_UFO: u32 = 200;
pub const SCORE_SMALL_UFO: u32 = 1000;

// UFO bullets
pub const UFO_BULLET_SPEED: f32 = 250.0;
pub const UFO_BULLET_RADIUS: f32 = 4.0;
pub const UFO_BULLET_LIFE_FACTOR: f32 = 1.2;

// Particles and rings
pub const PARTICLE_LIFETIME: f32 = 0.8;
pub const PARTICLE_MIN_SPEED: f32 = 30.0;
pub const PARTICLE_SPEED_JITTER: f32 = 120.0;
pub const PARTICLES_LARGE: u32 = 12;
pub const PARTICLES_MEDIUM: u32 = 8;
pub const PARTICLES_SMALL: u32 = 5;
pub const PARTICLES_UFO: u32 = 16;
pub const PARTICLES_UFO_RAM: u32 = 12;
pub const PARTICLES_SHIP: u32 = 20;
pub const PARTICLES_BULLET_CLASH: u32 = 3;
pub const SPLASH_RING_START_RADIUS: f32 = 5.0;
pub const SPLASH_RING_LIFE: f32 = 0.4;

// Splash damage
pub const SPLASH_RADIUS: f32 = 60.0;

// Items
pub const ITEM_RADIUS: f32 = 12.0;
pub const ITEM_LIFETIME: f32 = 12.0;
pub const ITEM_DAMPING: f32 = 0.97;
pub const ITEM_MIN_DRIFT: f32 = 20.0;
pub const ITEM_MAX_DRIFT: f32 = 60.0;
pub const ITEM_DROP_BASE_CHANCE: f32 = 0.15;
pub const ITEM_DROP_ESCALATION: f32 = 0.01;
pub const ITEM_DROP_UFO_CHANCE: f32 = 0.5;

// Abilities
pub const LIGHTNING_DURATION: f32 = 10.0;
pub const LIGHTNING_RADIUS_BY_MARK: [f32; 3] = [80.0, 160.0, 320.0];
pub const GRAVITY_BOOM_COOLDOWN: f32 = 30.0;
pub const GRAVITY_BOOM_BASE_RADIUS: f32 = 150.0;
pub const GRAVITY_BOOM_RADIUS_STEP: f32 = 50.0;
pub const GRAVITY_BOOM_STRENGTH_BY_MARK: [f32; 3] = [300.0, 450.0, 600.0];
pub const SPEED_BONUS_BY_MARK: [f32; 3] = [0.5, 1.0, 1.5];
pub const BOMB_RADIUS_BY_MARK: [f32; 3] = [20.0, 35.0, 50.0];
pub const PISTOL_MAX_BULLETS: u32 = 9;
pub const PISTOL_BASE_HALF_SPREAD_DEG: f32 = 5.0;
pub const PISTOL_HALF_SPREAD_STEP_DEG: f32 = 3.0;
pub const PISTOL_MAX_HALF_SPREAD_DEG: f32 = 45.0;

// Menus
pub const SELECT_INITIAL_COOLDOWN: f32 = 0.2;
pub const SELECT_REPEAT_COOLDOWN: f32 = 0.18;

// Highscores
pub const MAX_HIGHSCORES: usize = 10;
pub const NAME_LENGTH: usize = 5;
pub const MAX_SHIP_TAG_LEN: usize = 16;
