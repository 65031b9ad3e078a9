//! Selectable ship archetypes and the pure stat derivation that turns their
//! 0–10 ratings (plus live speed bonuses) into flight parameters.

use serde::Serialize;

use crate::constants::{
    BASE_BULLET_LIFETIME, BASE_FIRE_COOLDOWN, BASE_THRUST, BASE_TURN_RATE, MIN_BULLET_LIFETIME,
    MIN_FIRE_COOLDOWN, MIN_THRUST, MIN_TURN_RATE,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Special {
    Splash,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ShipType {
    pub name: &'static str,
    pub speed: f32,
    pub attack: f32,
    pub range: f32,
    pub special: Option<Special>,
    pub description: &'static str,
}

pub const SHIP_TYPES: [ShipType; 3] = [
    ShipType {
        name: "THE WAVE",
        speed: 5.0,
        attack: 5.0,
        range: 3.0,
        special: None,
        description: "BALANCED ALL-ROUNDER",
    },
    ShipType {
        name: "INTERSTELLAR",
        speed: 7.0,
        attack: 3.0,
        range: 5.0,
        special: None,
        description: "FAST + LONG RANGE",
    },
    ShipType {
        name: "TERMINATOR",
        speed: 3.0,
        attack: 7.0,
        range: 2.0,
        special: Some(Special::Splash),
        description: "SPLASH DAMAGE ON HIT",
    },
];

pub fn ship_type(index: usize) -> &'static ShipType {
    &SHIP_TYPES[index % SHIP_TYPES.len()]
}

impl ShipType {
    pub fn has_splash(&self) -> bool {
        self.special == Some(Special::Splash)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ShipStats {
    pub thrust: f32,
    pub turn_rate: f32,
    pub fire_cooldown: f32,
    pub bullet_lifetime: f32,
}

impl ShipStats {
    /// Never accumulate into an existing `ShipStats`; always derive again from
    /// the archetype and the current bonus.
    pub fn derive(ship: &ShipType, speed_bonus: f32) -> Self {
        let effective_speed = ship.speed + speed_bonus;
        Self {
            thrust: (BASE_THRUST * (1.0 + (effective_speed - 5.0) * 0.15)).max(MIN_THRUST),
            turn_rate: (BASE_TURN_RATE * (1.0 + (effective_speed - 5.0) * 0.10))
                .max(MIN_TURN_RATE),
            fire_cooldown: (BASE_FIRE_COOLDOWN - (ship.attack - 5.0) * 0.015)
                .max(MIN_FIRE_COOLDOWN),
            bullet_lifetime: (BASE_BULLET_LIFETIME + (ship.range - 5.0) * 0.15)
                .max(MIN_BULLET_LIFETIME),
        }
    }
}
