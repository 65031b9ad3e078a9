//! Sound cues emitted by the simulation. The session only queues
//! [`SoundEvent`]s; an [`AudioSink`] owned by the host turns them into noise
//! on its own clock.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEvent {
    Shoot,
    ExplosionLarge,
    ExplosionMedium,
    ExplosionSmall,
    Thrust,
    Death,
    UfoShoot,
    UfoExplosion,
    UfoHumStart,
    UfoHumStop,
    NameEntryKey,
    NameEntryFanfare,
    Select,
    Confirm,
    Splash,
    ItemDrop,
    ItemCollect,
    AbilityActivate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Square,
    Sawtooth,
    Triangle,
}

/// A single oscillator note with an exponential fade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Tone {
    pub frequency: f32,
    /// Seconds; zero sustains until the matching stop event.
    pub duration: f32,
    pub waveform: Waveform,
    pub volume: f32,
}

/// One note of a cue, offset from the moment the event was raised.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Cue {
    pub delay: f32,
    pub tone: Tone,
}

const fn note(delay: f32, frequency: f32, duration: f32, waveform: Waveform, volume: f32) -> Cue {
    Cue {
        delay,
        tone: Tone {
            frequency,
            duration,
            waveform,
            volume,
        },
    }
}

use Waveform::{Sawtooth, Square, Triangle};

const SHOOT: [Cue; 1] = [note(0.0, 800.0, 0.08, Square, 0.1)];
const EXPLOSION_LARGE: [Cue; 1] = [note(0.0, 60.0, 0.4, Sawtooth, 0.2)];
const EXPLOSION_MEDIUM: [Cue; 1] = [note(0.0, 100.0, 0.3, Sawtooth, 0.15)];
const EXPLOSION_SMALL: [Cue; 1] = [note(0.0, 180.0, 0.2, Sawtooth, 0.12)];
const THRUST: [Cue; 1] = [note(0.0, 50.0, 0.1, Sawtooth, 0.06)];
const DEATH: [Cue; 2] = [
    note(0.0, 200.0, 0.5, Sawtooth, 0.25),
    note(0.15, 100.0, 0.6, Sawtooth, 0.2),
];
const UFO_SHOOT: [Cue; 1] = [note(0.0, 400.0, 0.12, Triangle, 0.1)];
const UFO_EXPLOSION: [Cue; 2] = [
    note(0.0, 300.0, 0.3, Sawtooth, 0.2),
    note(0.1, 150.0, 0.4, Square, 0.15),
];
const UFO_HUM: [Cue; 1] = [note(0.0, 80.0, 0.0, Square, 0.06)];
const NAME_ENTRY_KEY: [Cue; 1] = [note(0.0, 600.0, 0.06, Square, 0.08)];
const NAME_ENTRY_FANFARE: [Cue; 3] = [
    note(0.0, 1000.0, 0.15, Square, 0.12),
    note(0.1, 1200.0, 0.15, Square, 0.12),
    note(0.2, 1500.0, 0.2, Square, 0.12),
];
const SELECT: [Cue; 1] = [note(0.0, 500.0, 0.08, Square, 0.1)];
const CONFIRM: [Cue; 2] = [
    note(0.0, 800.0, 0.1, Square, 0.12),
    note(0.08, 1000.0, 0.12, Square, 0.12),
];
const SPLASH: [Cue; 1] = [note(0.0, 200.0, 0.25, Sawtooth, 0.18)];
const ITEM_DROP: [Cue; 1] = [note(0.0, 700.0, 0.1, Triangle, 0.1)];
const ITEM_COLLECT: [Cue; 2] = [
    note(0.0, 900.0, 0.08, Square, 0.1),
    note(0.06, 1200.0, 0.1, Square, 0.1),
];
const ABILITY_ACTIVATE: [Cue; 2] = [
    note(0.0, 300.0, 0.15, Sawtooth, 0.18),
    note(0.1, 600.0, 0.25, Sawtooth, 0.15),
];

impl SoundEvent {
    /// Note sequence for this event. [`SoundEvent::UfoHumStop`] has none; it
    /// silences the sustained hum.
    pub fn cue(self) -> &'static [Cue] {
        match self {
            Self::Shoot => &SHOOT,
            Self::ExplosionLarge => &EXPLOSION_LARGE,
            Self::ExplosionMedium => &EXPLOSION_MEDIUM,
            Self::ExplosionSmall => &EXPLOSION_SMALL,
            Self::Thrust => &THRUST,
            Self::Death => &DEATH,
            Self::UfoShoot => &UFO_SHOOT,
            Self::UfoExplosion => &UFO_EXPLOSION,
            Self::UfoHumStart => &UFO_HUM,
            Self::UfoHumStop => &[],
            Self::NameEntryKey => &NAME_ENTRY_KEY,
            Self::NameEntryFanfare => &NAME_ENTRY_FANFARE,
            Self::Select => &SELECT,
            Self::Confirm => &CONFIRM,
            Self::Splash => &SPLASH,
            Self::ItemDrop => &ITEM_DROP,
            Self::ItemCollect => &ITEM_COLLECT,
            Self::AbilityActivate => &ABILITY_ACTIVATE,
        }
    }
}

/// Fire-and-forget consumer of sound events.
pub trait AudioSink {
    fn play(&mut self, event: SoundEvent);
}

impl AudioSink for Vec<SoundEvent> {
    fn play(&mut self, event: SoundEvent) {
        self.push(event);
    }
}
