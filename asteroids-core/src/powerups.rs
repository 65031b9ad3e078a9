//! Floating pickups, the per-run inventory they feed, and the two activated
//! abilities (lightning aura, gravity boom).

use serde::{Deserialize, Serialize};

use crate::constants::{
    BOMB_RADIUS_BY_MARK, GRAVITY_BOOM_BASE_RADIUS, GRAVITY_BOOM_COOLDOWN,
    GRAVITY_BOOM_RADIUS_STEP, GRAVITY_BOOM_STRENGTH_BY_MARK, ITEM_DROP_BASE_CHANCE,
    ITEM_DROP_ESCALATION, ITEM_DROP_UFO_CHANCE, LIGHTNING_DURATION, LIGHTNING_RADIUS_BY_MARK,
    PISTOL_BASE_HALF_SPREAD_DEG, PISTOL_HALF_SPREAD_STEP_DEG, PISTOL_MAX_BULLETS,
    PISTOL_MAX_HALF_SPREAD_DEG, SPEED_BONUS_BY_MARK, SPLASH_RADIUS,
};
use crate::geometry::dist;
use crate::rng::SeededRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Speed,
    Bomb,
    Pistol,
    Lightning,
    GravityBoom,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Speed,
        ItemKind::Bomb,
        ItemKind::Pistol,
        ItemKind::Lightning,
        ItemKind::GravityBoom,
    ];

    fn index(self) -> usize {
        match self {
            Self::Speed => 0,
            Self::Bomb => 1,
            Self::Pistol => 2,
            Self::Lightning => 3,
            Self::GravityBoom => 4,
        }
    }

    pub fn random(rng: &mut SeededRng) -> Self {
        Self::ALL[rng.next_int(Self::ALL.len() as u32) as usize]
    }
}

/// Power-up tier, always in `1..=3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Mark(u8);

impl Mark {
    pub const I: Mark = Mark(1);
    pub const II: Mark = Mark(2);
    pub const III: Mark = Mark(3);

    pub fn new(value: u8) -> Option<Mark> {
        (1..=3).contains(&value).then_some(Mark(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn table_index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

/// Tier of a fresh drop given the best tier already held for that kind.
/// Biased one step upward, never a hard sequence.
pub fn roll_mark(rng: &mut SeededRng, held: Option<Mark>) -> Mark {
    match held {
        None => Mark::I,
        Some(Mark::I) => {
            if rng.chance(0.4) {
                Mark::II
            } else {
                Mark::I
            }
        }
        Some(Mark::II) => {
            if rng.chance(0.6) {
                Mark::III
            } else {
                Mark::II
            }
        }
        Some(_) => Mark::III,
    }
}

/// Item-drop odds with a pity timer: every asteroid kill that drops nothing
/// makes the next one more likely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DropTable {
    escalation: f32,
}

impl DropTable {
    #[cfg(test)]
    pub(crate) fn with_escalation(escalation: f32) -> Self {
        Self { escalation }
    }

    pub fn asteroid_chance(&self) -> f32 {
        ITEM_DROP_BASE_CHANCE + self.escalation
    }

    pub fn roll_asteroid_drop(&mut self, rng: &mut SeededRng) -> bool {
        if rng.chance(self.asteroid_chance()) {
            self.escalation = 0.0;
            true
        } else {
            self.escalation += ITEM_DROP_ESCALATION;
            false
        }
    }

    pub fn roll_ufo_drop(&self, rng: &mut SeededRng) -> bool {
        rng.chance(ITEM_DROP_UFO_CHANCE)
    }

    pub fn reset(&mut self) {
        self.escalation = 0.0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Stack {
    pub count: u32,
    pub mark: Mark,
}

impl Stack {
    fn first(mark: Mark) -> Self {
        Self { count: 1, mark }
    }

    fn absorb(&mut self, mark: Mark) {
        self.count += 1;
        if mark > self.mark {
            self.mark = mark;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InventoryEntry {
    Speed(Stack),
    Bomb(Stack),
    Pistol(Stack),
    Lightning { stack: Stack, charges: u32 },
    GravityBoom { stack: Stack, ready: bool, cooldown: f32 },
}

impl InventoryEntry {
    fn first(kind: ItemKind, mark: Mark) -> Self {
        let stack = Stack::first(mark);
        match kind {
            ItemKind::Speed => Self::Speed(stack),
            ItemKind::Bomb => Self::Bomb(stack),
            ItemKind::Pistol => Self::Pistol(stack),
            ItemKind::Lightning => Self::Lightning { stack, charges: 1 },
            ItemKind::GravityBoom => Self::GravityBoom {
                stack,
                ready: true,
                cooldown: 0.0,
            },
        }
    }

    fn absorb(&mut self, mark: Mark) {
        match self {
            Self::Speed(stack) | Self::Bomb(stack) | Self::Pistol(stack) => stack.absorb(mark),
            Self::Lightning { stack, charges } => {
                stack.absorb(mark);
                *charges += 1;
            }
            // Extra booms widen the blast; the cooldown is shared.
            Self::GravityBoom { stack, .. } => stack.absorb(mark),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Speed(_) => ItemKind::Speed,
            Self::Bomb(_) => ItemKind::Bomb,
            Self::Pistol(_) => ItemKind::Pistol,
            Self::Lightning { .. } => ItemKind::Lightning,
            Self::GravityBoom { .. } => ItemKind::GravityBoom,
        }
    }

    pub fn stack(&self) -> &Stack {
        match self {
            Self::Speed(stack) | Self::Bomb(stack) | Self::Pistol(stack) => stack,
            Self::Lightning { stack, .. } | Self::GravityBoom { stack, .. } => stack,
        }
    }
}

/// A gravity-boom activation: a radial push centred on the ship.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityPulse {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub strength: f32,
}

impl GravityPulse {
    /// Velocity change for a body at `(px, py)`: full strength at the centre,
    /// falling linearly to zero at the radius.
    pub fn impulse_at(&self, px: f32, py: f32) -> Option<(f32, f32)> {
        let d = dist(self.x, self.y, px, py);
        if d >= self.radius {
            return None;
        }
        let magnitude = self.strength * (1.0 - d / self.radius);
        let (nx, ny) = if d > f32::EPSILON {
            ((px - self.x) / d, (py - self.y) / d)
        } else {
            (1.0, 0.0)
        };
        Some((nx * magnitude, ny * magnitude))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LightningAura {
    pub remaining: f32,
    pub radius: f32,
}

impl LightningAura {
    pub fn new(radius: f32) -> Self {
        Self {
            remaining: LIGHTNING_DURATION,
            radius,
        }
    }

    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining > 0.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Inventory {
    slots: [Option<InventoryEntry>; 5],
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.slots.iter().flatten()
    }

    pub fn get(&self, kind: ItemKind) -> Option<&InventoryEntry> {
        self.slots[kind.index()].as_ref()
    }

    pub fn mark(&self, kind: ItemKind) -> Option<Mark> {
        self.get(kind).map(|entry| entry.stack().mark)
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        self.get(kind).map_or(0, |entry| entry.stack().count)
    }

    pub fn collect(&mut self, kind: ItemKind, mark: Mark) -> InventoryEntry {
        let slot = &mut self.slots[kind.index()];
        let entry = match slot.take() {
            Some(mut entry) => {
                entry.absorb(mark);
                entry
            }
            None => InventoryEntry::first(kind, mark),
        };
        *slot = Some(entry);
        entry
    }

    pub fn speed_bonus(&self) -> f32 {
        self.scaled(ItemKind::Speed, &SPEED_BONUS_BY_MARK)
    }

    pub fn bomb_radius(&self) -> f32 {
        self.scaled(ItemKind::Bomb, &BOMB_RADIUS_BY_MARK)
    }

    fn scaled(&self, kind: ItemKind, per_mark: &[f32; 3]) -> f32 {
        self.get(kind).map_or(0.0, |entry| {
            let stack = entry.stack();
            stack.count as f32 * per_mark[stack.mark.table_index()]
        })
    }

    pub fn pistol_bullets(&self) -> u32 {
        match self.get(ItemKind::Pistol) {
            Some(entry) => {
                let stack = entry.stack();
                (1 + stack.count + u32::from(stack.mark.get() - 1)).min(PISTOL_MAX_BULLETS)
            }
            None => 1,
        }
    }

    pub fn lightning_radius(&self) -> Option<f32> {
        self.mark(ItemKind::Lightning)
            .map(|mark| LIGHTNING_RADIUS_BY_MARK[mark.table_index()])
    }

    pub fn gravity_boom_radius(&self) -> Option<f32> {
        self.get(ItemKind::GravityBoom).map(|entry| {
            GRAVITY_BOOM_BASE_RADIUS
                + GRAVITY_BOOM_RADIUS_STEP * entry.stack().count.saturating_sub(1) as f32
        })
    }

    pub fn lightning_charges(&self) -> u32 {
        match self.get(ItemKind::Lightning) {
            Some(InventoryEntry::Lightning { charges, .. }) => *charges,
            _ => 0,
        }
    }

    pub fn gravity_boom_ready(&self) -> bool {
        matches!(
            self.get(ItemKind::GravityBoom),
            Some(InventoryEntry::GravityBoom { ready: true, .. })
        )
    }

    pub fn gravity_boom_cooldown(&self) -> f32 {
        match self.get(ItemKind::GravityBoom) {
            Some(InventoryEntry::GravityBoom { cooldown, .. }) => *cooldown,
            _ => 0.0,
        }
    }

    /// Drains one lightning charge and returns the aura it opens, or `None`
    /// when no charge is held.
    pub fn use_lightning(&mut self) -> Option<LightningAura> {
        match &mut self.slots[ItemKind::Lightning.index()] {
            Some(InventoryEntry::Lightning { stack, charges }) if *charges > 0 => {
                *charges -= 1;
                let radius = LIGHTNING_RADIUS_BY_MARK[stack.mark.table_index()];
                Some(LightningAura::new(radius))
            }
            _ => None,
        }
    }

    /// Fires the gravity boom from `(x, y)` if it is held and off cooldown.
    pub fn trigger_gravity_boom(&mut self, x: f32, y: f32) -> Option<GravityPulse> {
        match &mut self.slots[ItemKind::GravityBoom.index()] {
            Some(InventoryEntry::GravityBoom {
                stack,
                ready,
                cooldown,
            }) if *ready => {
                *ready = false;
                *cooldown = GRAVITY_BOOM_COOLDOWN;
                Some(GravityPulse {
                    x,
                    y,
                    radius: GRAVITY_BOOM_BASE_RADIUS
                        + GRAVITY_BOOM_RADIUS_STEP * stack.count.saturating_sub(1) as f32,
                    strength: GRAVITY_BOOM_STRENGTH_BY_MARK[stack.mark.table_index()],
                })
            }
            _ => None,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(InventoryEntry::GravityBoom {
            ready, cooldown, ..
        }) = &mut self.slots[ItemKind::GravityBoom.index()]
        {
            if !*ready {
                *cooldown = (*cooldown - dt).max(0.0);
                if *cooldown <= 0.0 {
                    *ready = true;
                }
            }
        }
    }
}

/// Splash radius for the current loadout: the archetype's built-in splash
/// plus every bomb held. `None` when the loadout has no splash at all.
pub fn splash_radius(archetype_splash: bool, inventory: &Inventory) -> Option<f32> {
    let base = if archetype_splash { SPLASH_RADIUS } else { 0.0 };
    let radius = base + inventory.bomb_radius();
    (radius > 0.0).then_some(radius)
}

/// Firing angles for a multi-bullet volley, evenly spread around `aim`.
pub fn spread_angles(aim: f32, bullets: u32) -> Vec<f32> {
    if bullets <= 1 {
        return vec![aim];
    }
    let half_deg = (PISTOL_BASE_HALF_SPREAD_DEG
        + (bullets - 2) as f32 * PISTOL_HALF_SPREAD_STEP_DEG)
        .min(PISTOL_MAX_HALF_SPREAD_DEG);
    let half = half_deg.to_radians();
    let step = 2.0 * half / (bullets - 1) as f32;
    (0..bullets).map(|i| aim - half + step * i as f32).collect()
}
