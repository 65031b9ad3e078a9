//! Deterministic scripted pilot. It reads the session, never the RNG, so a
//! seed plus a pilot fully determines a run.

use std::f32::consts::PI;

use asteroids_core::{Action, GameSession, GameState, InputFrame, KeyEvent};

const AIM_TOLERANCE: f32 = 0.1;
const FIRE_CONE: f32 = 0.25;
const LIGHTNING_RANGE: f32 = 120.0;
const BOOM_RANGE: f32 = 150.0;
const CRUISE_DISTANCE: f32 = 300.0;
const FALLBACK_NAME: &str = "PILOT";

#[derive(Clone, Debug)]
pub struct ScriptedPilot {
    ship: usize,
    name: Vec<char>,
    frame: u64,
}

impl ScriptedPilot {
    /// `ship` is a catalogue index; `name` keeps only its ASCII letters.
    pub fn new(ship: usize, name: &str) -> Self {
        let mut letters: Vec<char> = name
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .take(5)
            .collect();
        if letters.is_empty() {
            letters = FALLBACK_NAME.chars().collect();
        }
        Self {
            ship,
            name: letters,
            frame: 0,
        }
    }

    pub fn next_input(&mut self, session: &GameSession) -> InputFrame {
        let frame = self.frame;
        self.frame += 1;
        // Edge-triggered actions need a release between presses.
        let press = frame % 2 == 0;

        match session.state() {
            GameState::Start | GameState::GameOver | GameState::Scores => {
                tap(press, Action::Fire)
            }
            GameState::ShipSelect => {
                if session.selected_ship() != self.ship {
                    InputFrame::holding(&[pick_action(self.ship)])
                } else {
                    tap(press, Action::Confirm)
                }
            }
            GameState::EnterName => self.type_name(session, press),
            GameState::Playing => fly(session, frame),
        }
    }

    fn type_name(&self, session: &GameSession, press: bool) -> InputFrame {
        if !press {
            return InputFrame::idle();
        }
        let typed = session.entry_name().chars().count();
        match self.name.get(typed) {
            Some(&c) => InputFrame::typed(KeyEvent::letter(c)),
            None => InputFrame::typed(KeyEvent::new("Enter", None)),
        }
    }
}

fn tap(press: bool, action: Action) -> InputFrame {
    if press {
        InputFrame::holding(&[action])
    } else {
        InputFrame::idle()
    }
}

fn pick_action(ship: usize) -> Action {
    match ship {
        0 => Action::PickShip1,
        1 => Action::PickShip2,
        _ => Action::PickShip3,
    }
}

fn normalize_angle(mut angle: f32) -> f32 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Nearest hostile as `(dx, dy, surface distance)`.
fn nearest_target(session: &GameSession) -> Option<(f32, f32, f32)> {
    let ship = session.ship();
    let asteroids = session
        .asteroids()
        .iter()
        .map(|asteroid| (asteroid.x, asteroid.y, asteroid.radius));
    let ufo = session.ufo().map(|ufo| (ufo.x, ufo.y, ufo.radius));

    asteroids
        .chain(ufo)
        .map(|(x, y, radius)| {
            let (dx, dy) = (x - ship.x, y - ship.y);
            (dx, dy, (dx * dx + dy * dy).sqrt() - radius)
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))
}

fn fly(session: &GameSession, frame: u64) -> InputFrame {
    if !session.ship().alive {
        return InputFrame::idle();
    }
    let Some((dx, dy, distance)) = nearest_target(session) else {
        return InputFrame::idle();
    };

    let mut actions = Vec::with_capacity(4);
    let error = normalize_angle(dy.atan2(dx) - session.ship().angle);
    if error > AIM_TOLERANCE {
        actions.push(Action::Right);
    } else if error < -AIM_TOLERANCE {
        actions.push(Action::Left);
    }
    if error.abs() < FIRE_CONE {
        actions.push(Action::Fire);
    }
    if distance > CRUISE_DISTANCE && frame % 30 < 6 {
        actions.push(Action::Thrust);
    }

    let inventory = session.inventory();
    let pulse = frame % 2 == 0;
    if pulse && distance < LIGHTNING_RANGE && inventory.lightning_charges() > 0 {
        actions.push(Action::Lightning);
    }
    if pulse && distance < BOOM_RANGE && inventory.gravity_boom_ready() {
        actions.push(Action::GravityBoom);
    }
    InputFrame::holding(&actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroids_core::PlayField;

    #[test]
    fn names_keep_letters_only() {
        let pilot = ScriptedPilot::new(0, "a-c3e!fgh");
        assert_eq!(pilot.name, vec!['A', 'C', 'E', 'F', 'G']);
        let pilot = ScriptedPilot::new(0, "123");
        assert_eq!(pilot.name.iter().collect::<String>(), FALLBACK_NAME);
    }

    #[test]
    fn angles_wrap_to_half_turns() {
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn pilot_reaches_the_chosen_ship() {
        let mut session = GameSession::new(PlayField::default(), 5);
        let mut pilot = ScriptedPilot::new(2, "ACE");
        for _ in 0..240 {
            let input = pilot.next_input(&session);
            session.update(1.0 / 60.0, &input);
            if session.state() == GameState::Playing {
                break;
            }
        }
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.selected_ship(), 2);
    }
}
