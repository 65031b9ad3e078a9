//! Logical input actions as seen by the simulation. Key capture lives in the
//! embedding application; it hands the session one [`InputFrame`] per tick.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Left,
    Right,
    Thrust,
    Fire,
    Confirm,
    Back,
    Scores,
    PickShip1,
    PickShip2,
    PickShip3,
    Lightning,
    GravityBoom,
}

impl Action {
    #[inline]
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Compact set of held actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionSet(u16);

impl ActionSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = Self::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

/// One discrete keystroke for text entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Physical key code, e.g. `"KeyA"`, `"Backspace"`, `"Enter"`.
    pub code: String,
    /// Printable character produced by the key, if any.
    pub text: Option<char>,
}

impl KeyEvent {
    pub fn new(code: &str, text: Option<char>) -> Self {
        Self {
            code: code.to_string(),
            text,
        }
    }

    pub fn letter(c: char) -> Self {
        Self {
            code: format!("Key{}", c.to_ascii_uppercase()),
            text: Some(c),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputFrame {
    pub held: ActionSet,
    pub key_event: Option<KeyEvent>,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn holding(actions: &[Action]) -> Self {
        Self {
            held: actions.iter().copied().collect(),
            key_event: None,
        }
    }

    pub fn typed(event: KeyEvent) -> Self {
        Self {
            held: ActionSet::empty(),
            key_event: Some(event),
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(action)
    }
}

/// Maps physical key codes to actions. Several codes may share an action.
#[derive(Clone, Debug)]
pub struct KeyBindings {
    bindings: Vec<(String, Action)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let pairs = [
            ("ArrowLeft", Action::Left),
            ("KeyA", Action::Left),
            ("ArrowRight", Action::Right),
            ("KeyD", Action::Right),
            ("ArrowUp", Action::Thrust),
            ("KeyW", Action::Thrust),
            ("Space", Action::Fire),
            ("Enter", Action::Confirm),
            ("Escape", Action::Back),
            ("KeyH", Action::Scores),
            ("Digit1", Action::PickShip1),
            ("Digit2", Action::PickShip2),
            ("Digit3", Action::PickShip3),
            ("KeyQ", Action::Lightning),
            ("KeyE", Action::GravityBoom),
        ];
        Self {
            bindings: pairs
                .iter()
                .map(|(code, action)| (code.to_string(), *action))
                .collect(),
        }
    }
}

impl KeyBindings {
    pub fn action_for(&self, code: &str) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == code)
            .map(|(_, action)| *action)
    }

    pub fn bind(&mut self, code: &str, action: Action) {
        self.bindings.retain(|(bound, _)| bound != code);
        self.bindings.push((code.to_string(), action));
    }

    /// Builds a frame from the set of physical keys currently down.
    pub fn frame<'a>(
        &self,
        held_codes: impl IntoIterator<Item = &'a str>,
        key_event: Option<KeyEvent>,
    ) -> InputFrame {
        InputFrame {
            held: held_codes
                .into_iter()
                .filter_map(|code| self.action_for(code))
                .collect(),
            key_event,
        }
    }
}

/// Edge-trigger for menu transitions: an action consumed once stays
/// consumed until it is released.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyLatch {
    consumed: ActionSet,
}

impl KeyLatch {
    /// Re-arms every consumed action that is no longer held. Call once per
    /// tick before any `take`.
    pub fn refresh(&mut self, frame: &InputFrame) {
        for action in ALL_ACTIONS {
            if !frame.is_held(action) {
                self.consumed.remove(action);
            }
        }
    }

    /// Held and not yet consumed.
    pub fn is_live(&self, frame: &InputFrame, action: Action) -> bool {
        frame.is_held(action) && !self.consumed.contains(action)
    }

    /// Consumes `action` if it is live.
    pub fn take(&mut self, frame: &InputFrame, action: Action) -> bool {
        if self.is_live(frame, action) {
            self.consumed.insert(action);
            true
        } else {
            false
        }
    }

    /// Consumes the first live action of `actions`, and marks every one of
    /// them consumed so a combined press fires once.
    pub fn take_any(&mut self, frame: &InputFrame, actions: &[Action]) -> bool {
        if actions.iter().any(|action| self.is_live(frame, *action)) {
            for action in actions {
                self.consumed.insert(*action);
            }
            true
        } else {
            false
        }
    }

    pub fn consume(&mut self, action: Action) {
        self.consumed.insert(action);
    }
}

const ALL_ACTIONS: [Action; 12] = [
    Action::Left,
    Action::Right,
    Action::Thrust,
    Action::Fire,
    Action::Confirm,
    Action::Back,
    Action::Scores,
    Action::PickShip1,
    Action::PickShip2,
    Action::PickShip3,
    Action::Lightning,
    Action::GravityBoom,
];
