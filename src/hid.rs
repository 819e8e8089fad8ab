use crate::event::{KeyEvent, KeyValue};
use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Alt,
    Control,
    Shift,
}

lazy_static! {
    static ref MODIFIER_CODES: HashMap<&'static str, Modifier> = HashMap::from([
        ("AltLeft", Modifier::Alt),
        ("AltRight", Modifier::Alt),
        ("ControlLeft", Modifier::Control),
        ("ControlRight", Modifier::Control),
        ("ShiftLeft", Modifier::Shift),
        ("ShiftRight", Modifier::Shift),
    ]);
}

pub fn modifier_of(code: &str) -> Option<Modifier> {
    MODIFIER_CODES.get(code).copied()
}

/// Live keyboard/mouse/touch state of a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HidState {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub keys: BTreeSet<u32>,
    pub wheel: i32,
    pub click: bool,
    pub context: bool,
}

impl HidState {
    pub fn new() -> HidState {
        HidState::default()
    }

    /// Applies a key event. Modifiers are tracked by physical code, every
    /// other key by its keyCode in `keys`. `Press` (the DOM keypress phase)
    /// changes nothing.
    pub fn update_key(&mut self, event: &KeyEvent) {
        let pressed = match event.value() {
            KeyValue::Down => true,
            KeyValue::Up => false,
            KeyValue::Press => return,
        };

        match modifier_of(event.code()) {
            Some(modifier) => self.set_modifier(modifier, pressed),
            None if pressed => {
                self.keys.insert(event.key_code());
            }
            None => {
                self.keys.remove(&event.key_code());
            }
        }
    }

    fn set_modifier(&mut self, modifier: Modifier, pressed: bool) {
        match modifier {
            Modifier::Alt => self.alt = pressed,
            Modifier::Control => self.ctrl = pressed,
            Modifier::Shift => self.shift = pressed,
        }
    }

    // Modifier releases can be lost (focus moves away while a key is held),
    // so they are cleared whenever nothing else is held.
    pub fn release_stuck_modifiers(&mut self) {
        if self.keys.is_empty() {
            self.alt = false;
            self.ctrl = false;
            self.shift = false;
        }
    }

    pub fn set_wheel(&mut self, delta: f64) {
        self.wheel = if delta > 0.0 {
            1
        } else if delta < 0.0 {
            -1
        } else {
            0
        };
    }

    pub fn is_neutral(&self) -> bool {
        *self == HidState::default()
    }
}
