//! Host input model
//!
//! The host polls its window/event backend once per frame and hands the core
//! an `InputSnapshot`. The core never talks to the OS directly.

use std::collections::HashSet;

use glam::Vec2;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Space,
    Backspace,
    /// 0..=9
    Digit(u8),
    /// Anything else; still counts as "any input"
    Other,
}

/// Pointer activity, in output pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(Vec2),
    Pressed(Vec2),
    Released(Vec2),
}

/// Everything that happened since the previous frame
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// OS close request
    pub quit_requested: bool,
    /// Keys currently held
    pub keys_down: HashSet<Key>,
    /// Keys that went down this frame, in event order
    pub keys_pressed: Vec<Key>,
    pub pointer: Vec<PointerEvent>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot with only an OS quit request
    pub fn quit() -> Self {
        Self {
            quit_requested: true,
            ..Self::default()
        }
    }

    /// Builder: key went down this frame (and is held)
    pub fn press(mut self, key: Key) -> Self {
        self.keys_pressed.push(key);
        self.keys_down.insert(key);
        self
    }

    /// Builder: key held from an earlier frame
    pub fn hold(mut self, key: Key) -> Self {
        self.keys_down.insert(key);
        self
    }

    /// Builder: pointer press at `pos`
    pub fn click(mut self, pos: Vec2) -> Self {
        self.pointer.push(PointerEvent::Pressed(pos));
        self
    }

    /// Builder: type a number as digit key presses
    pub fn type_number(mut self, n: u32) -> Self {
        for c in n.to_string().chars() {
            if let Some(d) = c.to_digit(10) {
                self = self.press(Key::Digit(d as u8));
            }
        }
        self
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn held(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Pointer presses this frame
    pub fn clicks(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.pointer.iter().filter_map(|e| match e {
            PointerEvent::Pressed(p) => Some(*p),
            _ => None,
        })
    }

    /// A key press or pointer press; pointer motion alone does not count
    pub fn any_input(&self) -> bool {
        !self.keys_pressed.is_empty() || self.clicks().next().is_some()
    }

    /// -1, 0 or 1 from the held arrow keys
    pub fn horizontal(&self) -> i8 {
        let left = self.held(Key::Left) as i8;
        let right = self.held(Key::Right) as i8;
        right - left
    }
}
