//! Keyboard input as a queue of discrete key transitions.
//!
//! The window event handler pushes every game-relevant key-down / key-up into
//! an [`InputQueue`]. The main loop drains the queue at the start of each
//! fixed simulation step, in arrival order, so the world sees exactly the
//! transitions that happened since the previous step. Events are only removed
//! by a step, which means a press landing on a frame with zero simulation
//! steps is carried over instead of lost.
//!
//! [`KeyState`] is the level-triggered view the game loop reads: whether the
//! left/right movement keys are currently held, plus the last direction that
//! was pressed.

use serde::Deserialize;
use std::collections::VecDeque;

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    /// Move left.
    A,
    /// Move right.
    D,
    /// Jump.
    W,
}

impl Key {
    /// Map a DOM-style key code. 65 'A', 68 'D', 87 'W'; everything else is ignored.
    pub fn from_key_code(code: u32) -> Option<Key> {
        match code {
            65 => Some(Key::A),
            68 => Some(Key::D),
            87 => Some(Key::W),
            _ => None,
        }
    }

    pub fn key_code(self) -> u32 {
        match self {
            Key::A => 65,
            Key::D => 68,
            Key::W => 87,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Down,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Up,
        }
    }
}

/// FIFO mailbox between the window event handler and the simulation.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<KeyEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: KeyEvent) {
        log::trace!("Queued {:?} {:?}", event.key, event.action);
        self.events.push_back(event);
    }

    /// Remove and return all pending events, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = KeyEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Horizontal movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFlag {
    pub pressed: bool,
}

/// Held state of the movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: KeyFlag,
    pub right: KeyFlag,
    /// Direction of the most recent movement key-down. Not cleared on key-up.
    pub last_direction: Option<Direction>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a movement key transition. Jump is not a held key and is ignored here.
    pub fn apply(&mut self, event: KeyEvent) {
        let pressed = event.action == KeyAction::Down;
        match event.key {
            Key::A => {
                self.left.pressed = pressed;
                if pressed {
                    self.last_direction = Some(Direction::Left);
                }
            }
            Key::D => {
                self.right.pressed = pressed;
                if pressed {
                    self.last_direction = Some(Direction::Right);
                }
            }
            Key::W => {}
        }
    }
}
