//! Per-frame input.
//!
//! A frontend turns whatever its platform delivers into two things:
//!
//! - [`PlatformEvent`]s (quit, focus changes), drained between frames
//! - one [`InputSnapshot`] per frame: which keys are held, which went down
//!   since the previous poll, and the captured pointer delta
//!
//! [`Controls`] map a snapshot to a [`ShipIntent`] for each player.

use std::collections::VecDeque;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::Viewport;
use crate::entity::{Direction, ShipId};

/// A named key the game reacts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Space,
    C,
    O,
    P,
    N,
    M,
    K,
    L,
    Escape,
    /// Button that captures the pointer while held
    Capture,
}

bitflags! {
    /// Set of keys, one bit per [`Key`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Keys: u32 {
        /// Up arrow
        const UP = 1 << 0;
        /// Down arrow
        const DOWN = 1 << 1;
        /// Left arrow
        const LEFT = 1 << 2;
        /// Right arrow
        const RIGHT = 1 << 3;
        /// W
        const W = 1 << 4;
        /// A
        const A = 1 << 5;
        /// S
        const S = 1 << 6;
        /// D
        const D = 1 << 7;
        /// Space bar
        const SPACE = 1 << 8;
        /// C
        const C = 1 << 9;
        /// O
        const O = 1 << 10;
        /// P
        const P = 1 << 11;
        /// N
        const N = 1 << 12;
        /// M
        const M = 1 << 13;
        /// K (save)
        const K = 1 << 14;
        /// L (load)
        const L = 1 << 15;
        /// Escape (quit)
        const ESCAPE = 1 << 16;
        /// Pointer capture button
        const CAPTURE = 1 << 17;
    }
}

impl From<Key> for Keys {
    fn from(key: Key) -> Self {
        match key {
            Key::Up => Self::UP,
            Key::Down => Self::DOWN,
            Key::Left => Self::LEFT,
            Key::Right => Self::RIGHT,
            Key::W => Self::W,
            Key::A => Self::A,
            Key::S => Self::S,
            Key::D => Self::D,
            Key::Space => Self::SPACE,
            Key::C => Self::C,
            Key::O => Self::O,
            Key::P => Self::P,
            Key::N => Self::N,
            Key::M => Self::M,
            Key::K => Self::K,
            Key::L => Self::L,
            Key::Escape => Self::ESCAPE,
            Key::Capture => Self::CAPTURE,
        }
    }
}

/// Key state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Keys currently down
    pub held: Keys,
    /// Keys that went down since the previous snapshot
    pub pressed: Keys,
    /// Pointer movement since the previous snapshot, while captured
    pub pointer_delta: Option<Vec2>,
}

impl InputSnapshot {
    /// Snapshot with `keys` held and freshly pressed.
    #[must_use]
    pub fn pressing(keys: Keys) -> Self {
        Self {
            held: keys,
            pressed: keys,
            pointer_delta: None,
        }
    }

    /// Snapshot with `keys` held since an earlier frame.
    #[must_use]
    pub fn holding(keys: Keys) -> Self {
        Self {
            held: keys,
            pressed: Keys::empty(),
            pointer_delta: None,
        }
    }

    /// `true` if any of `keys` is held.
    #[must_use]
    pub fn is_held(&self, keys: Keys) -> bool {
        self.held.intersects(keys)
    }

    /// `true` if any of `keys` went down this frame.
    #[must_use]
    pub fn was_pressed(&self, keys: Keys) -> bool {
        self.pressed.intersects(keys)
    }
}

/// What one ship should do this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipIntent {
    /// Movement flags
    pub directions: Direction,
    /// Fire a bullet
    pub fire: bool,
    /// Quarter turn counter-clockwise
    pub rotate_left: bool,
    /// Quarter turn clockwise
    pub rotate_right: bool,
}

/// Key bindings of one player.
///
/// Movement and fire act while held; rotation acts once per key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Move up
    pub forward: Keys,
    /// Move down
    pub backward: Keys,
    /// Move left
    pub left: Keys,
    /// Move right
    pub right: Keys,
    /// Fire
    pub fire: Keys,
    /// Rotate counter-clockwise
    pub rotate_left: Keys,
    /// Rotate clockwise
    pub rotate_right: Keys,
}

impl Controls {
    /// Arrow keys, Space, O/P.
    pub const PLAYER1: Self = Self {
        forward: Keys::UP,
        backward: Keys::DOWN,
        left: Keys::LEFT,
        right: Keys::RIGHT,
        fire: Keys::SPACE,
        rotate_left: Keys::O,
        rotate_right: Keys::P,
    };

    /// W/A/S/D, C, N/M.
    pub const PLAYER2: Self = Self {
        forward: Keys::W,
        backward: Keys::S,
        left: Keys::A,
        right: Keys::D,
        fire: Keys::C,
        rotate_left: Keys::N,
        rotate_right: Keys::M,
    };

    /// Default bindings for `ship`.
    #[must_use]
    pub const fn for_ship(ship: ShipId) -> Self {
        match ship {
            ShipId::Player1 => Self::PLAYER1,
            ShipId::Player2 => Self::PLAYER2,
        }
    }

    /// Reads this player's intent from a snapshot.
    #[must_use]
    pub fn intent(&self, snapshot: &InputSnapshot) -> ShipIntent {
        let mut directions = Direction::empty();
        directions.set(Direction::FORWARD, snapshot.is_held(self.forward));
        directions.set(Direction::BACKWARD, snapshot.is_held(self.backward));
        directions.set(Direction::LEFT, snapshot.is_held(self.left));
        directions.set(Direction::RIGHT, snapshot.is_held(self.right));
        ShipIntent {
            directions,
            fire: snapshot.is_held(self.fire),
            rotate_left: snapshot.was_pressed(self.rotate_left),
            rotate_right: snapshot.was_pressed(self.rotate_right),
        }
    }
}

/// Window-level notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformEvent {
    /// The user closed the game
    Quit,
    /// The window was minimized or lost focus; frames pause
    Deactivated,
    /// The window came back, possibly at a new size; frames resume
    Restored {
        /// Drawable area after the restore
        viewport: Viewport,
    },
}

/// Source of platform events and per-frame key state.
pub trait InputSource {
    /// Next pending platform event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<PlatformEvent>;

    /// Key state for the current frame.
    fn snapshot(&mut self) -> InputSnapshot;
}

/// Input replayed from prepared queues.
///
/// Once the snapshot queue runs dry every further frame sees no keys.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: VecDeque<PlatformEvent>,
    snapshots: VecDeque<InputSnapshot>,
}

impl ScriptedInput {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a platform event.
    pub fn push_event(&mut self, event: PlatformEvent) {
        self.events.push_back(event);
    }

    /// Queues the key state of one frame.
    pub fn push_snapshot(&mut self, snapshot: InputSnapshot) {
        self.snapshots.push_back(snapshot);
    }

    /// Frames still queued.
    #[must_use]
    pub fn pending_snapshots(&self) -> usize {
        self.snapshots.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.events.pop_front()
    }

    fn snapshot(&mut self) -> InputSnapshot {
        self.snapshots.pop_front().unwrap_or_default()
    }
}
