//! Keyboard and mouse input from crossterm events.
//!
//! Classic terminals report key presses and OS auto-repeat but no releases.
//! A key therefore counts as held while its last press or repeat arrived
//! within [`HOLD_WINDOW`] snapshots. Terminals with the keyboard enhancement
//! protocol also report releases, which drop the key at once.
//!
//! Mouse capture maps onto [`Key::Capture`]: holding the left button
//! captures the pointer and drags report a pointer delta in pixels.

use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::Receiver;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use duelwing_core::input::{InputSnapshot, InputSource, Key, Keys, PlatformEvent};
use glam::Vec2;

use crate::surface::CellSize;

/// Snapshots a key stays held after its last press or repeat.
pub const HOLD_WINDOW: u64 = 4;

/// Game key for a terminal key code.
#[must_use]
pub fn key_for(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
            'w' => Key::W,
            'a' => Key::A,
            's' => Key::S,
            'd' => Key::D,
            ' ' => Key::Space,
            'c' => Key::C,
            'o' => Key::O,
            'p' => Key::P,
            'n' => Key::N,
            'm' => Key::M,
            'k' => Key::K,
            'l' => Key::L,
            _ => return None,
        },
        _ => return None,
    };
    Some(key)
}

/// Turns terminal events into platform events and per-frame key state.
#[derive(Debug)]
pub struct KeyTracker {
    cell: CellSize,
    size: (u16, u16),
    snapshot: u64,
    last_seen: HashMap<Key, u64>,
    fresh: Keys,
    previous_held: Keys,
    pointer: Option<(u16, u16)>,
    pointer_delta: Vec2,
}

impl KeyTracker {
    /// Creates a tracker for a terminal of `size` columns and rows.
    #[must_use]
    pub fn new(cell: CellSize, size: (u16, u16)) -> Self {
        Self {
            cell,
            size,
            snapshot: 0,
            last_seen: HashMap::new(),
            fresh: Keys::empty(),
            previous_held: Keys::empty(),
            pointer: None,
            pointer_delta: Vec2::ZERO,
        }
    }

    /// Records one terminal event, returning the platform event it implies.
    pub fn record(&mut self, event: &Event) -> Option<PlatformEvent> {
        match event {
            Event::Key(key) => self.record_key(key),
            Event::Mouse(mouse) => {
                self.record_mouse(mouse);
                None
            }
            Event::FocusLost => Some(PlatformEvent::Deactivated),
            Event::FocusGained => Some(self.restored()),
            Event::Resize(cols, rows) => {
                self.size = (*cols, *rows);
                Some(self.restored())
            }
            _ => None,
        }
    }

    fn restored(&self) -> PlatformEvent {
        let (cols, rows) = self.size;
        PlatformEvent::Restored {
            viewport: self.cell.viewport(cols, rows),
        }
    }

    fn record_key(&mut self, event: &KeyEvent) -> Option<PlatformEvent> {
        if event.kind == KeyEventKind::Press
            && event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(event.code, KeyCode::Char('c' | 'C'))
        {
            return Some(PlatformEvent::Quit);
        }
        let key = key_for(event.code)?;
        match event.kind {
            KeyEventKind::Press => {
                self.last_seen.insert(key, self.snapshot);
                self.fresh |= Keys::from(key);
            }
            KeyEventKind::Repeat => {
                self.last_seen.insert(key, self.snapshot);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&key);
            }
        }
        None
    }

    fn record_mouse(&mut self, event: &MouseEvent) {
        let at = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer = Some(at);
                self.last_seen.insert(Key::Capture, u64::MAX);
                self.fresh |= Keys::CAPTURE;
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((col, row)) = self.pointer {
                    let cols = f32::from(event.column) - f32::from(col);
                    let rows = f32::from(event.row) - f32::from(row);
                    #[allow(clippy::cast_precision_loss)]
                    let step = Vec2::new(self.cell.width as f32, self.cell.height as f32);
                    self.pointer_delta += Vec2::new(cols, rows) * step;
                }
                self.pointer = Some(at);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pointer = None;
                self.last_seen.remove(&Key::Capture);
            }
            _ => {}
        }
    }

    fn held(&self) -> Keys {
        self.last_seen
            .iter()
            .filter(|(_, &seen)| seen == u64::MAX || self.snapshot.saturating_sub(seen) <= HOLD_WINDOW)
            .fold(Keys::empty(), |keys, (&key, _)| keys | Keys::from(key))
    }

    /// Key state since the previous snapshot.
    ///
    /// A key counts as pressed when a press arrived and it was not already
    /// held, so auto-repeat on classic terminals does not re-trigger it.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let held = self.held() | self.fresh;
        let pressed = self.fresh - self.previous_held;
        let captured = held.contains(Keys::CAPTURE);
        let pointer_delta = captured.then_some(self.pointer_delta);

        self.previous_held = held;
        self.fresh = Keys::empty();
        self.pointer_delta = Vec2::ZERO;
        self.snapshot += 1;

        InputSnapshot {
            held,
            pressed,
            pointer_delta,
        }
    }
}

/// Input source fed by a terminal event reader thread.
pub struct TerminalInput {
    events: Receiver<Event>,
    tracker: KeyTracker,
    pending: VecDeque<PlatformEvent>,
}

impl TerminalInput {
    /// Reads events from `events`, sent by the reader thread.
    #[must_use]
    pub fn new(events: Receiver<Event>, cell: CellSize, size: (u16, u16)) -> Self {
        Self {
            events,
            tracker: KeyTracker::new(cell, size),
            pending: VecDeque::new(),
        }
    }

    fn drain(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if let Some(platform) = self.tracker.record(&event) {
                tracing::debug!(?platform, "platform event");
                self.pending.push_back(platform);
            }
        }
    }
}

impl InputSource for TerminalInput {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.drain();
        self.pending.pop_front()
    }

    fn snapshot(&mut self) -> InputSnapshot {
        self.drain();
        self.tracker.snapshot()
    }
}
