//! Generational arena for entity collections.
//!
//! Every dynamic entity collection in the world (crates, pickups, enemies,
//! player bullets, each enemy's bullets) is an [`Arena<T>`]. Entities are
//! addressed by a [`Handle<T>`] that pairs a slot index with the slot's
//! generation:
//!
//! - Removing an entity bumps its slot's generation, so every outstanding
//!   handle to it stops resolving. A stale handle can never reach a newer
//!   entity that reused the slot.
//! - Slots never move, so removing an entity mid-iteration (via
//!   [`Arena::retain`]) leaves all other handles valid.
//! - Iteration walks slots in index order, which keeps every pass over a
//!   collection deterministic for a given sequence of spawns and despawns.
//!
//! # Example
//!
//! ```
//! use duelwing_core::arena::Arena;
//!
//! let mut bullets: Arena<&str> = Arena::new();
//! let first = bullets.spawn("first");
//! let second = bullets.spawn("second");
//!
//! assert_eq!(bullets.despawn(first), Some("first"));
//! assert!(bullets.get(first).is_none());
//!
//! // The freed slot is reused, but the old handle stays dead.
//! let third = bullets.spawn("third");
//! assert!(bullets.get(first).is_none());
//! assert_eq!(bullets.get(third), Some(&"third"));
//! assert_eq!(bullets.get(second), Some(&"second"));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

// =============================================================================
// Handle
// =============================================================================

/// Generation-checked reference to a value stored in an [`Arena<T>`].
///
/// Handles are `Copy` and typed by the collection they came from, so a
/// bullet handle cannot be used to look up an enemy.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Handle<T> {
    index: u32,
    generation: u32,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Returns the slot index this handle points at.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.index, self.generation).cmp(&(other.index, other.generation))
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Arena
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Index-stable storage with generation-checked handles.
///
/// Freed slots are reused last-in first-out, so the slot layout (and with it
/// iteration order) depends only on the sequence of spawns and despawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value` and returns its handle.
    pub fn spawn(&mut self, value: T) -> Handle<T> {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Handle::new(index, slot.generation);
        }

        let handle = Self::handle_at(self.slots.len(), 0);
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        handle
    }

    /// Removes the value behind `handle`, invalidating the handle.
    ///
    /// Returns `None` if the handle is stale or was never issued here.
    pub fn despawn(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    /// Returns a reference to the value behind `handle`, if still live.
    #[must_use]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Returns a mutable reference to the value behind `handle`, if still live.
    #[must_use]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Returns `true` if `handle` still resolves to a value.
    #[must_use]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Iterates live values with their handles in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (Self::handle_at(index, slot.generation), value))
        })
    }

    /// Iterates live values mutably with their handles in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (Self::handle_at(index, generation), value))
        })
    }

    /// Iterates live values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }

    /// Iterates live values mutably in slot order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.slots.iter_mut().filter_map(|slot| slot.value.as_mut())
    }

    /// Iterates the handles of all live values in slot order.
    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        self.iter().map(|(handle, _)| handle)
    }

    /// Removes every value for which `keep` returns `false`.
    ///
    /// Returns the number of values removed. Handles to kept values remain
    /// valid.
    pub fn retain(&mut self, mut keep: impl FnMut(Handle<T>, &mut T) -> bool) -> usize {
        let mut removed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let generation = slot.generation;
            let Some(value) = slot.value.as_mut() else {
                continue;
            };
            if !keep(Self::handle_at(index, generation), value) {
                slot.value = None;
                slot.generation = generation.wrapping_add(1);
                #[allow(clippy::cast_possible_truncation)]
                self.free.push(index as u32);
                removed += 1;
            }
        }
        self.len -= removed;
        removed
    }

    /// Removes every value, invalidating all handles.
    pub fn clear(&mut self) {
        self.retain(|_, _| false);
    }

    /// Returns the number of live values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Entity counts stay in the dozens; u32 slot indices never truncate.
    #[allow(clippy::cast_possible_truncation)]
    const fn handle_at(index: usize, generation: u32) -> Handle<T> {
        Handle::new(index as u32, generation)
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
