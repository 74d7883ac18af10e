//! Core type definitions shared by the tracker and its hosts.

use std::fmt;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Identifier of an object in the simulation's object registry.
///
/// Raw value `0` is reserved as [`ObjectId::INVALID`], the "no object"
/// sentinel written to saves when a reference is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// The "no object" sentinel.
    pub const INVALID: Self = Self(0);

    /// Wrap a raw registry id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw registry value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether this id refers to an object at all.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "object:{}", self.0)
        } else {
            write!(f, "object:invalid")
        }
    }
}

// ---------------------------------------------------------------------------
// Level Change
// ---------------------------------------------------------------------------

/// An edge in an actor's veterancy level, reported once per changing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    /// Level before the call.
    pub old: u32,
    /// Level after the call.
    pub new: u32,
}

impl LevelChange {
    /// Build a change record, or `None` when the level did not move.
    #[must_use]
    pub fn between(old: u32, new: u32) -> Option<Self> {
        (old != new).then_some(Self { old, new })
    }

    /// Whether the change lost levels.
    #[must_use]
    pub fn is_demotion(self) -> bool {
        self.new < self.old
    }
}
