//! GameObject handles

use slotmap::Key;
use std::fmt;

slotmap::new_key_type! {
    /// Arena key behind a [`GameObjectHandle`]
    pub(crate) struct ObjectKey;
}

/// Opaque, generational reference to a GameObject
///
/// A handle stays comparable and hashable after its object is destroyed, but
/// every scene operation on it then fails with `InvalidHandle`. Slots are
/// reused with a new generation, so a stale handle never aliases a newer
/// object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameObjectHandle {
    key: ObjectKey,
}

impl GameObjectHandle {
    pub(crate) const fn new(key: ObjectKey) -> Self {
        Self { key }
    }

    pub(crate) const fn key(self) -> ObjectKey {
        self.key
    }

    /// Packed index and generation, stable for the lifetime of the process
    pub fn to_bits(self) -> u64 {
        self.key.data().as_ffi()
    }
}

impl fmt::Display for GameObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameObject({:?})", self.key.data())
    }
}
