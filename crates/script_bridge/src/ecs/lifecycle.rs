//! Lifecycle phases and per-slot states

use super::component::LifecycleHooks;
use std::fmt;

/// A lifecycle callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Once, when the component is attached
    Awake,
    /// Once, before the component's first Update
    Start,
    /// Every frame
    Update,
    /// Zero or more times per frame, on the fixed step
    FixedUpdate,
    /// Every frame, after Update and FixedUpdate
    LateUpdate,
    /// Once, when the component or its GameObject is destroyed
    OnDestroy,
    /// When a disabled component is enabled
    OnEnable,
    /// When an enabled component is disabled
    OnDisable,
}

impl Phase {
    /// Hook flag a component must declare to receive this phase
    pub const fn hook(self) -> LifecycleHooks {
        match self {
            Self::Awake => LifecycleHooks::AWAKE,
            Self::Start => LifecycleHooks::START,
            Self::Update => LifecycleHooks::UPDATE,
            Self::FixedUpdate => LifecycleHooks::FIXED_UPDATE,
            Self::LateUpdate => LifecycleHooks::LATE_UPDATE,
            Self::OnDestroy => LifecycleHooks::ON_DESTROY,
            Self::OnEnable => LifecycleHooks::ON_ENABLE,
            Self::OnDisable => LifecycleHooks::ON_DISABLE,
        }
    }

    /// Callback name as scripts know it
    pub const fn name(self) -> &'static str {
        match self {
            Self::Awake => "Awake",
            Self::Start => "Start",
            Self::Update => "Update",
            Self::FixedUpdate => "FixedUpdate",
            Self::LateUpdate => "LateUpdate",
            Self::OnDestroy => "OnDestroy",
            Self::OnEnable => "OnEnable",
            Self::OnDisable => "OnDisable",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a component slot is in its lifecycle
///
/// States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    /// Attached, Awake not yet delivered
    Uninitialized,
    /// Awake delivered, waiting for the next Start pass
    AwakeDone,
    /// Start delivered, waiting for the first Update
    Started,
    /// Receiving per-frame callbacks
    Active,
    /// OnDestroy delivered; no further callbacks
    Destroyed,
}

impl LifecycleState {
    /// Whether per-frame callbacks are delivered in this state
    pub const fn is_ticking(self) -> bool {
        matches!(self, Self::Started | Self::Active)
    }
}
