//! Bridge and script errors

use super::entity::GameObjectHandle;
use crate::foundation::math::MathError;
use crate::native::{NativeError, NativeHandle};
use thiserror::Error;

/// Errors returned by scene operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The handle was destroyed or never issued
    #[error("invalid handle {0}")]
    InvalidHandle(GameObjectHandle),

    /// The GameObject has no live component of the requested type
    #[error("component {component} not found on {handle}")]
    ComponentNotFound {
        /// GameObject queried
        handle: GameObjectHandle,
        /// Requested component type name
        component: &'static str,
    },

    /// A component of this type is already attached
    #[error("component {component} is already attached to {handle}")]
    AlreadyAttached {
        /// Target GameObject
        handle: GameObjectHandle,
        /// Component type name
        component: &'static str,
    },

    /// The native engine could not allocate another GameObject
    #[error("native engine refused to allocate a GameObject (capacity {capacity})")]
    AllocationFailure {
        /// Live object limit reported by the engine
        capacity: usize,
    },

    /// A math operation on native data failed
    #[error(transparent)]
    Math(#[from] MathError),

    /// A native call failed for a reason the bridge cannot map
    #[error("native call {call} failed: {source}")]
    Native {
        /// Native entry point
        call: &'static str,
        /// Engine-reported failure
        source: NativeError,
    },
}

impl BridgeError {
    /// Wrap a native failure from `call`
    pub(crate) fn native(call: &'static str) -> impl FnOnce(NativeError) -> Self {
        move |source| match source {
            NativeError::CapacityExceeded { capacity } => Self::AllocationFailure { capacity },
            source => Self::Native { call, source },
        }
    }

    /// Whether this is [`BridgeError::InvalidHandle`]
    pub const fn is_invalid_handle(&self) -> bool {
        matches!(self, Self::InvalidHandle(_))
    }

    /// Whether this is [`BridgeError::ComponentNotFound`]
    pub const fn is_component_not_found(&self) -> bool {
        matches!(self, Self::ComponentNotFound { .. })
    }
}

/// Result of a scene operation
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failure returned from a lifecycle callback
///
/// Callback failures never escape the frame; the driver logs them and moves
/// on to the next component.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// A scene operation failed
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// A math operation failed
    #[error(transparent)]
    Math(#[from] MathError),

    /// Script-defined failure
    #[error("{0}")]
    Message(String),
}

impl ScriptError {
    /// Script-defined failure with a message
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Result of a lifecycle callback
pub type ScriptResult<T = ()> = Result<T, ScriptError>;

/// Like [`BridgeError::native`], but an unknown `native` handle is reported
/// as `InvalidHandle(handle)`
pub(crate) fn map_transform_error(
    call: &'static str,
    handle: GameObjectHandle,
    native: NativeHandle,
) -> impl FnOnce(NativeError) -> BridgeError {
    move |source| match source {
        NativeError::UnknownHandle(h) if h == native => BridgeError::InvalidHandle(handle),
        source => BridgeError::native(call)(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_maps_to_allocation_failure() {
        let err = BridgeError::native("GameObject_Create")(NativeError::CapacityExceeded { capacity: 4 });
        assert_eq!(err, BridgeError::AllocationFailure { capacity: 4 });
    }

    #[test]
    fn test_script_error_wraps_math() {
        let err: ScriptError = MathError::ZeroMagnitude.into();
        assert!(matches!(err, ScriptError::Math(MathError::ZeroMagnitude)));
        assert_eq!(ScriptError::msg("boom").to_string(), "boom");
    }
}
