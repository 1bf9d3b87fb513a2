//! Component trait and type identity
//!
//! A component is any `'static` type with a declared [`Component::TYPE_NAME`].
//! The name, not the Rust type, is the component's identity across the
//! bridge: it is hashed into a [`ComponentTypeId`] for slot lookup and handed
//! to the native engine as a [`TypeTag`].
//!
//! Lifecycle callbacks are default methods. A component opts into the ones it
//! implements through [`Component::HOOKS`]; phases not listed there are never
//! dispatched to it.

use super::context::ScriptContext;
use super::error::ScriptResult;
use super::lifecycle::Phase;
use crate::native::TypeTag;
use std::any::Any;
use std::fmt;

bitflags::bitflags! {
    /// Set of lifecycle callbacks a component wants to receive
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LifecycleHooks: u8 {
        /// Receive `awake`
        const AWAKE = 1 << 0;
        /// Receive `start`
        const START = 1 << 1;
        /// Receive `update`
        const UPDATE = 1 << 2;
        /// Receive `fixed_update`
        const FIXED_UPDATE = 1 << 3;
        /// Receive `late_update`
        const LATE_UPDATE = 1 << 4;
        /// Receive `on_destroy`
        const ON_DESTROY = 1 << 5;
        /// Receive `on_enable`
        const ON_ENABLE = 1 << 6;
        /// Receive `on_disable`
        const ON_DISABLE = 1 << 7;
    }
}

/// Stable identifier for a component type
///
/// FNV-1a hash of the declared type name, so it is identical across builds
/// and matches the id the native engine receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentTypeId(u64);

impl ComponentTypeId {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    /// Id for a declared type name
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Id of a component type
    pub const fn of<T: Component>() -> Self {
        Self::from_name(T::TYPE_NAME)
    }

    /// Raw hash value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Native tag for a component type
pub(crate) const fn type_tag<T: Component>() -> TypeTag {
    TypeTag {
        id: ComponentTypeId::of::<T>().raw(),
        name: T::TYPE_NAME,
    }
}

/// A script component attached to a GameObject
///
/// ```
/// use script_bridge::prelude::*;
///
/// #[derive(Default)]
/// struct Spinner {
///     speed: f32,
/// }
///
/// impl Component for Spinner {
///     const TYPE_NAME: &'static str = "Spinner";
///     const HOOKS: LifecycleHooks = LifecycleHooks::UPDATE;
///
///     fn update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
///         let step = Quaternion::from_axis_angle(Vector3::UP, self.speed * ctx.delta_time())?;
///         ctx.transform()?.rotate(step)?;
///         Ok(())
///     }
/// }
/// ```
pub trait Component: Any {
    /// Name that identifies this component type
    const TYPE_NAME: &'static str;

    /// Callbacks this component receives
    const HOOKS: LifecycleHooks = LifecycleHooks::empty();

    /// Called once, immediately after the component is attached
    fn awake(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        Ok(())
    }

    /// Called once before the component's first `update`
    fn start(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        Ok(())
    }

    /// Called every frame
    fn update(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        Ok(())
    }

    /// Called once per fixed step
    fn fixed_update(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        Ok(())
    }

    /// Called every frame after `update` and `fixed_update`
    fn late_update(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        Ok(())
    }

    /// Called once when the component or its GameObject goes away
    fn on_destroy(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        Ok(())
    }

    /// Called when the component is re-enabled
    fn on_enable(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        Ok(())
    }

    /// Called when the component is disabled
    fn on_disable(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        Ok(())
    }
}

/// Object-safe view of a [`Component`] used by the slot arena
pub(crate) trait ErasedComponent: Any {
    fn invoke(&mut self, phase: Phase, ctx: &mut ScriptContext<'_>) -> ScriptResult;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedComponent for T {
    fn invoke(&mut self, phase: Phase, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        match phase {
            Phase::Awake => self.awake(ctx),
            Phase::Start => self.start(ctx),
            Phase::Update => self.update(ctx),
            Phase::FixedUpdate => self.fixed_update(ctx),
            Phase::LateUpdate => self.late_update(ctx),
            Phase::OnDestroy => self.on_destroy(ctx),
            Phase::OnEnable => self.on_enable(ctx),
            Phase::OnDisable => self.on_disable(ctx),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    impl Component for Marker {
        const TYPE_NAME: &'static str = "Marker";
    }

    #[test]
    fn test_type_id_is_fnv1a_of_name() {
        // Reference values for 64-bit FNV-1a
        assert_eq!(ComponentTypeId::from_name("").raw(), 0xcbf2_9ce4_8422_2325);
        assert_eq!(ComponentTypeId::from_name("a").raw(), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(ComponentTypeId::of::<Marker>(), ComponentTypeId::from_name("Marker"));
        assert_ne!(ComponentTypeId::from_name("Marker"), ComponentTypeId::from_name("marker"));
    }

    #[test]
    fn test_default_hooks_are_empty() {
        assert!(Marker::HOOKS.is_empty());
        let tag = type_tag::<Marker>();
        assert_eq!(tag.name, "Marker");
        assert_eq!(tag.id, ComponentTypeId::of::<Marker>().raw());
    }
}
