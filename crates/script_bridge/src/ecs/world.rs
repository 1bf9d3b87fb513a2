//! Scene: GameObject registry and component slot arena
//!
//! The scene maps [`GameObjectHandle`]s to native entities and owns every
//! script instance. Components live in per-object slots, in attach order,
//! and are found by [`ComponentTypeId`]. Slots never point back at their
//! owner and proxies are looked up by handle on demand.
//!
//! Destruction is two-step. `destroy` and `remove_component` invalidate
//! immediately and queue the work; OnDestroy and the native release run when
//! no callback is executing, either right away or as soon as the running
//! callback returns.

use super::component::{type_tag, Component, ComponentTypeId, ErasedComponent, LifecycleHooks};
use super::components::{Transform, TransformProxy};
use super::context::ScriptContext;
use super::entity::{GameObjectHandle, ObjectKey};
use super::error::{BridgeError, BridgeResult};
use super::lifecycle::{LifecycleState, Phase};
use crate::core::config::RegistryConfig;
use crate::foundation::time::FrameTime;
use crate::input::InputSnapshot;
use crate::native::{ComponentRef, NativeEngine, NativeError, NativeHandle};
use slotmap::SlotMap;
use std::any::Any;
use std::collections::{HashSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};

const LOG_TARGET: &str = "script_bridge::scene";

struct ComponentSlot {
    serial: u64,
    type_id: ComponentTypeId,
    type_name: &'static str,
    component_ref: ComponentRef,
    /// `None` while the instance's own callback is running
    instance: Option<Box<dyn ErasedComponent>>,
    hooks: LifecycleHooks,
    state: LifecycleState,
    enabled: bool,
    detached: bool,
}

impl ComponentSlot {
    fn is_attached(&self) -> bool {
        !self.detached && self.state != LifecycleState::Destroyed
    }
}

struct GameObjectEntry {
    native: NativeHandle,
    slots: Vec<ComponentSlot>,
    destroy_queued: bool,
}

enum PendingDestroy {
    Object(ObjectKey),
    Component(SlotTarget),
}

/// One component slot, addressed independently of its type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotTarget {
    key: ObjectKey,
    serial: u64,
}

/// Lifecycle view of a slot used by the driver
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotStatus {
    pub state: LifecycleState,
    pub enabled: bool,
    pub hooks: LifecycleHooks,
}

/// Callback counters for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Callbacks delivered
    pub callbacks: usize,
    /// Callbacks that returned an error or panicked
    pub faults: usize,
    /// Scheduled callbacks dropped because their target went away mid-frame
    pub skipped: usize,
    /// GameObjects destroyed during the frame
    pub destroyed: usize,
}

/// GameObjects, their components and the native engine behind them
pub struct Scene {
    native: Box<dyn NativeEngine>,
    objects: SlotMap<ObjectKey, GameObjectEntry>,
    order: Vec<ObjectKey>,
    pending: VecDeque<PendingDestroy>,
    destroyed_this_frame: HashSet<GameObjectHandle>,
    next_serial: u64,
    dispatch_depth: u32,
    flushing: bool,
    auto_attach_transform: bool,
    frame: FrameTime,
    input: InputSnapshot,
    stats: FrameStats,
}

impl Scene {
    /// Create an empty scene on top of a native engine
    pub fn new(native: Box<dyn NativeEngine>, config: &RegistryConfig) -> Self {
        Self {
            native,
            objects: SlotMap::with_capacity_and_key(config.initial_capacity),
            order: Vec::with_capacity(config.initial_capacity),
            pending: VecDeque::new(),
            destroyed_this_frame: HashSet::new(),
            next_serial: 0,
            dispatch_depth: 0,
            flushing: false,
            auto_attach_transform: config.auto_attach_transform,
            frame: FrameTime::default(),
            input: InputSnapshot::default(),
            stats: FrameStats::default(),
        }
    }

    // ---------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------

    /// Create a GameObject
    pub fn create(&mut self) -> BridgeResult<GameObjectHandle> {
        let native = self
            .native
            .game_object_create()
            .map_err(BridgeError::native("GameObject_Create"))?;
        let key = self.objects.insert(GameObjectEntry {
            native,
            slots: Vec::new(),
            destroy_queued: false,
        });
        self.order.push(key);

        let handle = GameObjectHandle::new(key);
        log::trace!(target: LOG_TARGET, "created {handle} as {native}");

        if self.auto_attach_transform {
            self.add_component::<Transform>(handle)?;
        }
        Ok(handle)
    }

    /// Destroy a GameObject and every component on it
    ///
    /// The handle is invalid as soon as this returns. Inside a callback the
    /// OnDestroy calls and the native release are deferred until the
    /// callback returns.
    pub fn destroy(&mut self, handle: GameObjectHandle) -> BridgeResult<()> {
        self.entry_mut(handle)?.destroy_queued = true;
        self.pending.push_back(PendingDestroy::Object(handle.key()));
        self.destroyed_this_frame.insert(handle);
        log::debug!(target: LOG_TARGET, "destroy queued for {handle}");
        self.flush_if_idle();
        Ok(())
    }

    /// Destroy every live GameObject
    pub fn destroy_all(&mut self) {
        let handles: Vec<_> = self.game_objects().collect();
        for handle in handles {
            if let Err(err) = self.destroy(handle) {
                log::warn!(target: LOG_TARGET, "could not destroy {handle}: {err}");
            }
        }
        self.flush_pending();
    }

    /// Whether `handle` names a live GameObject
    pub fn is_alive(&self, handle: GameObjectHandle) -> bool {
        self.entry(handle).is_ok()
    }

    /// Number of live GameObjects
    pub fn len(&self) -> usize {
        self.objects.values().filter(|entry| !entry.destroy_queued).count()
    }

    /// Whether the scene has no live GameObjects
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live GameObjects in creation order
    pub fn game_objects(&self) -> impl Iterator<Item = GameObjectHandle> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|key| self.objects.get(*key).is_some_and(|entry| !entry.destroy_queued))
            .map(GameObjectHandle::new)
    }

    /// Native entity behind a handle
    pub fn native_handle(&self, handle: GameObjectHandle) -> BridgeResult<NativeHandle> {
        Ok(self.entry(handle)?.native)
    }

    /// The native engine
    pub fn native(&self) -> &dyn NativeEngine {
        self.native.as_ref()
    }

    /// The native engine, mutably
    pub fn native_mut(&mut self) -> &mut dyn NativeEngine {
        self.native.as_mut()
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    /// Attach a default-constructed component and run its Awake
    pub fn add_component<T: Component + Default>(&mut self, handle: GameObjectHandle) -> BridgeResult<&mut T> {
        self.add_component_with(handle, T::default())
    }

    /// Attach `component` and run its Awake
    ///
    /// Fails with `AlreadyAttached` if a component of the same type is
    /// attached. If Awake removes the component or destroys its owner the
    /// corresponding error is returned instead of the component.
    pub fn add_component_with<T: Component>(
        &mut self,
        handle: GameObjectHandle,
        component: T,
    ) -> BridgeResult<&mut T> {
        let type_id = ComponentTypeId::of::<T>();
        let entry = self.entry(handle)?;
        if entry.slots.iter().any(|slot| slot.type_id == type_id && slot.is_attached()) {
            return Err(BridgeError::AlreadyAttached {
                handle,
                component: T::TYPE_NAME,
            });
        }
        let native_handle = entry.native;

        let component_ref = self
            .native
            .game_object_add_component(native_handle, type_tag::<T>())
            .map_err(|err| match err {
                NativeError::ComponentAlreadyPresent { .. } => BridgeError::AlreadyAttached {
                    handle,
                    component: T::TYPE_NAME,
                },
                err => BridgeError::native("GameObject_AddComponent")(err),
            })?;

        let serial = self.next_serial;
        self.next_serial += 1;
        self.entry_mut(handle)?.slots.push(ComponentSlot {
            serial,
            type_id,
            type_name: T::TYPE_NAME,
            component_ref,
            instance: Some(Box::new(component)),
            hooks: T::HOOKS,
            state: LifecycleState::Uninitialized,
            enabled: true,
            detached: false,
        });
        log::trace!(target: LOG_TARGET, "attached {} to {handle}", T::TYPE_NAME);

        let target = SlotTarget {
            key: handle.key(),
            serial,
        };
        self.dispatch(target, Phase::Awake);
        if let Some(slot) = self.slot_mut(target) {
            if slot.state == LifecycleState::Uninitialized {
                slot.state = LifecycleState::AwakeDone;
            }
        }

        self.get_component_mut::<T>(handle)
    }

    /// Component of type `T` on `handle`
    ///
    /// A component whose own callback is running is not reachable and
    /// reports `ComponentNotFound`.
    pub fn get_component<T: Component>(&self, handle: GameObjectHandle) -> BridgeResult<&T> {
        self.attached_slot::<T>(handle)?
            .instance
            .as_deref()
            .and_then(|instance| instance.as_any().downcast_ref::<T>())
            .ok_or(BridgeError::ComponentNotFound {
                handle,
                component: T::TYPE_NAME,
            })
    }

    /// Component of type `T` on `handle`, mutably
    pub fn get_component_mut<T: Component>(&mut self, handle: GameObjectHandle) -> BridgeResult<&mut T> {
        self.attached_slot_mut::<T>(handle)?
            .instance
            .as_deref_mut()
            .and_then(|instance| instance.as_any_mut().downcast_mut::<T>())
            .ok_or(BridgeError::ComponentNotFound {
                handle,
                component: T::TYPE_NAME,
            })
    }

    /// Whether `get_component::<T>(handle)` would succeed
    pub fn has_component<T: Component>(&self, handle: GameObjectHandle) -> BridgeResult<bool> {
        match self.get_component::<T>(handle) {
            Ok(_) => Ok(true),
            Err(BridgeError::ComponentNotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Detach the component of type `T`; its OnDestroy runs once no
    /// callback is executing
    pub fn remove_component<T: Component>(&mut self, handle: GameObjectHandle) -> BridgeResult<()> {
        let native = self.entry(handle)?.native;
        let serial = self.attached_slot::<T>(handle)?.serial;

        self.native
            .game_object_remove_component(native, type_tag::<T>())
            .map_err(BridgeError::native("GameObject_RemoveComponent"))?;

        let target = SlotTarget {
            key: handle.key(),
            serial,
        };
        if let Some(slot) = self.slot_mut(target) {
            slot.detached = true;
        }
        self.pending.push_back(PendingDestroy::Component(target));
        log::trace!(target: LOG_TARGET, "detached {} from {handle}", T::TYPE_NAME);

        self.flush_if_idle();
        Ok(())
    }

    /// Enable or disable the component of type `T`
    ///
    /// Disabled components receive no Start, Update, FixedUpdate or
    /// LateUpdate. Transitions deliver OnEnable / OnDisable.
    pub fn set_enabled<T: Component>(&mut self, handle: GameObjectHandle, enabled: bool) -> BridgeResult<()> {
        let slot = self.attached_slot_mut::<T>(handle)?;
        if slot.enabled == enabled {
            return Ok(());
        }
        slot.enabled = enabled;
        let target = SlotTarget {
            key: handle.key(),
            serial: slot.serial,
        };

        let phase = if enabled { Phase::OnEnable } else { Phase::OnDisable };
        self.dispatch(target, phase);
        Ok(())
    }

    /// Whether the component of type `T` is enabled
    pub fn is_enabled<T: Component>(&self, handle: GameObjectHandle) -> BridgeResult<bool> {
        Ok(self.attached_slot::<T>(handle)?.enabled)
    }

    /// Engine-side reference for the component of type `T`
    pub fn component_ref<T: Component>(&self, handle: GameObjectHandle) -> BridgeResult<ComponentRef> {
        Ok(self.attached_slot::<T>(handle)?.component_ref)
    }

    /// Type names of the components attached to `handle`, in attach order
    pub fn component_names(&self, handle: GameObjectHandle) -> BridgeResult<Vec<&'static str>> {
        Ok(self
            .entry(handle)?
            .slots
            .iter()
            .filter(|slot| slot.is_attached())
            .map(|slot| slot.type_name)
            .collect())
    }

    /// Transform proxy for `handle`; requires an attached [`Transform`]
    pub fn transform(&mut self, handle: GameObjectHandle) -> BridgeResult<TransformProxy<'_>> {
        self.attached_slot::<Transform>(handle)?;
        let native_handle = self.entry(handle)?.native;
        Ok(TransformProxy::new(self.native.as_mut(), handle, native_handle))
    }

    // ---------------------------------------------------------------------
    // Frame state
    // ---------------------------------------------------------------------

    /// Timing of the current frame
    pub const fn frame(&self) -> &FrameTime {
        &self.frame
    }

    /// Input captured at the start of the current frame
    pub const fn input(&self) -> &InputSnapshot {
        &self.input
    }

    pub(crate) fn begin_frame(&mut self, frame: FrameTime, input: InputSnapshot) {
        self.frame = frame;
        self.input = input;
        self.stats = FrameStats::default();
        self.destroyed_this_frame.clear();
    }

    pub(crate) fn end_frame(&mut self) -> FrameStats {
        self.flush_pending();
        self.stats.destroyed = self.destroyed_this_frame.len();
        self.stats
    }

    pub(crate) fn note_skipped(&mut self) {
        self.stats.skipped += 1;
    }

    /// Every attached slot on a live object, in creation and attach order,
    /// with the hooks it declares
    pub(crate) fn slot_targets(&self) -> Vec<(SlotTarget, LifecycleHooks)> {
        self.order
            .iter()
            .filter_map(|&key| {
                self.objects
                    .get(key)
                    .filter(|entry| !entry.destroy_queued)
                    .map(|entry| (key, entry))
            })
            .flat_map(|(key, entry)| {
                entry
                    .slots
                    .iter()
                    .filter(|slot| slot.is_attached())
                    .map(move |slot| {
                        let target = SlotTarget {
                            key,
                            serial: slot.serial,
                        };
                        (target, slot.hooks)
                    })
            })
            .collect()
    }

    /// `None` once the slot or its owner has gone away
    pub(crate) fn slot_status(&self, target: SlotTarget) -> Option<SlotStatus> {
        if self.destroyed_this_frame.contains(&GameObjectHandle::new(target.key)) {
            return None;
        }
        let entry = self.objects.get(target.key).filter(|entry| !entry.destroy_queued)?;
        entry
            .slots
            .iter()
            .find(|slot| slot.serial == target.serial && slot.is_attached())
            .map(|slot| SlotStatus {
                state: slot.state,
                enabled: slot.enabled,
                hooks: slot.hooks,
            })
    }

    /// Advance a slot's state; never moves backwards
    pub(crate) fn set_slot_state(&mut self, target: SlotTarget, state: LifecycleState) {
        if let Some(slot) = self.slot_mut(target) {
            slot.state = slot.state.max(state);
        }
    }

    // ---------------------------------------------------------------------
    // Dispatch
    // ---------------------------------------------------------------------

    /// Run one lifecycle callback with error and panic containment
    ///
    /// Returns whether the callback was invoked.
    pub(crate) fn dispatch(&mut self, target: SlotTarget, phase: Phase) -> bool {
        let Some(slot) = self.slot_mut(target) else {
            return false;
        };
        if !slot.hooks.contains(phase.hook()) {
            return false;
        }
        let type_name = slot.type_name;
        let Some(mut instance) = slot.instance.take() else {
            log::warn!(target: LOG_TARGET, "{type_name}::{phase} skipped, instance is already running");
            return false;
        };
        let handle = GameObjectHandle::new(target.key);

        self.dispatch_depth += 1;
        let outcome = {
            let mut ctx = ScriptContext::new(self, handle, phase);
            panic::catch_unwind(AssertUnwindSafe(|| instance.invoke(phase, &mut ctx)))
        };
        self.dispatch_depth -= 1;
        self.stats.callbacks += 1;

        if phase != Phase::OnDestroy {
            if let Some(slot) = self.slot_mut(target) {
                slot.instance = Some(instance);
            }
        }

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                self.stats.faults += 1;
                log::error!(target: LOG_TARGET, "{type_name}::{phase} failed on {handle}: {err}");
            }
            Err(payload) => {
                self.stats.faults += 1;
                log::error!(
                    target: LOG_TARGET,
                    "{type_name}::{phase} panicked on {handle}: {}",
                    panic_message(payload.as_ref())
                );
            }
        }

        self.flush_if_idle();
        true
    }

    /// Complete queued destroys and removals
    ///
    /// Does nothing while a callback is executing.
    pub fn flush_pending(&mut self) {
        if self.flushing || self.dispatch_depth > 0 {
            return;
        }
        self.flushing = true;
        while let Some(pending) = self.pending.pop_front() {
            match pending {
                PendingDestroy::Object(key) => self.finish_destroy(key),
                PendingDestroy::Component(target) => self.finish_removal(target),
            }
        }
        self.flushing = false;
    }

    fn flush_if_idle(&mut self) {
        if self.dispatch_depth == 0 {
            self.flush_pending();
        }
    }

    fn finish_destroy(&mut self, key: ObjectKey) {
        let Some(entry) = self.objects.get(key) else {
            return;
        };
        let serials: Vec<u64> = entry
            .slots
            .iter()
            .filter(|slot| slot.state != LifecycleState::Destroyed)
            .map(|slot| slot.serial)
            .collect();
        for serial in serials {
            self.deliver_on_destroy(SlotTarget { key, serial });
        }

        let handle = GameObjectHandle::new(key);
        if let Some(entry) = self.objects.remove(key) {
            self.order.retain(|other| *other != key);
            match self.native.game_object_destroy(entry.native) {
                Ok(()) => log::debug!(target: LOG_TARGET, "destroyed {handle}"),
                Err(err) => log::warn!(target: LOG_TARGET, "native release of {handle} failed: {err}"),
            }
        }
    }

    fn finish_removal(&mut self, target: SlotTarget) {
        self.deliver_on_destroy(target);
        if let Some(entry) = self.objects.get_mut(target.key) {
            entry.slots.retain(|slot| slot.serial != target.serial);
        }
    }

    fn deliver_on_destroy(&mut self, target: SlotTarget) {
        let Some(slot) = self.slot_mut(target) else {
            return;
        };
        if slot.state == LifecycleState::Destroyed {
            return;
        }
        slot.state = LifecycleState::Destroyed;
        slot.detached = true;
        if !self.dispatch(target, Phase::OnDestroy) {
            if let Some(slot) = self.slot_mut(target) {
                slot.instance = None;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------

    fn entry(&self, handle: GameObjectHandle) -> BridgeResult<&GameObjectEntry> {
        self.objects
            .get(handle.key())
            .filter(|entry| !entry.destroy_queued)
            .ok_or(BridgeError::InvalidHandle(handle))
    }

    fn entry_mut(&mut self, handle: GameObjectHandle) -> BridgeResult<&mut GameObjectEntry> {
        self.objects
            .get_mut(handle.key())
            .filter(|entry| !entry.destroy_queued)
            .ok_or(BridgeError::InvalidHandle(handle))
    }

    fn attached_slot<T: Component>(&self, handle: GameObjectHandle) -> BridgeResult<&ComponentSlot> {
        let type_id = ComponentTypeId::of::<T>();
        self.entry(handle)?
            .slots
            .iter()
            .find(|slot| slot.type_id == type_id && slot.is_attached())
            .ok_or(BridgeError::ComponentNotFound {
                handle,
                component: T::TYPE_NAME,
            })
    }

    fn attached_slot_mut<T: Component>(&mut self, handle: GameObjectHandle) -> BridgeResult<&mut ComponentSlot> {
        let type_id = ComponentTypeId::of::<T>();
        self.entry_mut(handle)?
            .slots
            .iter_mut()
            .find(|slot| slot.type_id == type_id && slot.is_attached())
            .ok_or(BridgeError::ComponentNotFound {
                handle,
                component: T::TYPE_NAME,
            })
    }

    fn slot_mut(&mut self, target: SlotTarget) -> Option<&mut ComponentSlot> {
        self.objects
            .get_mut(target.key)?
            .slots
            .iter_mut()
            .find(|slot| slot.serial == target.serial)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
