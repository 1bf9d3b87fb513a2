//! In-process native engine
//!
//! [`HeadlessEngine`] implements the native function table without a window
//! or renderer. Entities live in a slotmap arena, input is fed through
//! [`HeadlessEngine::press_key`] and friends and published once per
//! [`HeadlessEngine::begin_frame`], and debug output is forwarded to `log`.
//!
//! Clones share state, so a host can keep one copy for driving time and
//! input while the bridge owns another.

use super::{
    ComponentRef, DebugLevel, NativeEngine, NativeError, NativeHandle, NativeResult, TypeTag,
    TRANSFORM_TYPE_NAME,
};
use crate::core::config::NativeConfig;
use crate::foundation::logging::SCRIPT_TARGET;
use crate::input::{KeyCode, MouseButton};
use slotmap::{Key, KeyData, SlotMap};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

slotmap::new_key_type! {
    struct EntityKey;
}

fn to_handle(key: EntityKey) -> NativeHandle {
    NativeHandle::from_raw(key.data().as_ffi())
}

fn to_key(handle: NativeHandle) -> EntityKey {
    KeyData::from_ffi(handle.raw()).into()
}

#[derive(Debug, Clone)]
struct EntityRecord {
    position: [f32; 3],
    rotation: [f32; 4],
    scale: [f32; 3],
    components: HashMap<u64, ComponentRef>,
}

impl EntityRecord {
    fn reset_transform(&mut self) {
        self.position = [0.0; 3];
        self.rotation = [0.0, 0.0, 0.0, 1.0];
        self.scale = [1.0; 3];
    }
}

impl Default for EntityRecord {
    fn default() -> Self {
        let mut record = Self {
            position: [0.0; 3],
            rotation: [0.0; 4],
            scale: [0.0; 3],
            components: HashMap::new(),
        };
        record.reset_transform();
        record
    }
}

#[derive(Debug, Default)]
struct KeyboardState {
    /// Keys physically down right now, published at the next frame
    physical: HashSet<KeyCode>,
    held: HashSet<KeyCode>,
    down: HashSet<KeyCode>,
    up: HashSet<KeyCode>,
    pending_down: HashSet<KeyCode>,
    pending_up: HashSet<KeyCode>,
}

#[derive(Debug)]
struct HeadlessState {
    entities: SlotMap<EntityKey, EntityRecord>,
    capacity: usize,
    next_component_ref: u64,
    delta_time: f32,
    time: f32,
    keyboard: KeyboardState,
    mouse_buttons: [bool; 3],
    mouse_position: (f32, f32),
    messages: Vec<(DebugLevel, String)>,
    destroyed: Vec<NativeHandle>,
}

impl HeadlessState {
    fn entity(&self, handle: NativeHandle) -> NativeResult<&EntityRecord> {
        self.entities
            .get(to_key(handle))
            .ok_or(NativeError::UnknownHandle(handle))
    }

    fn entity_mut(&mut self, handle: NativeHandle) -> NativeResult<&mut EntityRecord> {
        self.entities
            .get_mut(to_key(handle))
            .ok_or(NativeError::UnknownHandle(handle))
    }
}

/// Headless reference implementation of [`NativeEngine`]
#[derive(Debug, Clone)]
pub struct HeadlessEngine {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessEngine {
    /// Engine with the default entity limit
    pub fn new() -> Self {
        Self::from_config(&NativeConfig::default())
    }

    /// Engine holding at most `capacity` live entities
    pub fn with_capacity(capacity: usize) -> Self {
        let state = HeadlessState {
            entities: SlotMap::with_key(),
            capacity,
            next_component_ref: 1,
            delta_time: 0.0,
            time: 0.0,
            keyboard: KeyboardState::default(),
            mouse_buttons: [false; 3],
            mouse_position: (0.0, 0.0),
            messages: Vec::new(),
            destroyed: Vec::new(),
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Engine configured from the `[native]` config section
    pub fn from_config(config: &NativeConfig) -> Self {
        Self::with_capacity(config.max_game_objects)
    }

    /// Start a new frame: advance the clock and publish queued input
    ///
    /// Keys pressed or released since the previous call report Down/Up for
    /// this frame only.
    pub fn begin_frame(&self, delta_time: f32) {
        let mut state = self.state.borrow_mut();
        state.delta_time = delta_time;
        if delta_time.is_finite() && delta_time > 0.0 {
            state.time += delta_time;
        }

        let keyboard = &mut state.keyboard;
        keyboard.down = std::mem::take(&mut keyboard.pending_down);
        keyboard.up = std::mem::take(&mut keyboard.pending_up);
        keyboard.held.clone_from(&keyboard.physical);
    }

    /// Press a key; reported from the next frame on
    ///
    /// Pressing a key that is already down does nothing.
    pub fn press_key(&self, key: KeyCode) {
        let mut state = self.state.borrow_mut();
        let keyboard = &mut state.keyboard;
        if keyboard.physical.insert(key) {
            keyboard.pending_down.insert(key);
        }
    }

    /// Release a key; reported from the next frame on
    ///
    /// Releasing a key that is not down does nothing.
    pub fn release_key(&self, key: KeyCode) {
        let mut state = self.state.borrow_mut();
        let keyboard = &mut state.keyboard;
        if keyboard.physical.remove(&key) {
            keyboard.pending_up.insert(key);
        }
    }

    /// Set a mouse button's state
    pub fn set_mouse_button(&self, button: MouseButton, pressed: bool) {
        self.state.borrow_mut().mouse_buttons[button as usize] = pressed;
    }

    /// Move the cursor
    pub fn set_mouse_position(&self, x: f32, y: f32) {
        self.state.borrow_mut().mouse_position = (x, y);
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.state.borrow().entities.len()
    }

    /// Whether `handle` names a live entity
    pub fn contains(&self, handle: NativeHandle) -> bool {
        self.state.borrow().entities.contains_key(to_key(handle))
    }

    /// Number of components attached to `handle`, or `None` if it is dead
    pub fn component_count(&self, handle: NativeHandle) -> Option<usize> {
        self.state
            .borrow()
            .entities
            .get(to_key(handle))
            .map(|record| record.components.len())
    }

    /// Handles released through `game_object_destroy`, in order
    pub fn destroyed_handles(&self) -> Vec<NativeHandle> {
        self.state.borrow().destroyed.clone()
    }

    /// Messages received through `debug_log`
    pub fn logged_messages(&self) -> Vec<(DebugLevel, String)> {
        self.state.borrow().messages.clone()
    }

    /// Forget recorded debug messages
    pub fn clear_messages(&self) {
        self.state.borrow_mut().messages.clear();
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeEngine for HeadlessEngine {
    fn game_object_create(&mut self) -> NativeResult<NativeHandle> {
        let mut state = self.state.borrow_mut();
        if state.entities.len() >= state.capacity {
            return Err(NativeError::CapacityExceeded {
                capacity: state.capacity,
            });
        }
        let key = state.entities.insert(EntityRecord::default());
        Ok(to_handle(key))
    }

    fn game_object_destroy(&mut self, handle: NativeHandle) -> NativeResult<()> {
        let mut state = self.state.borrow_mut();
        state
            .entities
            .remove(to_key(handle))
            .ok_or(NativeError::UnknownHandle(handle))?;
        state.destroyed.push(handle);
        Ok(())
    }

    fn game_object_add_component(
        &mut self,
        handle: NativeHandle,
        tag: TypeTag,
    ) -> NativeResult<ComponentRef> {
        let mut state = self.state.borrow_mut();
        let component_ref = ComponentRef(state.next_component_ref);
        let record = state.entity_mut(handle)?;
        if record.components.contains_key(&tag.id) {
            return Err(NativeError::ComponentAlreadyPresent {
                handle,
                component: tag.name,
            });
        }
        record.components.insert(tag.id, component_ref);
        if tag.name == TRANSFORM_TYPE_NAME {
            record.reset_transform();
        }
        state.next_component_ref += 1;
        Ok(component_ref)
    }

    fn game_object_get_component(
        &self,
        handle: NativeHandle,
        tag: TypeTag,
    ) -> NativeResult<Option<ComponentRef>> {
        let state = self.state.borrow();
        Ok(state.entity(handle)?.components.get(&tag.id).copied())
    }

    fn game_object_remove_component(&mut self, handle: NativeHandle, tag: TypeTag) -> NativeResult<()> {
        let mut state = self.state.borrow_mut();
        state
            .entity_mut(handle)?
            .components
            .remove(&tag.id)
            .map(|_| ())
            .ok_or(NativeError::ComponentMissing {
                handle,
                component: tag.name,
            })
    }

    fn transform_get_position(&self, handle: NativeHandle) -> NativeResult<(f32, f32, f32)> {
        let [x, y, z] = self.state.borrow().entity(handle)?.position;
        Ok((x, y, z))
    }

    fn transform_set_position(&mut self, handle: NativeHandle, x: f32, y: f32, z: f32) -> NativeResult<()> {
        self.state.borrow_mut().entity_mut(handle)?.position = [x, y, z];
        Ok(())
    }

    fn transform_get_rotation(&self, handle: NativeHandle) -> NativeResult<(f32, f32, f32, f32)> {
        let [x, y, z, w] = self.state.borrow().entity(handle)?.rotation;
        Ok((x, y, z, w))
    }

    fn transform_set_rotation(
        &mut self,
        handle: NativeHandle,
        x: f32,
        y: f32,
        z: f32,
        w: f32,
    ) -> NativeResult<()> {
        self.state.borrow_mut().entity_mut(handle)?.rotation = [x, y, z, w];
        Ok(())
    }

    fn transform_get_scale(&self, handle: NativeHandle) -> NativeResult<(f32, f32, f32)> {
        let [x, y, z] = self.state.borrow().entity(handle)?.scale;
        Ok((x, y, z))
    }

    fn transform_set_scale(&mut self, handle: NativeHandle, x: f32, y: f32, z: f32) -> NativeResult<()> {
        self.state.borrow_mut().entity_mut(handle)?.scale = [x, y, z];
        Ok(())
    }

    fn time_get_delta_time(&self) -> f32 {
        self.state.borrow().delta_time
    }

    fn time_get_time(&self) -> f32 {
        self.state.borrow().time
    }

    fn input_get_key(&self, key: KeyCode) -> bool {
        self.state.borrow().keyboard.held.contains(&key)
    }

    fn input_get_key_down(&self, key: KeyCode) -> bool {
        self.state.borrow().keyboard.down.contains(&key)
    }

    fn input_get_key_up(&self, key: KeyCode) -> bool {
        self.state.borrow().keyboard.up.contains(&key)
    }

    fn input_get_mouse_button(&self, button: MouseButton) -> bool {
        self.state.borrow().mouse_buttons[button as usize]
    }

    fn input_get_mouse_x(&self) -> f32 {
        self.state.borrow().mouse_position.0
    }

    fn input_get_mouse_y(&self) -> f32 {
        self.state.borrow().mouse_position.1
    }

    fn debug_log(&self, level: DebugLevel, message: &str) {
        log::log!(target: SCRIPT_TARGET, log::Level::from(level), "{message}");
        self.state
            .borrow_mut()
            .messages
            .push((level, message.to_string()));
    }
}
