//! Transform component
//!
//! The engine owns position, rotation and scale. The [`Transform`] component
//! only marks that a GameObject participates in the transform system; all
//! reads and writes go through a [`TransformProxy`], which forwards every
//! call to the native engine immediately. Nothing is cached, so two proxies
//! for the same object always agree.

use crate::ecs::component::{Component, LifecycleHooks};
use crate::ecs::entity::GameObjectHandle;
use crate::ecs::error::{map_transform_error, BridgeResult};
use crate::foundation::math::{Quaternion, TransformData, Vector3};
use crate::native::{NativeEngine, NativeHandle, TRANSFORM_TYPE_NAME};

/// Built-in transform component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transform;

impl Component for Transform {
    const TYPE_NAME: &'static str = TRANSFORM_TYPE_NAME;
    const HOOKS: LifecycleHooks = LifecycleHooks::empty();
}

/// Live view of one GameObject's native transform
pub struct TransformProxy<'a> {
    native: &'a mut dyn NativeEngine,
    handle: GameObjectHandle,
    native_handle: NativeHandle,
}

impl<'a> TransformProxy<'a> {
    pub(crate) fn new(
        native: &'a mut dyn NativeEngine,
        handle: GameObjectHandle,
        native_handle: NativeHandle,
    ) -> Self {
        Self {
            native,
            handle,
            native_handle,
        }
    }

    /// Owning GameObject
    pub const fn game_object(&self) -> GameObjectHandle {
        self.handle
    }

    /// World position
    pub fn position(&self) -> BridgeResult<Vector3> {
        let (x, y, z) = self
            .native
            .transform_get_position(self.native_handle)
            .map_err(map_transform_error("Transform_GetPosition", self.handle, self.native_handle))?;
        Ok(Vector3::new(x, y, z))
    }

    /// Move to a world position
    pub fn set_position(&mut self, position: Vector3) -> BridgeResult<()> {
        self.native
            .transform_set_position(self.native_handle, position.x, position.y, position.z)
            .map_err(map_transform_error("Transform_SetPosition", self.handle, self.native_handle))
    }

    /// World rotation
    pub fn rotation(&self) -> BridgeResult<Quaternion> {
        let (x, y, z, w) = self
            .native
            .transform_get_rotation(self.native_handle)
            .map_err(map_transform_error("Transform_GetRotation", self.handle, self.native_handle))?;
        Ok(Quaternion::new(x, y, z, w))
    }

    /// Set the world rotation
    pub fn set_rotation(&mut self, rotation: Quaternion) -> BridgeResult<()> {
        self.native
            .transform_set_rotation(self.native_handle, rotation.x, rotation.y, rotation.z, rotation.w)
            .map_err(map_transform_error("Transform_SetRotation", self.handle, self.native_handle))
    }

    /// Per-axis scale
    pub fn scale(&self) -> BridgeResult<Vector3> {
        let (x, y, z) = self
            .native
            .transform_get_scale(self.native_handle)
            .map_err(map_transform_error("Transform_GetScale", self.handle, self.native_handle))?;
        Ok(Vector3::new(x, y, z))
    }

    /// Set the per-axis scale
    pub fn set_scale(&mut self, scale: Vector3) -> BridgeResult<()> {
        self.native
            .transform_set_scale(self.native_handle, scale.x, scale.y, scale.z)
            .map_err(map_transform_error("Transform_SetScale", self.handle, self.native_handle))
    }

    /// Local +Z in world space
    pub fn forward(&self) -> BridgeResult<Vector3> {
        Ok(self.rotation()? * Vector3::FORWARD)
    }

    /// Local +X in world space
    pub fn right(&self) -> BridgeResult<Vector3> {
        Ok(self.rotation()? * Vector3::RIGHT)
    }

    /// Local +Y in world space
    pub fn up(&self) -> BridgeResult<Vector3> {
        Ok(self.rotation()? * Vector3::UP)
    }

    /// Offset the position by a world-space delta
    pub fn translate(&mut self, delta: Vector3) -> BridgeResult<()> {
        let position = self.position()?;
        self.set_position(position + delta)
    }

    /// Apply a rotation in local space (`rotation = rotation * delta`)
    pub fn rotate(&mut self, delta: Quaternion) -> BridgeResult<()> {
        let rotation = self.rotation()?;
        self.set_rotation(rotation * delta)
    }

    /// Point the forward axis at `target`, keeping the up axis as close to
    /// `up` as possible
    pub fn look_at(&mut self, target: Vector3, up: Vector3) -> BridgeResult<()> {
        let direction = target - self.position()?;
        let rotation = Quaternion::look_rotation(direction, up)?;
        self.set_rotation(rotation)
    }

    /// Copy of position, rotation and scale
    pub fn snapshot(&self) -> BridgeResult<TransformData> {
        Ok(TransformData {
            position: self.position()?,
            rotation: self.rotation()?,
            scale: self.scale()?,
        })
    }

    /// Map a local-space point into world space
    pub fn transform_point(&self, point: Vector3) -> BridgeResult<Vector3> {
        Ok(self.snapshot()?.transform_point(point))
    }
}
