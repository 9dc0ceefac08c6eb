//! Camera placement decorator

use nalgebra::{Isometry3, Matrix4, Point3, UnitQuaternion, Vector3};

use super::volume::{ViewingVolume, VolumeRef};

/// A camera wraps a viewing volume and adds placement ergonomics.
///
/// All state lives in the wrapped volume; the camera only computes placements
/// (`look_at`, `move_by`) and writes them through. This keeps the decorator
/// chain (frustum over camera over projection volume) free of duplicated
/// state.
pub struct Camera {
    volume: VolumeRef,
}

impl Camera {
    /// Wrap a viewing volume.
    pub fn new(volume: VolumeRef) -> Self {
        Self { volume }
    }

    /// Handle to the wrapped volume.
    pub fn volume(&self) -> VolumeRef {
        self.volume.clone()
    }

    /// Orient the camera so it looks from its current position at `target`.
    pub fn look_at(&mut self, target: Point3<f32>, up: Vector3<f32>) {
        let eye = self.position();
        let view = Isometry3::look_at_rh(&eye, &target, &up);
        self.set_orientation(view.rotation.inverse());
    }

    /// Translate the camera by `offset` in world space.
    pub fn move_by(&mut self, offset: Vector3<f32>) {
        let position = self.position() + offset;
        self.set_position(position);
    }
}

impl ViewingVolume for Camera {
    fn position(&self) -> Point3<f32> {
        self.volume.borrow().position()
    }

    fn set_position(&mut self, position: Point3<f32>) {
        self.volume.borrow_mut().set_position(position);
    }

    fn orientation(&self) -> UnitQuaternion<f32> {
        self.volume.borrow().orientation()
    }

    fn set_orientation(&mut self, orientation: UnitQuaternion<f32>) {
        self.volume.borrow_mut().set_orientation(orientation);
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.volume.borrow().view_matrix()
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.volume.borrow().projection_matrix()
    }

    fn update(&mut self, delta: f32) {
        self.volume.borrow_mut().update(delta);
    }
}
