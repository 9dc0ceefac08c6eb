//! Viewing volumes
//!
//! A viewing volume is the thing a viewport projects through: a placement
//! (position + orientation) and a projection. Cameras and frusta decorate a
//! volume rather than replace it, so the active volume bound into a viewport
//! is always a single [`VolumeRef`] handle that can be swapped atomically.

use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Translation3, UnitQuaternion};
use std::cell::RefCell;
use std::rc::Rc;

/// Placement and projection contract consumed by the viewport and renderer.
pub trait ViewingVolume {
    /// Eye position in world space.
    fn position(&self) -> Point3<f32>;

    /// Move the eye.
    fn set_position(&mut self, position: Point3<f32>);

    /// Orientation of the volume. Identity looks down the negative z axis.
    fn orientation(&self) -> UnitQuaternion<f32>;

    /// Re-orient the volume.
    fn set_orientation(&mut self, orientation: UnitQuaternion<f32>);

    /// World-to-eye transform derived from position and orientation.
    fn view_matrix(&self) -> Matrix4<f32> {
        Isometry3::from_parts(
            Translation3::from(self.position().coords),
            self.orientation(),
        )
        .inverse()
        .to_homogeneous()
    }

    /// Eye-to-clip transform.
    fn projection_matrix(&self) -> Matrix4<f32>;

    /// Per-frame hook; volumes with derived state refresh it here.
    fn update(&mut self, _delta: f32) {}
}

/// Shared handle to the active viewing volume.
pub type VolumeRef = Rc<RefCell<dyn ViewingVolume>>;

/// Standard perspective projection volume.
///
/// Default placement is the origin looking down the negative z axis.
pub struct PerspectiveViewingVolume {
    position: Point3<f32>,
    orientation: UnitQuaternion<f32>,
    projection: Perspective3<f32>,
}

impl PerspectiveViewingVolume {
    /// Create a perspective volume. `fov_y` is in radians.
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Point3::origin(),
            orientation: UnitQuaternion::identity(),
            projection: Perspective3::new(aspect, fov_y, near, far),
        }
    }

    /// A 60 degree volume for the given aspect ratio.
    pub fn with_aspect(aspect: f32) -> Self {
        Self::new(std::f32::consts::FRAC_PI_3, aspect, 0.1, 3000.0)
    }

    /// Adjust the aspect ratio, keeping the other projection parameters.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.projection.set_aspect(aspect);
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.projection.fovy()
    }
}

impl Default for PerspectiveViewingVolume {
    fn default() -> Self {
        Self::with_aspect(4.0 / 3.0)
    }
}

impl ViewingVolume for PerspectiveViewingVolume {
    fn position(&self) -> Point3<f32> {
        self.position
    }

    fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    fn orientation(&self) -> UnitQuaternion<f32> {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: UnitQuaternion<f32>) {
        self.orientation = orientation;
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.to_homogeneous()
    }
}
