//! Frustum decorator over a viewing volume
//!
//! Wraps the active volume with clip-testing planes extracted from the
//! combined view-projection matrix (Gribb-Hartmann) and, for debugging, a
//! wireframe scene node of the frustum corners that can be inserted into the
//! scene graph.

use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3, Vector4};

use super::volume::{ViewingVolume, VolumeRef};
use crate::scene::node::{NodeKind, SceneNode, SceneRef};

/// Plane in normal/distance form. Points with a non-negative signed distance
/// are on the inside.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Unit normal pointing into the frustum.
    pub normal: Vector3<f32>,
    /// Distance term of the plane equation.
    pub distance: f32,
}

impl Plane {
    fn from_coefficients(v: Vector4<f32>) -> Self {
        let normal = Vector3::new(v.x, v.y, v.z);
        let length = normal.norm();
        if length > 0.0 {
            Self {
                normal: normal / length,
                distance: v.w / length,
            }
        } else {
            // Degenerate projection row; treat as a plane that clips nothing.
            Self {
                normal: Vector3::zeros(),
                distance: f32::INFINITY,
            }
        }
    }

    /// Signed distance from the plane to `point`.
    pub fn signed_distance(&self, point: &Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) + self.distance
    }
}

/// Clip-testing decorator around the active viewing volume.
pub struct Frustum {
    volume: VolumeRef,
    planes: [Plane; 6],
    corners: [Point3<f32>; 8],
    visualize: bool,
    outline: Option<SceneRef>,
}

impl Frustum {
    /// Wrap `volume` and derive the initial planes.
    pub fn new(volume: VolumeRef) -> Self {
        let mut frustum = Self {
            volume,
            planes: [Plane {
                normal: Vector3::zeros(),
                distance: f32::INFINITY,
            }; 6],
            corners: [Point3::origin(); 8],
            visualize: false,
            outline: None,
        };
        frustum.refresh();
        frustum
    }

    /// Handle to the wrapped volume.
    pub fn volume(&self) -> VolumeRef {
        self.volume.clone()
    }

    /// Toggle clip visualization. When enabled, the outline node is kept in
    /// sync with the volume each frame.
    pub fn visualize_clipping(&mut self, on: bool) {
        self.visualize = on;
    }

    /// Whether clip visualization is enabled.
    pub fn visualizes_clipping(&self) -> bool {
        self.visualize
    }

    /// The six clip planes: left, right, bottom, top, near, far.
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// Whether `point` lies inside the frustum.
    pub fn contains(&self, point: &Point3<f32>) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(point) >= 0.0)
    }

    /// The wireframe scene node for this frustum, creating it on first use.
    ///
    /// The same node handle is returned on every call so it can be inserted
    /// into a scene once and updated in place.
    pub fn frustum_node(&mut self) -> SceneRef {
        self.refresh();
        if let Some(node) = &self.outline {
            if let NodeKind::FrustumOutline(corners) = node.borrow_mut().kind_mut() {
                *corners = self.corners;
            }
            return node.clone();
        }
        let node = SceneNode::new(NodeKind::FrustumOutline(self.corners));
        self.outline = Some(node.clone());
        node
    }

    /// Recompute planes and corners from the wrapped volume.
    fn refresh(&mut self) {
        let (view, projection) = {
            let volume = self.volume.borrow();
            (volume.view_matrix(), volume.projection_matrix())
        };
        let combined = projection * view;

        // Gribb-Hartmann: each clip plane is a sum or difference of matrix
        // rows of the combined transform.
        let row = |i: usize| -> Vector4<f32> { combined.row(i).transpose() };
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
        self.planes = [
            Plane::from_coefficients(r3 + r0), // left
            Plane::from_coefficients(r3 - r0), // right
            Plane::from_coefficients(r3 + r1), // bottom
            Plane::from_coefficients(r3 - r1), // top
            Plane::from_coefficients(r3 + r2), // near
            Plane::from_coefficients(r3 - r2), // far
        ];

        if let Some(inverse) = combined.try_inverse() {
            self.corners = Self::unproject_corners(&inverse);
        }

        if self.visualize {
            if let Some(node) = &self.outline {
                if let NodeKind::FrustumOutline(corners) = node.borrow_mut().kind_mut() {
                    *corners = self.corners;
                }
            }
        }
    }

    fn unproject_corners(inverse: &Matrix4<f32>) -> [Point3<f32>; 8] {
        // NDC cube corners, near plane first, counter-clockwise.
        const NDC: [(f32, f32, f32); 8] = [
            (-1.0, -1.0, -1.0),
            (1.0, -1.0, -1.0),
            (1.0, 1.0, -1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, -1.0, 1.0),
            (1.0, -1.0, 1.0),
            (1.0, 1.0, 1.0),
            (-1.0, 1.0, 1.0),
        ];
        let mut corners = [Point3::origin(); 8];
        for (corner, &(x, y, z)) in corners.iter_mut().zip(NDC.iter()) {
            let h = inverse * Vector4::new(x, y, z, 1.0);
            if h.w.abs() > f32::EPSILON {
                *corner = Point3::new(h.x / h.w, h.y / h.w, h.z / h.w);
            }
        }
        corners
    }
}

impl ViewingVolume for Frustum {
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
        self.refresh();
    }
}
