//! Viewport: a frame region projected through one viewing volume

use std::cell::RefCell;
use std::rc::Rc;

use super::frame::Frame;
use super::volume::{PerspectiveViewingVolume, VolumeRef};

/// Binds a rectangular region of the frame to exactly one viewing volume.
///
/// A viewport is never without a volume: construction installs a default
/// perspective volume sized to the region, and [`Viewport::set_viewing_volume`]
/// replaces it in a single handle swap, so the renderer can never observe an
/// unbound viewport.
pub struct Viewport {
    width: u32,
    height: u32,
    volume: VolumeRef,
}

impl Viewport {
    /// Create a viewport covering a `width` by `height` region.
    pub fn new(width: u32, height: u32) -> Self {
        let aspect = if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        Self {
            width,
            height,
            volume: Rc::new(RefCell::new(PerspectiveViewingVolume::with_aspect(aspect))),
        }
    }

    /// Create a viewport covering the whole frame.
    pub fn from_frame(frame: &Frame) -> Self {
        Self::new(frame.width(), frame.height())
    }

    /// Region dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resize the region (e.g. after a frame resize).
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// The active viewing volume.
    pub fn viewing_volume(&self) -> VolumeRef {
        self.volume.clone()
    }

    /// Replace the active viewing volume.
    pub fn set_viewing_volume(&mut self, volume: VolumeRef) {
        self.volume = volume;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::volume::ViewingVolume;
    use nalgebra::Point3;

    #[test]
    fn construction_installs_a_default_volume() {
        let viewport = Viewport::new(800, 600);
        let volume = viewport.viewing_volume();
        assert_eq!(volume.borrow().position(), Point3::origin());
    }

    #[test]
    fn volume_swap_is_a_single_handle_change() {
        let mut viewport = Viewport::new(800, 600);
        let replacement: VolumeRef =
            Rc::new(RefCell::new(PerspectiveViewingVolume::with_aspect(2.0)));

        viewport.set_viewing_volume(replacement.clone());
        assert!(Rc::ptr_eq(&viewport.viewing_volume(), &replacement));
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let viewport = Viewport::new(100, 0);
        assert_eq!(viewport.aspect(), 1.0);
    }
}
