//! On-screen overlay surfaces
//!
//! The HUD keeps an anchored list of overlay surfaces and participates in the
//! renderer's post-process phase, where it lays the surfaces out against the
//! current viewport. Surface content (pixels, text) is produced by the
//! surface sources themselves; the HUD only owns placement.

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::Rc;

use crate::core::event::Listener;
use crate::render::renderer::RenderArg;

new_key_type! {
    /// Stable handle to a HUD surface.
    pub struct SurfaceKey;
}

/// Content source for an overlay surface.
///
/// Implementations bump their version whenever the content changes so the
/// texture loader knows a re-upload is due.
pub trait Surface {
    /// Pixel dimensions of the surface.
    fn dimensions(&self) -> (u32, u32);

    /// Monotonic content version; bumped on every content change.
    fn version(&self) -> u64;

    /// Short name for diagnostics.
    fn name(&self) -> &str {
        "surface"
    }
}

/// Shared handle to a surface source.
pub type SurfaceRef = Rc<RefCell<dyn Surface>>;

/// Horizontal placement of a surface within the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    /// Flush with the left edge.
    Left,
    /// Centered.
    Center,
    /// Flush with the right edge.
    Right,
}

/// Vertical placement of a surface within the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    /// Flush with the top edge.
    Top,
    /// Centered.
    Center,
    /// Flush with the bottom edge.
    Bottom,
}

/// A surface plus its placement.
pub struct HudSurface {
    source: SurfaceRef,
    horizontal: HorizontalAnchor,
    vertical: VerticalAnchor,
    position: (i32, i32),
}

impl HudSurface {
    /// The content source.
    pub fn source(&self) -> SurfaceRef {
        self.source.clone()
    }

    /// Current anchors.
    pub fn anchor(&self) -> (HorizontalAnchor, VerticalAnchor) {
        (self.horizontal, self.vertical)
    }

    /// Re-anchor the surface. Takes effect at the next layout pass.
    pub fn set_anchor(&mut self, horizontal: HorizontalAnchor, vertical: VerticalAnchor) {
        self.horizontal = horizontal;
        self.vertical = vertical;
    }

    /// Pixel position computed by the last layout pass.
    pub fn position(&self) -> (i32, i32) {
        self.position
    }
}

/// The overlay surface list.
#[derive(Default)]
pub struct Hud {
    surfaces: SlotMap<SurfaceKey, HudSurface>,
}

impl Hud {
    /// Create an empty HUD.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface, centered by default. Returns its handle.
    pub fn create_surface(&mut self, source: SurfaceRef) -> SurfaceKey {
        self.surfaces.insert(HudSurface {
            source,
            horizontal: HorizontalAnchor::Center,
            vertical: VerticalAnchor::Center,
            position: (0, 0),
        })
    }

    /// Access a surface by handle.
    pub fn surface(&self, key: SurfaceKey) -> Option<&HudSurface> {
        self.surfaces.get(key)
    }

    /// Mutable access to a surface by handle.
    pub fn surface_mut(&mut self, key: SurfaceKey) -> Option<&mut HudSurface> {
        self.surfaces.get_mut(key)
    }

    /// Re-anchor a surface. No-op for a stale handle.
    pub fn set_anchor(
        &mut self,
        key: SurfaceKey,
        horizontal: HorizontalAnchor,
        vertical: VerticalAnchor,
    ) {
        if let Some(surface) = self.surfaces.get_mut(key) {
            surface.set_anchor(horizontal, vertical);
        }
    }

    /// Remove a surface. Returns whether it existed.
    pub fn remove_surface(&mut self, key: SurfaceKey) -> bool {
        self.surfaces.remove(key).is_some()
    }

    /// Number of surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Iterate over surfaces and their handles.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceKey, &HudSurface)> {
        self.surfaces.iter()
    }

    /// Position every surface against a `width` by `height` viewport.
    fn layout(&mut self, width: u32, height: u32) {
        for surface in self.surfaces.values_mut() {
            let (sw, sh) = surface.source.borrow().dimensions();
            let x = match surface.horizontal {
                HorizontalAnchor::Left => 0,
                HorizontalAnchor::Center => (width.saturating_sub(sw) / 2) as i32,
                HorizontalAnchor::Right => width.saturating_sub(sw) as i32,
            };
            let y = match surface.vertical {
                VerticalAnchor::Top => 0,
                VerticalAnchor::Center => (height.saturating_sub(sh) / 2) as i32,
                VerticalAnchor::Bottom => height.saturating_sub(sh) as i32,
            };
            surface.position = (x, y);
        }
    }
}

impl Listener<RenderArg> for Hud {
    fn handle(&mut self, event: &RenderArg) {
        let (width, height) = event.viewport.borrow().dimensions();
        self.layout(width, height);
        log::trace!("hud laid out {} surfaces", self.surfaces.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSurface {
        width: u32,
        height: u32,
    }

    impl Surface for FixedSurface {
        fn dimensions(&self) -> (u32, u32) {
            (self.width, self.height)
        }
        fn version(&self) -> u64 {
            0
        }
    }

    fn surface(width: u32, height: u32) -> SurfaceRef {
        Rc::new(RefCell::new(FixedSurface { width, height }))
    }

    #[test]
    fn anchors_position_surfaces_against_the_viewport() {
        let mut hud = Hud::new();
        let top_left = hud.create_surface(surface(100, 40));
        let bottom_right = hud.create_surface(surface(100, 40));
        hud.set_anchor(top_left, HorizontalAnchor::Left, VerticalAnchor::Top);
        hud.set_anchor(bottom_right, HorizontalAnchor::Right, VerticalAnchor::Bottom);

        hud.layout(800, 600);

        assert_eq!(hud.surface(top_left).unwrap().position(), (0, 0));
        assert_eq!(hud.surface(bottom_right).unwrap().position(), (700, 560));
    }

    #[test]
    fn removing_a_surface_shrinks_the_list() {
        let mut hud = Hud::new();
        let key = hud.create_surface(surface(10, 10));
        assert_eq!(hud.surface_count(), 1);
        assert!(hud.remove_surface(key));
        assert!(!hud.remove_surface(key));
        assert_eq!(hud.surface_count(), 0);
    }

    #[test]
    fn oversized_surface_clamps_to_the_origin() {
        let mut hud = Hud::new();
        let key = hud.create_surface(surface(1000, 1000));
        hud.set_anchor(key, HorizontalAnchor::Right, VerticalAnchor::Bottom);
        hud.layout(800, 600);
        assert_eq!(hud.surface(key).unwrap().position(), (0, 0));
    }
}
