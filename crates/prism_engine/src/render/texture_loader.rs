//! Texture loading and upload scheduling
//!
//! The texture loader serves two callers: the facade scans a whole scene
//! synchronously whenever the active scene changes, and overlay surfaces are
//! queued for deferred upload on the next frame preparation. As a listener on
//! the renderer's pre-process sub-phase the loader also re-scans the current
//! scene every tick, so geometry added after the last explicit scan still
//! gets its textures.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::core::event::Listener;
use crate::display::hud::{Surface, SurfaceRef};
use crate::render::renderer::RenderArg;
use crate::resources::Resources;
use crate::scene::node::{walk, NodeKind, SceneRef};

/// When a surface upload should happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPolicy {
    /// Upload during this call.
    Immediate,
    /// Upload on the next frame-preparation tick.
    Queued,
}

struct TrackedSurface {
    surface: Weak<RefCell<dyn Surface>>,
    uploaded_version: u64,
}

/// Scene texture scanner and surface upload scheduler.
pub struct TextureLoader {
    resources: Arc<Resources>,
    queued: Vec<SurfaceRef>,
    tracked: Vec<TrackedSurface>,
    scan_count: u64,
    textures_loaded: u64,
    uploads: u64,
}

impl TextureLoader {
    /// Create a loader resolving textures through `resources`.
    pub fn new(resources: Arc<Resources>) -> Self {
        Self {
            resources,
            queued: Vec::new(),
            tracked: Vec::new(),
            scan_count: 0,
            textures_loaded: 0,
            uploads: 0,
        }
    }

    /// Synchronously scan `scene` and decode every unloaded texture.
    pub fn load_scene(&mut self, scene: &SceneRef) {
        self.scan_count += 1;
        self.scan(scene);
    }

    /// Schedule a surface for upload.
    pub fn load_surface(&mut self, surface: SurfaceRef, policy: ReloadPolicy) {
        match policy {
            ReloadPolicy::Immediate => self.upload(&surface),
            ReloadPolicy::Queued => self.queued.push(surface),
        }
    }

    /// Shorthand for [`ReloadPolicy::Queued`].
    pub fn queue_surface(&mut self, surface: SurfaceRef) {
        self.load_surface(surface, ReloadPolicy::Queued);
    }

    /// Number of explicit scene scans so far.
    pub fn scan_count(&self) -> u64 {
        self.scan_count
    }

    /// Number of textures decoded so far.
    pub fn textures_loaded(&self) -> u64 {
        self.textures_loaded
    }

    /// Number of surface uploads so far.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Surfaces waiting for the next frame-preparation tick.
    pub fn queued_surfaces(&self) -> usize {
        self.queued.len()
    }

    fn scan(&mut self, scene: &SceneRef) {
        let resources = self.resources.clone();
        let mut loaded = 0u64;
        walk(scene, &mut |node| {
            if let NodeKind::Geometry(geometry) = node.borrow_mut().kind_mut() {
                if let Some(slot) = &mut geometry.material.texture {
                    if slot.data.is_none() {
                        match resources.load_texture(&slot.path) {
                            Ok(data) => {
                                slot.data = Some(data);
                                loaded += 1;
                            }
                            Err(error) => {
                                log::warn!("texture {:?} not loaded: {}", slot.path, error);
                            }
                        }
                    }
                }
            }
        });
        self.textures_loaded += loaded;
        if loaded > 0 {
            log::debug!("scene scan decoded {loaded} textures");
        }
    }

    fn upload(&mut self, surface: &SurfaceRef) {
        let version = surface.borrow().version();
        self.uploads += 1;
        log::trace!(
            "uploaded surface '{}' at version {}",
            surface.borrow().name(),
            version
        );

        let handle = Rc::downgrade(surface);
        if let Some(entry) = self
            .tracked
            .iter_mut()
            .find(|t| t.surface.as_ptr() == handle.as_ptr())
        {
            entry.uploaded_version = version;
        } else {
            self.tracked.push(TrackedSurface {
                surface: handle,
                uploaded_version: version,
            });
        }
    }

    /// Re-upload any tracked surface whose content changed, dropping dead
    /// handles along the way.
    fn refresh_tracked(&mut self) {
        let mut dirty: Vec<SurfaceRef> = Vec::new();
        self.tracked.retain(|entry| match entry.surface.upgrade() {
            Some(surface) => {
                if surface.borrow().version() != entry.uploaded_version {
                    dirty.push(surface);
                }
                true
            }
            None => false,
        });
        for surface in dirty {
            self.upload(&surface);
        }
    }
}

impl Listener<RenderArg> for TextureLoader {
    fn handle(&mut self, event: &RenderArg) {
        for surface in std::mem::take(&mut self.queued) {
            self.upload(&surface);
        }
        self.refresh_tracked();
        if let Some(scene) = &event.scene {
            self.scan(scene);
        }
    }
}
