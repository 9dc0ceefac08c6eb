//! Native display surface record

/// Dimensions and identity of the native display surface.
///
/// The frame is created by the environment and shared with the viewport; the
/// environment updates it when the native window is resized.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    color_depth: u32,
    title: String,
}

impl Frame {
    /// Create a frame record.
    pub fn new(title: impl Into<String>, width: u32, height: u32, color_depth: u32) -> Self {
        Self {
            width,
            height,
            color_depth,
            title: title.into(),
        }
    }

    /// Client area width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Client area height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color depth in bits.
    pub fn color_depth(&self) -> u32 {
        self.color_depth
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Record a resize reported by the environment.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
