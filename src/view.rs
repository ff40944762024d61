use egui::{ColorImage, Pos2, Rect, Vec2};

/// Pan and zoom of a view onto a document.
///
/// Lives outside the document model and is never persisted with it. The pan
/// is kept in document units so it stays put when the zoom changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    /// Creates a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    fn screen_pan(&self) -> Vec2 {
        self.pan * self.zoom
    }

    /// Where a document location appears inside `viewport`
    pub fn to_screen(&self, location: (i32, i32), viewport: Rect) -> Pos2 {
        let center = viewport.center();
        let pan = self.screen_pan();
        Pos2::new(
            center.x + location.0 as f32 * self.zoom + pan.x,
            center.y + location.1 as f32 * self.zoom + pan.y,
        )
    }

    /// The document location under a screen point, rounded half away from zero
    pub fn to_document(&self, point: Pos2, viewport: Rect) -> (i32, i32) {
        let center = viewport.center();
        let pan = self.screen_pan();
        round_offset(Vec2::new(
            (point.x - pan.x - center.x) / self.zoom,
            (point.y - pan.y - center.y) / self.zoom,
        ))
    }

    /// A drag measured on screen, converted to a document-space emoji offset
    pub fn document_offset(&self, screen_delta: Vec2) -> (i32, i32) {
        round_offset(screen_delta / self.zoom)
    }

    pub fn pan_by(&mut self, screen_delta: Vec2) {
        self.pan += screen_delta / self.zoom;
    }

    /// Multiplies the zoom. Non-positive or non-finite factors are ignored.
    pub fn zoom_by(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom *= factor;
        }
    }

    /// Fits content of `content_size` into `viewport_size` and recenters.
    /// Does nothing if either size has a zero dimension.
    pub fn zoom_to_fit(&mut self, content_size: Vec2, viewport_size: Vec2) {
        if content_size.x > 0.0
            && content_size.y > 0.0
            && viewport_size.x > 0.0
            && viewport_size.y > 0.0
        {
            let h_zoom = viewport_size.x / content_size.x;
            let v_zoom = viewport_size.y / content_size.y;
            self.pan = Vec2::ZERO;
            self.zoom = h_zoom.min(v_zoom);
        }
    }

    pub fn zoom_to_fit_image(&mut self, image: &ColorImage, viewport_size: Vec2) {
        let size = Vec2::new(image.size[0] as f32, image.size[1] as f32);
        self.zoom_to_fit(size, viewport_size);
    }

    /// Point size for an emoji dropped at the current zoom, so it appears at
    /// `default_size` on screen.
    pub fn drop_size(&self, default_size: f32) -> f32 {
        default_size / self.zoom
    }
}

/// Rounds a gesture delta to whole document units, half away from zero.
pub fn round_offset(delta: Vec2) -> (i32, i32) {
    (delta.x.round() as i32, delta.y.round() as i32)
}
