use egui::{Pos2, Vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;
pub const ZOOM_IN_FACTOR: f32 = 1.1;
pub const ZOOM_OUT_FACTOR: f32 = 0.9;

/// Direction of a single scroll-wheel notch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Classify a raw scroll delta. Returns `None` for a zero delta.
    pub fn from_scroll(delta_y: f32) -> Option<Self> {
        if delta_y > 0.0 {
            Some(Self::In)
        } else if delta_y < 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }

    fn factor(self) -> f32 {
        match self {
            Self::In => ZOOM_IN_FACTOR,
            Self::Out => ZOOM_OUT_FACTOR,
        }
    }
}

/// Zoom and pan applied to the image when it is drawn on screen.
///
/// `screen = image * zoom + pan`. Pan is in screen pixels and is not scaled
/// by zoom. Zoom always stays within `[MIN_ZOOM, MAX_ZOOM]`, which also keeps
/// the inverse mapping well defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    zoom: f32,
    pan: Vec2,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewState {
    /// Creates a view with the given zoom (clamped) and pan
    pub fn new(zoom: f32, pan: Vec2) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Map a screen position to image space
    pub fn to_image_space(&self, screen: Pos2) -> Pos2 {
        Pos2::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// Map an image-space point to screen space
    pub fn to_screen_space(&self, image: Pos2) -> Pos2 {
        Pos2::new(
            image.x * self.zoom + self.pan.x,
            image.y * self.zoom + self.pan.y,
        )
    }

    /// Multiply zoom by one scroll notch and clamp the result
    pub fn apply_zoom_delta(&mut self, direction: ZoomDirection) {
        self.zoom = clamp_zoom(self.zoom * direction.factor());
    }

    /// Shift the view by a screen-space delta
    pub fn apply_pan_delta(&mut self, dx: f32, dy: f32) {
        self.pan += Vec2::new(dx, dy);
    }

    /// Back to 100% zoom with no pan
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
