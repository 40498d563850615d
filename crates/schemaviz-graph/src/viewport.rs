//! Pan/zoom state and the screen <-> world transform.
//!
//! `screen = world * zoom + pan`, so `world = (screen - pan) / zoom`.
//! Screen coordinates are logical (CSS) pixels; the device pixel ratio only
//! affects the size of the backing store.

use crate::geometry::{Rect, Vec2};
use crate::settings::GraphSettings;
use serde::{Deserialize, Serialize};

/// Physical size of the drawing surface and the scale that maps logical
/// pixels onto it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackingStore {
    pub width_px: u32,
    pub height_px: u32,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan: Vec2,
    zoom: f32,
    device_pixel_ratio: f32,
    canvas_size: Vec2,
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&GraphSettings::default())
    }
}

impl Viewport {
    pub fn new(settings: &GraphSettings) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            device_pixel_ratio: 1.0,
            canvas_size: Vec2::ZERO,
            min_zoom: settings.min_zoom,
            max_zoom: settings.max_zoom,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub fn canvas_center(&self) -> Vec2 {
        self.canvas_size * 0.5
    }

    pub fn zoom_range(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    fn clamp_zoom(&self, zoom: f32) -> f32 {
        if zoom.is_nan() {
            return self.zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan) / self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world * self.zoom + self.pan
    }

    pub fn world_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.world_to_screen(rect.min), self.world_to_screen(rect.max))
    }

    /// Visible world-space area.
    pub fn visible_world_rect(&self) -> Rect {
        Rect::from_min_max(
            self.screen_to_world(Vec2::ZERO),
            self.screen_to_world(self.canvas_size),
        )
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = self.clamp_zoom(zoom);
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        if pan.is_finite() {
            self.pan = pan;
        }
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.set_pan(self.pan + delta);
    }

    /// Set zoom while keeping the world point under `anchor` fixed on screen.
    pub fn zoom_to(&mut self, anchor: Vec2, new_zoom: f32) {
        let new_zoom = self.clamp_zoom(new_zoom);
        if (new_zoom - self.zoom).abs() <= f32::EPSILON {
            return;
        }
        let ratio = new_zoom / self.zoom;
        self.zoom = new_zoom;
        self.set_pan(anchor - (anchor - self.pan) * ratio);
    }

    pub fn zoom_by(&mut self, factor: f32, anchor: Vec2) {
        self.zoom_to(anchor, self.zoom * factor);
    }

    /// Record a new logical canvas size and pixel ratio. Returns the backing
    /// store the surface should be reallocated to.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) -> BackingStore {
        self.canvas_size = Vec2::new(width.max(0.0), height.max(0.0));
        self.device_pixel_ratio = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.max(1.0)
        } else {
            1.0
        };
        self.backing_store()
    }

    pub fn backing_store(&self) -> BackingStore {
        BackingStore {
            width_px: (self.canvas_size.x * self.device_pixel_ratio).round() as u32,
            height_px: (self.canvas_size.y * self.device_pixel_ratio).round() as u32,
            scale: self.device_pixel_ratio,
        }
    }

    /// Center `bounds` in the canvas at the given zoom.
    pub fn center_on(&mut self, bounds: Rect, zoom: f32) {
        self.zoom = self.clamp_zoom(zoom);
        self.set_pan(self.canvas_center() - bounds.center() * self.zoom);
    }

    /// Zoom and pan so `bounds` fits inside the canvas with `padding` on each side.
    pub fn fit(&mut self, bounds: Rect, padding: f32, max_zoom: f32) {
        let available = Vec2::new(
            (self.canvas_size.x - 2.0 * padding).max(1.0),
            (self.canvas_size.y - 2.0 * padding).max(1.0),
        );
        let width = bounds.width().max(1.0);
        let height = bounds.height().max(1.0);
        let zoom = (available.x / width).min(available.y / height).min(max_zoom);
        self.center_on(bounds, zoom);
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0_f32.clamp(self.min_zoom, self.max_zoom);
        self.pan = Vec2::ZERO;
    }
}
