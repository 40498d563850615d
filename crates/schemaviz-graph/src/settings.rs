use schemaviz_core::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for layout, viewport and interaction.
///
/// Every field has a default so partial JSON files load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    // Layout
    pub node_width: f32,
    /// Height assumed for every node when placing the initial grid.
    pub layout_node_height: f32,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,

    // Node card geometry
    pub header_height: f32,
    pub field_row_height: f32,
    pub node_padding: f32,

    // Viewport
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    pub wheel_zoom_in: f32,
    pub wheel_zoom_out: f32,
    pub fit_padding: f32,
    pub fit_max_zoom: f32,

    // Interaction
    pub click_threshold: f32,
    pub tooltip_delay_ms: u64,
    pub resize_debounce_ms: u64,

    pub history_capacity: usize,

    pub grid_spacing: f32,
    pub show_grid: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            node_width: 250.0,
            layout_node_height: 200.0,
            horizontal_spacing: 100.0,
            vertical_spacing: 80.0,
            header_height: 36.0,
            field_row_height: 24.0,
            node_padding: 8.0,
            min_zoom: 0.25,
            max_zoom: 2.0,
            zoom_step: 1.2,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            fit_padding: 50.0,
            fit_max_zoom: 1.5,
            click_threshold: 5.0,
            tooltip_delay_ms: 400,
            resize_debounce_ms: 100,
            history_capacity: 20,
            grid_spacing: 20.0,
            show_grid: true,
        }
    }
}

/// Node card measurements derived from [`GraphSettings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMetrics {
    pub width: f32,
    pub header_height: f32,
    pub field_row_height: f32,
    pub padding: f32,
}

impl NodeMetrics {
    pub fn height_for(&self, field_count: usize) -> f32 {
        self.header_height + field_count as f32 * self.field_row_height + self.padding
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        GraphSettings::default().node_metrics()
    }
}

impl GraphSettings {
    pub fn node_metrics(&self) -> NodeMetrics {
        NodeMetrics {
            width: self.node_width,
            header_height: self.header_height,
            field_row_height: self.field_row_height,
            padding: self.node_padding,
        }
    }

    /// Replace values that would break the engine's invariants.
    pub fn validated(mut self) -> Self {
        let defaults = GraphSettings::default();
        let positive = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        self.node_width = positive(self.node_width, defaults.node_width);
        self.layout_node_height = positive(self.layout_node_height, defaults.layout_node_height);
        self.header_height = positive(self.header_height, defaults.header_height);
        self.field_row_height = positive(self.field_row_height, defaults.field_row_height);
        self.min_zoom = positive(self.min_zoom, defaults.min_zoom);
        self.max_zoom = positive(self.max_zoom, defaults.max_zoom);
        if self.min_zoom > self.max_zoom {
            std::mem::swap(&mut self.min_zoom, &mut self.max_zoom);
        }
        self.zoom_step = positive(self.zoom_step, defaults.zoom_step);
        self.wheel_zoom_in = positive(self.wheel_zoom_in, defaults.wheel_zoom_in);
        self.wheel_zoom_out = positive(self.wheel_zoom_out, defaults.wheel_zoom_out);
        self.fit_max_zoom = positive(self.fit_max_zoom, defaults.fit_max_zoom);
        self.grid_spacing = positive(self.grid_spacing, defaults.grid_spacing);
        self.history_capacity = self.history_capacity.max(1);
        self
    }

    pub fn load_from(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::Settings {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let settings: GraphSettings =
            serde_json::from_str(&content).map_err(|e| EngineError::Settings {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(settings.validated())
    }

    /// Load from the platform config dir, falling back to defaults.
    pub fn load() -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("schemaviz").join("settings.json");
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(settings) => {
                        tracing::info!("Settings loaded from {:?}", path);
                        return settings;
                    }
                    Err(e) => tracing::error!("{}", e),
                }
            } else {
                tracing::info!("Settings file not found, using defaults");
            }
        }
        Self::default()
    }

    pub fn save_to(&self, path: &Path) -> EngineResult<()> {
        let to_error = |reason: String| EngineError::Settings {
            path: path.to_path_buf(),
            reason,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| to_error(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| to_error(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| to_error(e.to_string()))
    }
}
