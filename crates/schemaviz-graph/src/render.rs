//! Frame drawing on top of a backend-agnostic [`Painter`].
//!
//! All geometry comes from `edge_router`, `viewport` and the node model; the
//! painter only receives finished primitives.

use crate::edge_router::{CubicBezier, EdgeRouter};
use crate::geometry::{Rect, Vec2};
use crate::model::{Edge, Node};
use crate::settings::NodeMetrics;
use crate::state::GraphEngineState;
use crate::style::{self, Color, EdgeStyle, Shadow, Stroke};
use crate::viewport::BackingStore;
use schemaviz_core::{EngineError, EngineResult};

const TITLE_FONT_SIZE: f32 = 14.0;
const FIELD_FONT_SIZE: f32 = 12.0;
const LABEL_FONT_SIZE: f32 = 11.0;
const TEXT_INSET: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// `screen = point * scale + translate`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };
}

/// Drawing backend. Coordinates are logical pixels in the current transform.
pub trait Painter {
    /// Reallocate the backing store and apply a uniform `scale` so later calls
    /// keep working in logical pixels.
    fn resize_backing_store(&mut self, store: BackingStore);
    fn clear(&mut self, color: Color);
    fn set_transform(&mut self, transform: Transform);
    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke);
    fn bezier(&mut self, curve: &CubicBezier, style: &EdgeStyle);
    fn rect(&mut self, rect: Rect, corner_radius: f32, fill: Color, stroke: Option<Stroke>);
    fn text(&mut self, pos: Vec2, text: &str, font_size: f32, color: Color, align: TextAlign);

    /// Text advance width. Backends with real font metrics should override.
    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * 0.6
    }
}

/// Primitive recorded by [`RecordingPainter`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ResizeBackingStore(BackingStore),
    Clear(Color),
    SetTransform(Transform),
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    Bezier {
        curve: CubicBezier,
        stroke: Stroke,
        dash: Option<[f32; 2]>,
        shadow: Option<Shadow>,
    },
    Rect {
        rect: Rect,
        corner_radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Text {
        pos: Vec2,
        text: String,
        font_size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// Painter that keeps a display list instead of rasterizing.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    pub commands: Vec<DrawCommand>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Painter for RecordingPainter {
    fn resize_backing_store(&mut self, store: BackingStore) {
        self.commands.push(DrawCommand::ResizeBackingStore(store));
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn set_transform(&mut self, transform: Transform) {
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    fn bezier(&mut self, curve: &CubicBezier, style: &EdgeStyle) {
        self.commands.push(DrawCommand::Bezier {
            curve: *curve,
            stroke: style.stroke,
            dash: style.dash,
            shadow: style.shadow,
        });
    }

    fn rect(&mut self, rect: Rect, corner_radius: f32, fill: Color, stroke: Option<Stroke>) {
        self.commands.push(DrawCommand::Rect {
            rect,
            corner_radius,
            fill,
            stroke,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, font_size: f32, color: Color, align: TextAlign) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            font_size,
            color,
            align,
        });
    }
}

/// What one frame put on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub nodes_drawn: Vec<String>,
    pub edges_drawn: Vec<Edge>,
}

pub struct Renderer<P: Painter> {
    painter: P,
    router: EdgeRouter,
    current_store: Option<BackingStore>,
}

impl<P: Painter> std::fmt::Debug for Renderer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("current_store", &self.current_store)
            .finish_non_exhaustive()
    }
}

impl<P: Painter> Renderer<P> {
    /// Fails once, up front, when the host has no drawing context to give.
    pub fn try_new(context: Option<P>) -> EngineResult<Self> {
        match context {
            Some(painter) => Ok(Self {
                painter,
                router: EdgeRouter::new(),
                current_store: None,
            }),
            None => {
                tracing::error!("Canvas drawing context unavailable; diagram disabled");
                Err(EngineError::RenderContextUnavailable)
            }
        }
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }

    pub fn painter_mut(&mut self) -> &mut P {
        &mut self.painter
    }

    pub fn router(&self) -> &EdgeRouter {
        &self.router
    }

    pub fn render(&mut self, state: &GraphEngineState) -> FrameStats {
        if self.current_store != Some(state.backing_store) {
            self.painter.resize_backing_store(state.backing_store);
            self.current_store = Some(state.backing_store);
        }

        self.painter.set_transform(Transform::IDENTITY);
        self.painter.clear(style::COLOR_BACKGROUND);
        if state.settings.show_grid {
            self.draw_grid(state);
        }

        let viewport = &state.viewport;
        self.painter.set_transform(Transform {
            translate: viewport.pan,
            scale: viewport.zoom(),
        });

        let mut stats = FrameStats::default();
        let hovered = state.hovered_node.as_deref();
        for edge in state.visible_edges() {
            let (Some(from), Some(to)) = (state.node(&edge.from), state.node(&edge.to)) else {
                continue;
            };
            let highlighted = hovered.is_some_and(|id| edge.touches(id));
            self.draw_edge(edge, from, to, highlighted);
            stats.edges_drawn.push(edge.clone());
        }

        let metrics = state.node_metrics();
        for node in state.nodes.iter().filter(|n| n.visible) {
            self.draw_node(node, state, &metrics);
            stats.nodes_drawn.push(node.id.clone());
        }

        stats
    }

    fn draw_grid(&mut self, state: &GraphEngineState) {
        let viewport = &state.viewport;
        let spacing = state.settings.grid_spacing * viewport.zoom();
        if spacing < 4.0 {
            return;
        }
        let size = viewport.canvas_size();
        let stroke = Stroke::new(1.0, style::COLOR_GRID);

        let mut x = viewport.pan.x.rem_euclid(spacing);
        while x <= size.x {
            self.painter
                .line(Vec2::new(x, 0.0), Vec2::new(x, size.y), stroke);
            x += spacing;
        }
        let mut y = viewport.pan.y.rem_euclid(spacing);
        while y <= size.y {
            self.painter
                .line(Vec2::new(0.0, y), Vec2::new(size.x, y), stroke);
            y += spacing;
        }
    }

    fn draw_edge(&mut self, edge: &Edge, from: &Node, to: &Node, highlighted: bool) {
        let route = self.router.route_edge(from.rect(), to.rect(), highlighted);
        let edge_style = style::get_edge_style(edge.inferred, highlighted);
        self.painter.bezier(&route.curve, &edge_style);

        let arrow_stroke = Stroke::new(edge_style.stroke.width, edge_style.stroke.color);
        self.painter.line(route.arrow.tip, route.arrow.left, arrow_stroke);
        self.painter.line(route.arrow.tip, route.arrow.right, arrow_stroke);

        let text_width = self.painter.measure_text(&edge.from_field, LABEL_FONT_SIZE);
        let label = self.router.label(&route.curve, &edge.from_field, text_width);
        self.painter.rect(
            label.pill,
            label.pill.height() * 0.5,
            style::COLOR_LABEL_FILL,
            Some(Stroke::new(1.0, edge_style.stroke.color)),
        );
        self.painter.text(
            label.anchor,
            &label.text,
            LABEL_FONT_SIZE,
            style::COLOR_LABEL_TEXT,
            TextAlign::Center,
        );
    }

    fn draw_node(&mut self, node: &Node, state: &GraphEngineState, metrics: &NodeMetrics) {
        let selected = state.selected.as_deref() == Some(node.id.as_str());
        let hovered = state.hovered_node.as_deref() == Some(node.id.as_str());
        let node_style = style::get_node_style(selected, hovered);
        let rect = node.rect();

        self.painter.rect(
            rect,
            node_style.corner_radius,
            node_style.fill,
            Some(node_style.border),
        );

        let header = Rect::from_pos_size(rect.min, Vec2::new(rect.width(), metrics.header_height));
        self.painter
            .rect(header, node_style.corner_radius, node_style.header_fill, None);
        let header_mid = header.center().y;
        self.painter.text(
            Vec2::new(rect.min.x + TEXT_INSET, header_mid),
            &node.id,
            TITLE_FONT_SIZE,
            style::COLOR_NODE_TITLE,
            TextAlign::Left,
        );
        self.painter.text(
            Vec2::new(rect.max.x - TEXT_INSET, header_mid),
            &node.table.document_count.to_string(),
            FIELD_FONT_SIZE,
            style::COLOR_NODE_BADGE,
            TextAlign::Right,
        );

        let hovered_field = state
            .hovered_field
            .as_ref()
            .filter(|(id, _)| *id == node.id)
            .map(|(_, index)| *index);

        for (index, field) in node.fields().iter().enumerate() {
            let row = node.field_row_rect(index, metrics);
            if hovered_field == Some(index) {
                self.painter.rect(row, 0.0, style::COLOR_FIELD_HOVER, None);
            }
            let mid = row.center().y;
            let name = if field.optional {
                format!("{}?", field.name)
            } else {
                field.name.clone()
            };
            self.painter.text(
                Vec2::new(row.min.x + TEXT_INSET, mid),
                &name,
                FIELD_FONT_SIZE,
                style::COLOR_FIELD_NAME,
                TextAlign::Left,
            );

            let parsed = field.parsed_type();
            let type_color = if parsed.is_reference() {
                style::COLOR_FIELD_REFERENCE
            } else {
                style::COLOR_FIELD_TYPE
            };
            self.painter.text(
                Vec2::new(row.max.x - TEXT_INSET, mid),
                &parsed.display_label(),
                FIELD_FONT_SIZE,
                type_color,
                TextAlign::Right,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaviz_core::{Field, SchemaSnapshot, Table};

    fn state() -> GraphEngineState {
        let mut state = GraphEngineState::default();
        let store = state.viewport.resize(1000.0, 700.0, 2.0);
        state.backing_store = store;
        state.apply_schema(&SchemaSnapshot::new(vec![
            Table::new("users").with_fields(vec![Field::new("name", "string").optional()]),
            Table::new("posts").with_fields(vec![Field::new("userId", "string")]),
        ]));
        state
    }

    #[test]
    fn test_missing_context_fails_cleanly() {
        let result = Renderer::<RecordingPainter>::try_new(None);
        assert!(matches!(result, Err(EngineError::RenderContextUnavailable)));
    }

    #[test]
    fn test_backing_store_resized_once() {
        let state = state();
        let mut renderer = Renderer::try_new(Some(RecordingPainter::new())).unwrap();
        renderer.render(&state);
        renderer.render(&state);
        let resizes = renderer
            .painter()
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::ResizeBackingStore(_)))
            .count();
        assert_eq!(resizes, 1);
        assert!(renderer.painter().commands.contains(&DrawCommand::ResizeBackingStore(
            BackingStore {
                width_px: 2000,
                height_px: 1400,
                scale: 2.0
            }
        )));
    }

    #[test]
    fn test_frame_contents() {
        let state = state();
        let mut renderer = Renderer::try_new(Some(RecordingPainter::new())).unwrap();
        let stats = renderer.render(&state);
        assert_eq!(stats.nodes_drawn, vec!["users", "posts"]);
        assert_eq!(stats.edges_drawn.len(), 1);

        let painter = renderer.painter();
        let texts: Vec<&str> = painter.texts().collect();
        assert!(texts.contains(&"name?"));
        assert!(texts.contains(&"userId"));

        let dashed = painter.commands.iter().any(|c| {
            matches!(c, DrawCommand::Bezier { dash: Some(d), .. } if *d == [6.0, 4.0])
        });
        assert!(dashed, "inferred edge should be dashed");
    }

    #[test]
    fn test_hovered_node_highlights_edges() {
        let mut state = state();
        state.hovered_node = Some("users".to_string());
        let mut renderer = Renderer::try_new(Some(RecordingPainter::new())).unwrap();
        renderer.render(&state);
        let shadowed = renderer
            .painter()
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Bezier { shadow: Some(_), .. }));
        assert!(shadowed);
    }

    #[test]
    fn test_hidden_node_hides_its_edges() {
        let mut state = state();
        state.node_mut("users").unwrap().visible = false;
        let mut renderer = Renderer::try_new(Some(RecordingPainter::new())).unwrap();
        let stats = renderer.render(&state);
        assert_eq!(stats.nodes_drawn, vec!["posts"]);
        assert!(stats.edges_drawn.is_empty());
    }
}
