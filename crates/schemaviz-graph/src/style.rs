//! Diagram colors and stroke styles.

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_tuple(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    pub fn lighten(&self, factor: f32) -> Self {
        Self {
            r: ((self.r as f32) + (255.0 - self.r as f32) * factor) as u8,
            g: ((self.g as f32) + (255.0 - self.g as f32) * factor) as u8,
            b: ((self.b as f32) + (255.0 - self.b as f32) * factor) as u8,
            a: self.a,
        }
    }
}

pub const COLOR_BACKGROUND: Color = Color::rgb(24, 24, 27);
pub const COLOR_GRID: Color = Color::rgba(255, 255, 255, 12);

pub const COLOR_NODE_FILL: Color = Color::rgb(39, 39, 42);
pub const COLOR_NODE_BORDER: Color = Color::rgb(63, 63, 70);
pub const COLOR_NODE_HEADER: Color = Color::rgb(52, 52, 58);
pub const COLOR_NODE_TITLE: Color = Color::rgb(244, 244, 245);
pub const COLOR_NODE_BADGE: Color = Color::rgb(161, 161, 170);
pub const COLOR_FIELD_NAME: Color = Color::rgb(212, 212, 216);
pub const COLOR_FIELD_TYPE: Color = Color::rgb(134, 134, 146);
pub const COLOR_FIELD_REFERENCE: Color = Color::rgb(129, 140, 248);
pub const COLOR_FIELD_HOVER: Color = Color::rgba(255, 255, 255, 20);

pub const COLOR_ACCENT: Color = Color::rgb(99, 102, 241);

pub const COLOR_EDGE: Color = Color::rgb(113, 113, 122);
pub const COLOR_EDGE_HIGHLIGHT: Color = Color::rgb(129, 140, 248);
pub const COLOR_EDGE_SHADOW: Color = Color::rgba(99, 102, 241, 90);
pub const COLOR_LABEL_FILL: Color = Color::rgb(39, 39, 42);
pub const COLOR_LABEL_TEXT: Color = Color::rgb(200, 200, 208);

pub const INFERRED_DASH: [f32; 2] = [6.0, 4.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

impl Stroke {
    pub const fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub stroke: Stroke,
    /// Dash/gap lengths for a dashed line.
    pub dash: Option<[f32; 2]>,
    pub shadow: Option<Shadow>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub fill: Color,
    pub header_fill: Color,
    pub border: Stroke,
    pub corner_radius: f32,
}

pub fn get_edge_style(inferred: bool, highlighted: bool) -> EdgeStyle {
    let stroke = if highlighted {
        Stroke::new(2.5, COLOR_EDGE_HIGHLIGHT)
    } else {
        Stroke::new(1.5, COLOR_EDGE)
    };
    EdgeStyle {
        stroke,
        dash: inferred.then_some(INFERRED_DASH),
        shadow: highlighted.then_some(Shadow {
            color: COLOR_EDGE_SHADOW,
            blur: 8.0,
        }),
    }
}

pub fn get_node_style(selected: bool, hovered: bool) -> NodeStyle {
    let border = if selected {
        Stroke::new(2.0, COLOR_ACCENT)
    } else if hovered {
        Stroke::new(1.5, COLOR_NODE_BORDER.lighten(0.3))
    } else {
        Stroke::new(1.0, COLOR_NODE_BORDER)
    };
    NodeStyle {
        fill: COLOR_NODE_FILL,
        header_fill: COLOR_NODE_HEADER,
        border,
        corner_radius: 8.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inferred_edges_are_dashed() {
        assert_eq!(get_edge_style(true, false).dash, Some([6.0, 4.0]));
        assert_eq!(get_edge_style(false, false).dash, None);
    }

    #[test]
    fn test_highlight_widens_and_shadows() {
        let normal = get_edge_style(false, false);
        let highlighted = get_edge_style(false, true);
        assert!(highlighted.stroke.width > normal.stroke.width);
        assert!(highlighted.shadow.is_some());
        assert!(normal.shadow.is_none());
    }

    #[test]
    fn test_selected_border_takes_precedence() {
        assert_eq!(get_node_style(true, true).border.color, COLOR_ACCENT);
    }
}
