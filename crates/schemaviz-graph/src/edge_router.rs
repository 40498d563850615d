use crate::geometry::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Which side of a node an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl AttachmentSide {
    pub fn opposite(&self) -> Self {
        match self {
            AttachmentSide::Left => AttachmentSide::Right,
            AttachmentSide::Right => AttachmentSide::Left,
            AttachmentSide::Top => AttachmentSide::Bottom,
            AttachmentSide::Bottom => AttachmentSide::Top,
        }
    }

    /// Outward unit normal of this side.
    pub fn normal(&self) -> Vec2 {
        match self {
            AttachmentSide::Left => Vec2::new(-1.0, 0.0),
            AttachmentSide::Right => Vec2::new(1.0, 0.0),
            AttachmentSide::Top => Vec2::new(0.0, -1.0),
            AttachmentSide::Bottom => Vec2::new(0.0, 1.0),
        }
    }

    /// Midpoint of this side on `rect`.
    pub fn point_on(&self, rect: Rect) -> Vec2 {
        let center = rect.center();
        match self {
            AttachmentSide::Left => Vec2::new(rect.min.x, center.y),
            AttachmentSide::Right => Vec2::new(rect.max.x, center.y),
            AttachmentSide::Top => Vec2::new(center.x, rect.min.y),
            AttachmentSide::Bottom => Vec2::new(center.x, rect.max.y),
        }
    }
}

/// A cubic bezier curve segment defined by four control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl CubicBezier {
    /// Sample the curve at parameter t [0, 1]
    pub fn sample(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        self.start * mt3 + self.control1 * (3.0 * mt2 * t) + self.control2 * (3.0 * mt * t2)
            + self.end * t3
    }

    /// First derivative at t.
    pub fn tangent(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        (self.control1 - self.start) * (3.0 * mt * mt)
            + (self.control2 - self.control1) * (6.0 * mt * t)
            + (self.end - self.control2) * (3.0 * t * t)
    }

    /// Minimum distance from `point` to the curve, by uniform sampling.
    pub fn point_distance(&self, point: Vec2, num_samples: usize) -> f32 {
        let samples = num_samples.max(2);
        (0..=samples)
            .map(|i| self.sample(i as f32 / samples as f32).distance(point))
            .fold(f32::INFINITY, f32::min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    pub tip: Vec2,
    pub left: Vec2,
    pub right: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub text: String,
    /// Center of the text.
    pub anchor: Vec2,
    /// Rounded background behind the text.
    pub pill: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRoute {
    pub from_side: AttachmentSide,
    pub to_side: AttachmentSide,
    pub curve: CubicBezier,
    pub arrow: Arrowhead,
}

/// Attachment, curve and decoration geometry for edges between node rectangles.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRouter {
    /// Control point offset as a fraction of attachment distance.
    pub curvature: f32,
    pub max_control_offset: f32,
    pub arrow_length: f32,
    pub arrow_length_highlighted: f32,
    pub arrow_angle_deg: f32,
    pub label_offset: f32,
    pub label_padding_x: f32,
    pub label_height: f32,
}

impl Default for EdgeRouter {
    fn default() -> Self {
        Self {
            curvature: 0.4,
            max_control_offset: 100.0,
            arrow_length: 8.0,
            arrow_length_highlighted: 10.0,
            arrow_angle_deg: 30.0,
            label_offset: 12.0,
            label_padding_x: 10.0,
            label_height: 16.0,
        }
    }
}

impl EdgeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal attachment when centers differ more in x than in y,
    /// vertical otherwise.
    pub fn attachment_sides(&self, from: Rect, to: Rect) -> (AttachmentSide, AttachmentSide) {
        let delta = to.center() - from.center();
        let from_side = if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                AttachmentSide::Right
            } else {
                AttachmentSide::Left
            }
        } else if delta.y > 0.0 {
            AttachmentSide::Bottom
        } else {
            AttachmentSide::Top
        };
        (from_side, from_side.opposite())
    }

    pub fn route_edge(&self, from: Rect, to: Rect, highlighted: bool) -> EdgeRoute {
        let (from_side, to_side) = self.attachment_sides(from, to);
        let start = from_side.point_on(from);
        let end = to_side.point_on(to);
        let curve = self.calculate_curve(start, from_side, end, to_side);
        let arrow = self.arrowhead(&curve, highlighted);
        EdgeRoute {
            from_side,
            to_side,
            curve,
            arrow,
        }
    }

    fn calculate_curve(
        &self,
        start: Vec2,
        start_side: AttachmentSide,
        end: Vec2,
        end_side: AttachmentSide,
    ) -> CubicBezier {
        let offset = self.control_offset(start.distance(end));
        CubicBezier {
            start,
            control1: start + start_side.normal() * offset,
            control2: end + end_side.normal() * offset,
            end,
        }
    }

    pub fn control_offset(&self, distance: f32) -> f32 {
        let offset = (distance * self.curvature).min(self.max_control_offset);
        if offset.is_finite() { offset } else { 0.0 }
    }

    /// Two wings at +/- `arrow_angle_deg` from the end tangent.
    pub fn arrowhead(&self, curve: &CubicBezier, highlighted: bool) -> Arrowhead {
        let length = if highlighted {
            self.arrow_length_highlighted
        } else {
            self.arrow_length
        };

        let mut direction = curve.end - curve.control2;
        if direction.length() < f32::EPSILON {
            direction = curve.end - curve.start;
        }
        let angle = direction.y.atan2(direction.x);
        let spread = self.arrow_angle_deg.to_radians();
        let wing = |a: f32| curve.end - Vec2::new(a.cos(), a.sin()) * length;

        Arrowhead {
            tip: curve.end,
            left: wing(angle - spread),
            right: wing(angle + spread),
        }
    }

    /// Label centered on the curve midpoint, lifted above the curve.
    pub fn label(&self, curve: &CubicBezier, text: &str, text_width: f32) -> EdgeLabel {
        let mid = curve.sample(0.5);
        let anchor = Vec2::new(mid.x, mid.y - self.label_offset);
        EdgeLabel {
            text: text.to_string(),
            anchor,
            pill: Rect::from_center_size(
                anchor,
                Vec2::new(text_width + self.label_padding_x, self.label_height),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect(x: f32, y: f32) -> Rect {
        Rect::from_pos_size(Vec2::new(x, y), Vec2::new(100.0, 60.0))
    }

    #[test]
    fn test_horizontal_attachment() {
        let router = EdgeRouter::new();
        let route = router.route_edge(rect(0.0, 0.0), rect(400.0, 20.0), false);
        assert_eq!(route.from_side, AttachmentSide::Right);
        assert_eq!(route.to_side, AttachmentSide::Left);
        assert_eq!(route.curve.start, Vec2::new(100.0, 30.0));
        assert_eq!(route.curve.end, Vec2::new(400.0, 50.0));

        let back = router.route_edge(rect(400.0, 20.0), rect(0.0, 0.0), false);
        assert_eq!(back.from_side, AttachmentSide::Left);
        assert_eq!(back.to_side, AttachmentSide::Right);
    }

    #[test]
    fn test_vertical_attachment() {
        let router = EdgeRouter::new();
        let route = router.route_edge(rect(0.0, 300.0), rect(20.0, 0.0), false);
        assert_eq!(route.from_side, AttachmentSide::Top);
        assert_eq!(route.to_side, AttachmentSide::Bottom);
        assert_eq!(route.curve.start, Vec2::new(50.0, 300.0));
        assert_eq!(route.curve.end, Vec2::new(70.0, 60.0));
    }

    #[test]
    fn test_control_points_follow_normals() {
        let router = EdgeRouter::new();
        // Short edge: offset = 0.4 * distance
        let route = router.route_edge(rect(0.0, 0.0), rect(200.0, 0.0), false);
        assert_eq!(route.curve.control1, Vec2::new(140.0, 30.0));
        assert_eq!(route.curve.control2, Vec2::new(160.0, 30.0));

        // Long edge: offset capped at 100
        let route = router.route_edge(rect(0.0, 0.0), rect(1000.0, 0.0), false);
        assert_eq!(route.curve.control1, Vec2::new(200.0, 30.0));
        assert_eq!(route.curve.control2, Vec2::new(900.0, 30.0));
    }

    #[test]
    fn test_arrowhead_geometry() {
        let router = EdgeRouter::new();
        let route = router.route_edge(rect(0.0, 0.0), rect(400.0, 0.0), false);
        let arrow = route.arrow;
        assert_eq!(arrow.tip, route.curve.end);
        // Edge enters the target moving +x, so the wings trail behind the tip.
        assert!(arrow.left.x < arrow.tip.x && arrow.right.x < arrow.tip.x);
        assert!((arrow.left.distance(arrow.tip) - 8.0).abs() < 1e-4);
        assert!((arrow.left.y - arrow.right.y).abs() > 7.9);

        let highlighted = router.arrowhead(&route.curve, true);
        assert!((highlighted.right.distance(highlighted.tip) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_label_placement() {
        let router = EdgeRouter::new();
        let route = router.route_edge(rect(0.0, 0.0), rect(400.0, 0.0), false);
        let label = router.label(&route.curve, "authorId", 48.0);
        let mid = route.curve.sample(0.5);
        assert_eq!(label.anchor, Vec2::new(mid.x, mid.y - 12.0));
        assert_eq!(label.pill.size(), Vec2::new(58.0, 16.0));
        assert_eq!(label.pill.center(), label.anchor);
    }

    #[test]
    fn test_point_distance_on_curve_is_zero() {
        let router = EdgeRouter::new();
        let route = router.route_edge(rect(0.0, 0.0), rect(400.0, 100.0), false);
        assert!(route.curve.point_distance(route.curve.start, 32) < 1e-4);
        assert!(route.curve.point_distance(Vec2::new(-500.0, -500.0), 32) > 100.0);
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (0.0f32..1000.0, 0.0f32..1000.0, 10.0f32..300.0, 10.0f32..300.0)
            .prop_map(|(x, y, w, h)| Rect::from_pos_size(Vec2::new(x, y), Vec2::new(w, h)))
    }

    fn on_side(p: Vec2, r: Rect, side: AttachmentSide) -> bool {
        let eps = 1e-3;
        match side {
            AttachmentSide::Left => (p.x - r.min.x).abs() < eps,
            AttachmentSide::Right => (p.x - r.max.x).abs() < eps,
            AttachmentSide::Top => (p.y - r.min.y).abs() < eps,
            AttachmentSide::Bottom => (p.y - r.max.y).abs() < eps,
        }
    }

    proptest! {
        #[test]
        fn prop_endpoints_sit_on_chosen_sides(from in rect_strategy(), to in rect_strategy()) {
            let router = EdgeRouter::new();
            let route = router.route_edge(from, to, false);
            prop_assert!(on_side(route.curve.start, from, route.from_side));
            prop_assert!(on_side(route.curve.end, to, route.to_side));
            prop_assert_eq!(route.from_side.opposite(), route.to_side);
        }

        #[test]
        fn prop_control_offset_is_bounded(from in rect_strategy(), to in rect_strategy()) {
            let router = EdgeRouter::new();
            let route = router.route_edge(from, to, false);
            let c1 = route.curve.control1.distance(route.curve.start);
            let c2 = route.curve.control2.distance(route.curve.end);
            prop_assert!(c1 <= 100.0 + 1e-3);
            prop_assert!((c1 - c2).abs() < 1e-3);
        }
    }
}
