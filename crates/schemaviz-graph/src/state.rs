use crate::filter::{FilterCriteria, apply_filter};
use crate::geometry::Vec2;
use crate::history::{History, HistorySnapshot};
use crate::inference::infer_relationships;
use crate::layout::{GridLayouter, apply_layout, apply_layout_preserving, bounding_box};
use crate::model::{Edge, GraphStats, Node, NodePosition, VisibleGraph, VisibleNode};
use crate::settings::{GraphSettings, NodeMetrics};
use crate::viewport::{BackingStore, Viewport};
use schemaviz_core::{SchemaSnapshot, Table};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Everything the diagram needs between frames.
#[derive(Debug, Clone)]
pub struct GraphEngineState {
    pub settings: GraphSettings,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub viewport: Viewport,
    pub history: History,
    pub filter: FilterCriteria,
    pub selected: Option<String>,
    pub hovered_node: Option<String>,
    pub hovered_field: Option<(String, usize)>,
    /// Surface size the renderer should use; lags `viewport` while a resize
    /// is being debounced.
    pub backing_store: BackingStore,
}

impl Default for GraphEngineState {
    fn default() -> Self {
        Self::new(GraphSettings::default())
    }
}

impl GraphEngineState {
    pub fn new(settings: GraphSettings) -> Self {
        let settings = settings.validated();
        let viewport = Viewport::new(&settings);
        let backing_store = viewport.backing_store();
        Self {
            history: History::new(settings.history_capacity),
            viewport,
            backing_store,
            settings,
            nodes: Vec::new(),
            edges: Vec::new(),
            filter: FilterCriteria::default(),
            selected: None,
            hovered_node: None,
            hovered_field: None,
        }
    }

    pub fn node_metrics(&self) -> NodeMetrics {
        self.settings.node_metrics()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Replace nodes and edges from a fresh schema snapshot.
    ///
    /// Tables seen before keep their position; new ones get grid slots. The
    /// very first snapshot is laid out and centered.
    pub fn apply_schema(&mut self, snapshot: &SchemaSnapshot) {
        let metrics = self.node_metrics();
        let previous: HashMap<String, Vec2> = self
            .nodes
            .iter()
            .map(|n| (n.id.clone(), n.position))
            .collect();

        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(snapshot.tables.len());
        for table in &snapshot.tables {
            if !seen.insert(table.name.clone()) {
                tracing::warn!("Skipping duplicate table {:?} in schema snapshot", table.name);
                continue;
            }
            nodes.push(Node::new(Arc::new(table.clone()), &metrics));
        }

        let layouter = GridLayouter::from_settings(&self.settings);
        let kept = apply_layout_preserving(&layouter, &mut nodes, &previous);
        self.nodes = nodes;

        // Inference sees only the tables that became nodes, so every edge
        // endpoint exists.
        let tables: Vec<Table> = self.nodes.iter().map(|n| n.table.as_ref().clone()).collect();
        self.edges = infer_relationships(&tables);

        if let Some(selected) = &self.selected
            && self.node(selected).is_none()
        {
            self.selected = None;
        }
        self.hovered_node = None;
        self.hovered_field = None;

        apply_filter(&mut self.nodes, &self.filter);

        if previous.is_empty() {
            self.center_at_unit_zoom();
        }
        tracing::info!(
            tables = self.nodes.len(),
            edges = self.edges.len(),
            kept_positions = kept,
            "schema snapshot applied"
        );
        self.push_history();
    }

    /// Full relayout. Discards manual positions and records a history entry.
    pub fn auto_arrange(&mut self) {
        let layouter = GridLayouter::from_settings(&self.settings);
        apply_layout(&layouter, &mut self.nodes);
        self.refresh_node_sizes();
        self.center_at_unit_zoom();
        tracing::info!(nodes = self.nodes.len(), "auto-arrange");
        self.push_history();
    }

    fn center_at_unit_zoom(&mut self) {
        match bounding_box(&self.nodes) {
            Some(bounds) => self.viewport.center_on(bounds, 1.0),
            None => self.viewport.reset(),
        }
    }

    /// Fit all visible nodes into the canvas.
    pub fn fit_to_view(&mut self) {
        match bounding_box(self.nodes.iter().filter(|n| n.visible)) {
            Some(bounds) => self.viewport.fit(
                bounds,
                self.settings.fit_padding,
                self.settings.fit_max_zoom,
            ),
            None => self.viewport.reset(),
        }
    }

    pub fn refresh_node_sizes(&mut self) {
        let metrics = self.node_metrics();
        for node in &mut self.nodes {
            node.refresh_size(&metrics);
        }
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) -> usize {
        self.filter = criteria;
        let visible = apply_filter(&mut self.nodes, &self.filter);
        if let Some(hovered) = &self.hovered_node
            && !self.node(hovered).is_some_and(|n| n.visible)
        {
            self.hovered_node = None;
            self.hovered_field = None;
        }
        visible
    }

    pub fn capture_snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodePosition {
                    id: n.id.clone(),
                    x: n.position.x,
                    y: n.position.y,
                })
                .collect(),
            pan_x: self.viewport.pan.x,
            pan_y: self.viewport.pan.y,
            zoom: self.viewport.zoom(),
        }
    }

    pub fn push_history(&mut self) {
        let snapshot = self.capture_snapshot();
        self.history.push(snapshot);
    }

    /// Copy snapshot positions onto live nodes by id and reset the viewport.
    pub fn restore(&mut self, snapshot: &HistorySnapshot) {
        for saved in &snapshot.nodes {
            if let Some(node) = self.node_mut(&saved.id) {
                node.position = Vec2::new(saved.x, saved.y);
            }
        }
        self.viewport.set_zoom(snapshot.zoom);
        self.viewport
            .set_pan(Vec2::new(snapshot.pan_x, snapshot.pan_y));
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo().cloned() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo().cloned() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    fn is_visible(&self, id: &str) -> bool {
        self.node(id).is_some_and(|n| n.visible)
    }

    /// An edge is drawn only when both endpoints are visible.
    pub fn edge_visible(&self, edge: &Edge) -> bool {
        self.is_visible(&edge.from) && self.is_visible(&edge.to)
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| self.edge_visible(e))
    }

    pub fn visible_graph(&self) -> VisibleGraph {
        VisibleGraph {
            nodes: self
                .nodes
                .iter()
                .filter(|n| n.visible)
                .map(|n| VisibleNode {
                    id: n.id.clone(),
                    x: n.position.x,
                    y: n.position.y,
                    width: n.size.x,
                    height: n.size.y,
                })
                .collect(),
            edges: self.visible_edges().cloned().collect(),
        }
    }

    pub fn stats(&self) -> GraphStats {
        let typed = self.edges.iter().filter(|e| !e.inferred).count();
        GraphStats {
            table_count: self.nodes.len(),
            relationship_count: self.edges.len(),
            typed_relationships: typed,
            inferred_relationships: self.edges.len() - typed,
            visible_tables: self.nodes.iter().filter(|n| n.visible).count(),
            visible_relationships: self.visible_edges().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaviz_core::{Field, Table};

    fn schema() -> SchemaSnapshot {
        SchemaSnapshot::new(vec![
            Table::new("users")
                .with_document_count(2)
                .with_fields(vec![Field::new("name", "string")]),
            Table::new("posts").with_document_count(5).with_fields(vec![
                Field::new("title", "string"),
                Field::new("authorId", r#"Id<"users">"#),
            ]),
            Table::new("comments").with_fields(vec![Field::new("postId", "string")]),
        ])
    }

    fn state() -> GraphEngineState {
        let mut state = GraphEngineState::default();
        state.viewport.resize(1200.0, 800.0, 1.0);
        state.apply_schema(&schema());
        state
    }

    #[test]
    fn test_apply_schema_builds_graph() {
        let state = state();
        let stats = state.stats();
        assert_eq!(stats.table_count, 3);
        assert_eq!(stats.typed_relationships, 1);
        assert_eq!(stats.inferred_relationships, 1);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_reapply_keeps_positions() {
        let mut state = state();
        state.node_mut("users").unwrap().position = Vec2::new(-300.0, -300.0);
        let mut next = schema();
        next.tables.push(Table::new("likes"));
        state.apply_schema(&next);
        assert_eq!(state.node("users").unwrap().position, Vec2::new(-300.0, -300.0));
        assert!(state.node("likes").is_some());
    }

    #[test]
    fn test_duplicate_tables_are_collapsed() {
        let mut state = GraphEngineState::default();
        state.apply_schema(&SchemaSnapshot::new(vec![Table::new("a"), Table::new("a")]));
        assert_eq!(state.nodes.len(), 1);
    }

    #[test]
    fn test_skipped_duplicate_contributes_no_edges() {
        let mut state = GraphEngineState::default();
        state.apply_schema(&SchemaSnapshot::new(vec![
            Table::new("users"),
            Table::new("posts").with_fields(vec![Field::new("title", "string")]),
            Table::new("posts").with_fields(vec![
                Field::new("authorId", r#"Id<"users">"#),
                Field::new("userId", "string"),
            ]),
        ]));
        assert_eq!(state.nodes.len(), 2);
        assert!(state.edges.is_empty());
    }

    #[test]
    fn test_edge_hidden_with_endpoint() {
        let mut state = state();
        assert_eq!(state.visible_edges().count(), 2);
        state.set_filter(FilterCriteria {
            table_name_substring: "post".to_string(),
            ..Default::default()
        });
        // posts is visible, but neither users nor comments
        assert_eq!(state.visible_edges().count(), 0);
        assert_eq!(state.visible_graph().nodes.len(), 1);
    }

    #[test]
    fn test_undo_restores_positions_and_viewport() {
        let mut state = state();
        let original = state.node("posts").unwrap().position;
        state.node_mut("posts").unwrap().position = Vec2::new(999.0, 999.0);
        state.viewport.set_zoom(1.75);
        state.push_history();

        assert!(state.undo());
        assert_eq!(state.node("posts").unwrap().position, original);
        assert_eq!(state.viewport.zoom(), 1.0);
        assert!(!state.undo());

        assert!(state.redo());
        assert_eq!(state.node("posts").unwrap().position, Vec2::new(999.0, 999.0));
        assert_eq!(state.viewport.zoom(), 1.75);
    }

    #[test]
    fn test_auto_arrange_discards_manual_positions() {
        let mut state = state();
        state.node_mut("users").unwrap().position = Vec2::new(5000.0, 5000.0);
        state.auto_arrange();
        assert_eq!(state.node("users").unwrap().position, Vec2::ZERO);
        assert_eq!(state.viewport.zoom(), 1.0);
        assert_eq!(state.history.len(), 2);
    }

    #[test]
    fn test_fit_to_view_with_nothing_visible_resets() {
        let mut state = state();
        state.set_filter(FilterCriteria {
            table_name_substring: "zzz".to_string(),
            ..Default::default()
        });
        state.viewport.set_zoom(0.5);
        state.fit_to_view();
        assert_eq!(state.viewport.zoom(), 1.0);
        assert_eq!(state.viewport.pan, Vec2::ZERO);
    }
}
