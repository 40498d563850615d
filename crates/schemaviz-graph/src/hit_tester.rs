use crate::geometry::Vec2;
use crate::model::Node;
use crate::settings::NodeMetrics;

/// Result of a hit test at a world position.
///
/// Priority order: Field > Node > None
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitResult {
    None,
    Node(String),
    Field { node_id: String, field_index: usize },
}

impl HitResult {
    pub fn node_id(&self) -> Option<&str> {
        match self {
            HitResult::None => None,
            HitResult::Node(id) => Some(id),
            HitResult::Field { node_id, .. } => Some(node_id),
        }
    }
}

/// Hit testing against the live node list. Hidden nodes never match.
pub struct HitTester<'a> {
    nodes: &'a [Node],
    metrics: NodeMetrics,
}

impl<'a> HitTester<'a> {
    pub fn new(nodes: &'a [Node], metrics: NodeMetrics) -> Self {
        Self { nodes, metrics }
    }

    pub fn hit_test(&self, world: Vec2) -> HitResult {
        let Some(index) = self.node_index_at(world) else {
            return HitResult::None;
        };
        let node = &self.nodes[index];
        match self.field_at(node, world) {
            Some(field_index) => HitResult::Field {
                node_id: node.id.clone(),
                field_index,
            },
            None => HitResult::Node(node.id.clone()),
        }
    }

    /// Topmost visible node under `world`. Later nodes draw on top, so the
    /// list is walked in reverse.
    pub fn node_index_at(&self, world: Vec2) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, node)| node.visible && node.rect().contains(world))
            .map(|(index, _)| index)
    }

    pub fn node_at(&self, world: Vec2) -> Option<&'a Node> {
        self.node_index_at(world).map(|index| &self.nodes[index])
    }

    /// Field row under `world`, if `world` lies within `node`'s field rows.
    pub fn field_at(&self, node: &Node, world: Vec2) -> Option<usize> {
        if !node.rect().contains(world) {
            return None;
        }
        let offset = world.y - node.position.y - self.metrics.header_height;
        if offset < 0.0 {
            return None;
        }
        let index = (offset / self.metrics.field_row_height).floor() as usize;
        (index < node.fields().len()).then_some(index)
    }
}
