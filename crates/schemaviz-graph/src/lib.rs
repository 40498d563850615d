pub mod commands;
pub mod edge_router;
pub mod filter;
pub mod geometry;
pub mod history;
pub mod hit_tester;
pub mod inference;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod render;
pub mod settings;
pub mod state;
pub mod style;
pub mod timer;
pub mod viewport;

pub use commands::{Command, KeyInput, Modifiers};
pub use edge_router::{Arrowhead, AttachmentSide, CubicBezier, EdgeLabel, EdgeRoute, EdgeRouter};
pub use filter::{FilterCriteria, apply_filter};
pub use geometry::{Rect, Vec2};
pub use history::{DEFAULT_HISTORY_CAPACITY, History, HistorySnapshot};
pub use hit_tester::{HitResult, HitTester};
pub use inference::infer_relationships;
pub use interaction::{CursorIcon, InteractionController, InteractionMode, PointerUpOutcome};
pub use layout::{GridLayouter, Layouter, apply_layout, apply_layout_preserving, bounding_box};
pub use model::{Edge, GraphStats, Node, NodePosition, VisibleGraph, VisibleNode};
pub use render::{DrawCommand, FrameStats, Painter, RecordingPainter, Renderer, TextAlign, Transform};
pub use settings::{GraphSettings, NodeMetrics};
pub use state::GraphEngineState;
pub use style::{Color, EdgeStyle, NodeStyle, Shadow, Stroke, get_edge_style, get_node_style};
pub use timer::{Clock, ManualClock, SystemClock, TimerHandle, TimerQueue};
pub use viewport::{BackingStore, Viewport};
