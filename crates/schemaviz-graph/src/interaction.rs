//! Pointer/keyboard state machine that owns the engine state.
//!
//! ```text
//! Idle --down on node--> DraggingNode --up/leave--> Idle
//! Idle --down on canvas--> Panning --up/leave--> Idle
//! ```
//! Hovering happens in `Idle` only and drives cursor feedback plus the
//! debounced field tooltip.

use crate::commands::{Command, KeyInput};
use crate::filter::FilterCriteria;
use crate::geometry::Vec2;
use crate::hit_tester::{HitResult, HitTester};
use crate::render::{FrameStats, Painter, Renderer};
use crate::settings::GraphSettings;
use crate::state::GraphEngineState;
use crate::timer::{Clock, SystemClock, TimerHandle, TimerQueue};
use schemaviz_core::SchemaSnapshot;
use schemaviz_events::{Event, EventBus, TooltipInfo};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionMode {
    Idle,
    Panning {
        start_pan: Vec2,
        start_pos: Vec2,
    },
    DraggingNode {
        node_id: String,
        start_position: Vec2,
        start_pos: Vec2,
        moved: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorIcon {
    Default,
    /// Over a node.
    Pointer,
    Grab,
    Grabbing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerUpOutcome {
    /// No gesture was in progress.
    Ignored,
    /// Under the movement threshold; selection only.
    Click,
    /// Movement was recorded in history.
    Committed,
}

#[derive(Debug, Clone)]
struct PendingTooltip {
    handle: TimerHandle,
    node_id: String,
    field_index: usize,
    anchor: Vec2,
}

pub struct InteractionController<C: Clock = SystemClock> {
    state: GraphEngineState,
    mode: InteractionMode,
    timers: TimerQueue<C>,
    events: EventBus,
    last_pointer: Option<Vec2>,
    pending_tooltip: Option<PendingTooltip>,
    tooltip: Option<TooltipInfo>,
    pending_resize: Option<TimerHandle>,
    needs_redraw: bool,
}

impl InteractionController<SystemClock> {
    pub fn with_system_clock(settings: GraphSettings, events: EventBus) -> Self {
        Self::new(settings, SystemClock::default(), events)
    }
}

impl<C: Clock> InteractionController<C> {
    pub fn new(settings: GraphSettings, clock: C, events: EventBus) -> Self {
        Self {
            state: GraphEngineState::new(settings),
            mode: InteractionMode::Idle,
            timers: TimerQueue::new(clock),
            events,
            last_pointer: None,
            pending_tooltip: None,
            tooltip: None,
            pending_resize: None,
            needs_redraw: true,
        }
    }

    pub fn state(&self) -> &GraphEngineState {
        &self.state
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn selected_table(&self) -> Option<&str> {
        self.state.selected.as_deref()
    }

    pub fn tooltip(&self) -> Option<&TooltipInfo> {
        self.tooltip.as_ref()
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn cursor(&self) -> CursorIcon {
        match self.mode {
            InteractionMode::DraggingNode { .. } => CursorIcon::Grabbing,
            InteractionMode::Panning { .. } => CursorIcon::Grab,
            InteractionMode::Idle if self.state.hovered_node.is_some() => CursorIcon::Pointer,
            InteractionMode::Idle => CursorIcon::Default,
        }
    }

    // ------------------------------------------------------------------
    // Schema and canvas
    // ------------------------------------------------------------------

    pub fn load_schema(&mut self, snapshot: &SchemaSnapshot) {
        self.cancel_gesture();
        self.cancel_tooltip();
        self.state.apply_schema(snapshot);
        self.publish_history_state();
        self.needs_redraw = true;
    }

    /// Must be called whenever the hosting container changes size. Logical
    /// size applies at once; backing-store reallocation waits for the
    /// debounce to expire (see [`Self::tick`]).
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.state.viewport.resize(width, height, device_pixel_ratio);
        if let Some(handle) = self.pending_resize.take() {
            self.timers.cancel(handle);
        }
        let delay = Duration::from_millis(self.state.settings.resize_debounce_ms);
        self.pending_resize = Some(self.timers.schedule(delay));
        self.needs_redraw = true;
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) -> usize {
        let visible = self.state.set_filter(criteria);
        if self.state.hovered_field.is_none() {
            self.cancel_tooltip();
        }
        self.needs_redraw = true;
        visible
    }

    /// Fire expired timers. Returns `true` if anything changed.
    pub fn tick(&mut self) -> bool {
        let mut fired = false;
        for handle in self.timers.take_due() {
            if self
                .pending_tooltip
                .as_ref()
                .is_some_and(|p| p.handle == handle)
                && let Some(pending) = self.pending_tooltip.take()
            {
                self.show_tooltip(pending);
                fired = true;
            } else if self.pending_resize == Some(handle) {
                self.pending_resize = None;
                self.state.backing_store = self.state.viewport.backing_store();
                self.needs_redraw = true;
                fired = true;
            }
        }
        fired
    }

    /// Delay until the next timer should fire, for hosts that sleep.
    pub fn next_timer_in(&self) -> Option<Duration> {
        self.timers.next_deadline_in()
    }

    pub fn render<P: Painter>(&mut self, renderer: &mut Renderer<P>) -> FrameStats {
        self.state.refresh_node_sizes();
        self.needs_redraw = false;
        renderer.render(&self.state)
    }

    // ------------------------------------------------------------------
    // Pointer input (screen coordinates, logical pixels)
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.cancel_tooltip();
        self.last_pointer = Some(pos);
        // Hover resumes on release; clearing it lets `pointer_up` re-arm the
        // tooltip for the row under the cursor.
        self.state.hovered_node = None;
        self.state.hovered_field = None;

        let world = self.state.viewport.screen_to_world(pos);
        let hit = HitTester::new(&self.state.nodes, self.state.node_metrics())
            .node_at(world)
            .map(|node| (node.id.clone(), node.position));

        self.mode = match hit {
            Some((node_id, start_position)) => {
                self.select(&node_id);
                InteractionMode::DraggingNode {
                    node_id,
                    start_position,
                    start_pos: pos,
                    moved: false,
                }
            }
            None => InteractionMode::Panning {
                start_pan: self.state.viewport.pan,
                start_pos: pos,
            },
        };
        tracing::debug!(mode = ?self.mode, "pointer down");
        self.needs_redraw = true;
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.last_pointer = Some(pos);
        match &mut self.mode {
            InteractionMode::DraggingNode {
                node_id,
                start_position,
                start_pos,
                moved,
            } => {
                let zoom = self.state.viewport.zoom();
                let target = *start_position + (pos - *start_pos) / zoom;
                if let Some(node) = self.state.nodes.iter_mut().find(|n| n.id == *node_id)
                    && node.position != target
                {
                    node.position = target;
                    *moved = true;
                    self.needs_redraw = true;
                }
            }
            InteractionMode::Panning {
                start_pan,
                start_pos,
            } => {
                let pan = *start_pan + (pos - *start_pos);
                self.state.viewport.set_pan(pan);
                self.needs_redraw = true;
            }
            InteractionMode::Idle => self.update_hover(pos),
        }
    }

    pub fn pointer_up(&mut self, pos: Vec2) -> PointerUpOutcome {
        self.last_pointer = Some(pos);
        let outcome = self.finish_gesture(pos);
        self.update_hover(pos);
        outcome
    }

    pub fn pointer_leave(&mut self) {
        if let Some(pos) = self.last_pointer {
            self.finish_gesture(pos);
        } else {
            self.mode = InteractionMode::Idle;
        }
        self.last_pointer = None;
        self.cancel_tooltip();
        if self.state.hovered_node.is_some() || self.state.hovered_field.is_some() {
            self.state.hovered_node = None;
            self.state.hovered_field = None;
            self.needs_redraw = true;
        }
    }

    /// Wheel zoom anchored at the cursor. Negative `delta_y` zooms in.
    pub fn wheel(&mut self, pos: Vec2, delta_y: f32) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y < 0.0 {
            self.state.settings.wheel_zoom_in
        } else {
            self.state.settings.wheel_zoom_out
        };
        self.state.viewport.zoom_by(factor, pos);
        self.needs_redraw = true;
    }

    fn finish_gesture(&mut self, pos: Vec2) -> PointerUpOutcome {
        let threshold = self.state.settings.click_threshold;
        let outcome = match std::mem::replace(&mut self.mode, InteractionMode::Idle) {
            InteractionMode::Idle => PointerUpOutcome::Ignored,
            InteractionMode::Panning { start_pos, .. } => {
                if pos.distance(start_pos) > threshold {
                    PointerUpOutcome::Committed
                } else {
                    PointerUpOutcome::Click
                }
            }
            InteractionMode::DraggingNode {
                start_pos, moved, ..
            } => {
                if moved || pos.distance(start_pos) > threshold {
                    PointerUpOutcome::Committed
                } else {
                    PointerUpOutcome::Click
                }
            }
        };

        if outcome == PointerUpOutcome::Committed {
            self.state.push_history();
            self.publish_history_state();
        }
        tracing::debug!(?outcome, "gesture finished");
        outcome
    }

    fn cancel_gesture(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    fn select(&mut self, node_id: &str) {
        if self.state.selected.as_deref() != Some(node_id) {
            self.state.selected = Some(node_id.to_string());
            self.events.publish(Event::TableSelected {
                name: node_id.to_string(),
            });
        }
    }

    // ------------------------------------------------------------------
    // Hover and tooltip
    // ------------------------------------------------------------------

    fn update_hover(&mut self, pos: Vec2) {
        let world = self.state.viewport.screen_to_world(pos);
        let hit = HitTester::new(&self.state.nodes, self.state.node_metrics()).hit_test(world);

        let hovered_node = hit.node_id().map(str::to_string);
        if hovered_node != self.state.hovered_node {
            self.state.hovered_node = hovered_node;
            self.needs_redraw = true;
        }

        let field_target = match hit {
            HitResult::Field {
                node_id,
                field_index,
            } => Some((node_id, field_index)),
            _ => None,
        };
        if field_target == self.state.hovered_field {
            return;
        }

        self.cancel_tooltip();
        self.state.hovered_field = field_target.clone();
        self.needs_redraw = true;

        if let Some((node_id, field_index)) = field_target {
            let delay = Duration::from_millis(self.state.settings.tooltip_delay_ms);
            let handle = self.timers.schedule(delay);
            self.pending_tooltip = Some(PendingTooltip {
                handle,
                node_id,
                field_index,
                anchor: pos,
            });
        }
    }

    fn cancel_tooltip(&mut self) {
        if let Some(pending) = self.pending_tooltip.take() {
            self.timers.cancel(pending.handle);
        }
        if self.tooltip.take().is_some() {
            self.events.publish(Event::TooltipHide);
        }
    }

    fn show_tooltip(&mut self, pending: PendingTooltip) {
        let Some(node) = self.state.node(&pending.node_id) else {
            return;
        };
        let Some(field) = node.table.field(pending.field_index) else {
            return;
        };
        let info = TooltipInfo {
            table: node.id.clone(),
            field: field.name.clone(),
            field_type: field.field_type.clone(),
            optional: field.optional,
            x: pending.anchor.x,
            y: pending.anchor.y,
        };
        self.events.publish(Event::TooltipShow { info: info.clone() });
        self.tooltip = Some(info);
    }

    // ------------------------------------------------------------------
    // Commands (keyboard + toolbar)
    // ------------------------------------------------------------------

    /// Map and run a keyboard shortcut. Returns the command that ran.
    pub fn handle_key(&mut self, input: KeyInput) -> Option<Command> {
        let command = Command::from_key(&input)?;
        self.execute(command);
        Some(command)
    }

    pub fn execute(&mut self, command: Command) {
        tracing::debug!(?command, "execute");
        match command {
            Command::ZoomIn => self.zoom_in(),
            Command::ZoomOut => self.zoom_out(),
            Command::ZoomReset => self.set_zoom(1.0),
            Command::FitToView => self.fit_to_view(),
            Command::AutoArrange => self.auto_arrange(),
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
            Command::ToggleViewMode => self.events.publish(Event::ToggleViewMode),
            Command::ToggleSidePanel => self.events.publish(Event::ToggleSidePanel),
            Command::ToggleFilterPanel => self.events.publish(Event::ToggleFilterPanel),
            Command::ToggleExportPanel => self.events.publish(Event::ToggleExportPanel),
            Command::RefreshSchema => self.events.publish(Event::RefreshSchema),
            Command::FocusSearch => self.events.publish(Event::FocusSearch),
        }
    }

    pub fn zoom_in(&mut self) {
        let step = self.state.settings.zoom_step;
        let center = self.state.viewport.canvas_center();
        self.state.viewport.zoom_by(step, center);
        self.needs_redraw = true;
    }

    pub fn zoom_out(&mut self) {
        let step = self.state.settings.zoom_step;
        let center = self.state.viewport.canvas_center();
        self.state.viewport.zoom_by(1.0 / step, center);
        self.needs_redraw = true;
    }

    /// Zoom anchored at the canvas center.
    pub fn set_zoom(&mut self, zoom: f32) {
        let center = self.state.viewport.canvas_center();
        self.state.viewport.zoom_to(center, zoom);
        self.needs_redraw = true;
    }

    pub fn fit_to_view(&mut self) {
        self.state.fit_to_view();
        self.needs_redraw = true;
    }

    pub fn auto_arrange(&mut self) {
        self.cancel_gesture();
        self.cancel_tooltip();
        self.state.auto_arrange();
        self.publish_history_state();
        self.needs_redraw = true;
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.state.undo();
        if changed {
            self.publish_history_state();
            self.needs_redraw = true;
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.state.redo();
        if changed {
            self.publish_history_state();
            self.needs_redraw = true;
        }
        changed
    }

    fn publish_history_state(&self) {
        self.events.publish(Event::HistoryChanged {
            can_undo: self.state.history.can_undo(),
            can_redo: self.state.history.can_redo(),
        });
    }
}
