use crossbeam_channel::{Receiver, Sender, unbounded};
use schemaviz_core::TableName;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipInfo {
    pub table: TableName,
    pub field: String,
    pub field_type: String,
    pub optional: bool,
    /// Screen position (logical pixels) the tooltip should be anchored at.
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Selection
    TableSelected {
        name: TableName,
    },

    // Tooltip
    TooltipShow {
        info: TooltipInfo,
    },
    TooltipHide,

    // History
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },

    // ========================================================================
    // Commands owned by the host, forwarded from keyboard shortcuts
    // ========================================================================
    /// Switch between diagram and list/table view.
    ToggleViewMode,
    /// Show or hide the code/JSON side panel.
    ToggleSidePanel,
    ToggleFilterPanel,
    ToggleExportPanel,
    /// Ask the schema collaborator for a fresh snapshot.
    RefreshSchema,
    FocusSearch,
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        tracing::trace!(?event, "publish");
        let _ = self.tx.send(event);
    }

    /// Drain everything currently queued.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }

    /// Dispatch all pending events to a listener.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
