use crate::model::NodePosition;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Node positions plus viewport pan/zoom at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub nodes: Vec<NodePosition>,
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
}

/// Bounded linear undo/redo over spatial state.
///
/// Pushing after an undo drops the redo branch. Once full, the oldest entry
/// is evicted instead of growing.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistorySnapshot>,
    index: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            index: 0,
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: HistorySnapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push_back(snapshot);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
        tracing::debug!(len = self.entries.len(), index = self.index, "history push");
    }

    /// Step back; `None` at the oldest entry or when empty.
    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        tracing::debug!(index = self.index, "undo");
        self.entries.get(self.index)
    }

    /// Step forward; `None` at the newest entry or when empty.
    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        tracing::debug!(index = self.index, "redo");
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&HistorySnapshot> {
        self.entries.get(self.index)
    }

    /// Position of the current entry, `None` while empty.
    pub fn index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snap(marker: f32) -> HistorySnapshot {
        HistorySnapshot {
            nodes: vec![NodePosition {
                id: "users".to_string(),
                x: marker,
                y: 0.0,
            }],
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut history = History::default();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.index(), None);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::default();
        for i in 0..25 {
            history.push(snap(i as f32));
        }
        assert_eq!(history.len(), 20);
        assert_eq!(history.index(), Some(19));
        assert_eq!(history.current(), Some(&snap(24.0)));

        for _ in 0..20 {
            history.undo();
        }
        assert_eq!(history.current(), Some(&snap(5.0)));
        for _ in 0..20 {
            history.redo();
        }
        assert_eq!(history.current(), Some(&snap(24.0)));
    }

    #[test]
    fn test_push_after_undo_discards_redo_branch() {
        let mut history = History::default();
        history.push(snap(0.0));
        history.push(snap(1.0));
        history.push(snap(2.0));
        assert_eq!(history.undo(), Some(&snap(1.0)));
        history.push(snap(9.0));
        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some(&snap(1.0)));
        assert_eq!(history.undo(), Some(&snap(0.0)));
        assert_eq!(history.undo(), None);
    }

    proptest! {
        #[test]
        fn prop_index_always_in_bounds(ops in proptest::collection::vec(0u8..3, 0..100)) {
            let mut history = History::default();
            for (i, op) in ops.into_iter().enumerate() {
                match op {
                    0 => history.push(snap(i as f32)),
                    1 => { history.undo(); }
                    _ => { history.redo(); }
                }
                prop_assert!(history.len() <= 20);
                if let Some(index) = history.index() {
                    prop_assert!(index < history.len());
                }
            }
        }
    }
}
