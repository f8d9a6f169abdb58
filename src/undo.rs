//! Undo/redo history for landmark annotations.
//!
//! History is snapshot based: before every user mutation the full
//! [`AnnotationStore`] is copied onto the undo stack. A store holds at most 68
//! points, so whole-state snapshots stay cheap and restoring one is a plain
//! replace.

use std::collections::VecDeque;

use crate::constants::DEFAULT_MAX_UNDO_STEPS;
use crate::model::AnnotationStore;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the history stacks
#[derive(Debug, Clone)]
pub struct UndoConfig {
    /// Maximum number of snapshots kept on each stack
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_UNDO_STEPS,
        }
    }
}

// ============================================================================
// History Manager
// ============================================================================

/// Bounded undo/redo stacks of annotation snapshots.
///
/// - `undo_stack`: states to return to (most recent at the back)
/// - `redo_stack`: states undone since the last fresh edit (most recent at the back)
///
/// Pushing past `max_history` evicts the oldest snapshot from the front.
/// Recording a fresh edit clears the redo stack.
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    undo_stack: VecDeque<AnnotationStore>,
    redo_stack: VecDeque<AnnotationStore>,
    config: UndoConfig,
}

impl HistoryManager {
    /// Create empty history with the default depth
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Maximum depth of each stack
    pub fn max_depth(&self) -> usize {
        self.config.max_history
    }

    fn push_bounded(stack: &mut VecDeque<AnnotationStore>, state: AnnotationStore, max: usize) {
        stack.push_back(state);
        while stack.len() > max {
            stack.pop_front();
        }
    }

    /// Snapshot `current` ahead of a user mutation.
    /// This clears the redo stack (can't redo after a new action).
    pub fn record_before_mutation(&mut self, current: &AnnotationStore) {
        Self::push_bounded(
            &mut self.undo_stack,
            current.snapshot(),
            self.config.max_history,
        );
        self.redo_stack.clear();
        log::debug!(
            "📝 History: recorded state with {} points ({} undo steps)",
            current.len(),
            self.undo_stack.len()
        );
    }

    /// Step back. `current` moves to the redo stack and the previous state is
    /// returned, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: &AnnotationStore) -> Option<AnnotationStore> {
        let previous = self.undo_stack.pop_back()?;
        Self::push_bounded(
            &mut self.redo_stack,
            current.snapshot(),
            self.config.max_history,
        );
        log::debug!("⏪ Undo: restoring state with {} points", previous.len());
        Some(previous)
    }

    /// Step forward again after an undo. Symmetric to [`HistoryManager::undo`].
    pub fn redo(&mut self, current: &AnnotationStore) -> Option<AnnotationStore> {
        let next = self.redo_stack.pop_back()?;
        Self::push_bounded(
            &mut self.undo_stack,
            current.snapshot(),
            self.config.max_history,
        );
        log::debug!("⏩ Redo: restoring state with {} points", next.len());
        Some(next)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("🗑️ Undo history cleared");
    }

    /// Get the number of snapshots in undo history
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of snapshots in redo history
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
