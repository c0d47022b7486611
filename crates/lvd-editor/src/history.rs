//! Undo/redo history over whole-document snapshots.
//!
//! Each state is an immutable `Arc<T>`; recording an edit pushes the old
//! snapshot onto `past` and replaces `present`. Snapshots are shared, so
//! an undo step costs one pointer, not one document copy.
//!
//! Drag gestures use **snapshot batching**: `begin_batch` remembers the
//! present, intermediate states are written through without entries, and
//! `end_batch` records one entry spanning the whole gesture.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;

/// One labeled snapshot on the undo or redo side.
#[derive(Debug, Clone)]
pub struct HistoryItem<T> {
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub state: Arc<T>,
}

impl<T> HistoryItem<T> {
    fn new(label: impl Into<String>, state: Arc<T>) -> Self {
        Self {
            label: label.into(),
            timestamp: Utc::now(),
            state,
        }
    }
}

/// One row of the history menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// `jump_to` target for undo rows, redo distance for redo rows.
    pub index: usize,
    pub label: String,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of both sides of the history for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryMenu {
    /// Oldest first.
    pub undo: Vec<MenuEntry>,
    /// Soonest redo first.
    pub redo: Vec<MenuEntry>,
}

#[derive(Debug)]
pub struct History<T> {
    /// Oldest first.
    past: Vec<HistoryItem<T>>,
    present: Arc<T>,
    /// Soonest redo first.
    future: VecDeque<HistoryItem<T>>,
    /// Cap on `past`; `None` keeps everything.
    max_depth: Option<usize>,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Present captured when the outermost batch opened.
    batch_snapshot: Option<Arc<T>>,
}

impl<T> History<T> {
    pub fn new(initial: T) -> Self {
        Self::from_parts(Vec::new(), Arc::new(initial), Vec::new())
    }

    /// Rebuild a history from saved parts (`future` soonest first).
    pub fn from_parts(
        past: Vec<HistoryItem<T>>,
        present: Arc<T>,
        future: Vec<HistoryItem<T>>,
    ) -> Self {
        Self {
            past,
            present,
            future: future.into(),
            max_depth: None,
            batch_depth: 0,
            batch_snapshot: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self.trim();
        self
    }

    pub fn present(&self) -> &Arc<T> {
        &self.present
    }

    pub fn past(&self) -> &[HistoryItem<T>] {
        &self.past
    }

    pub fn future(&self) -> impl Iterator<Item = &HistoryItem<T>> {
        self.future.iter()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    pub fn menu(&self) -> HistoryMenu {
        let row = |index: usize, item: &HistoryItem<T>| MenuEntry {
            index,
            label: item.label.clone(),
            timestamp: item.timestamp,
        };
        HistoryMenu {
            undo: self.past.iter().enumerate().map(|(i, it)| row(i, it)).collect(),
            redo: self
                .future
                .iter()
                .enumerate()
                .map(|(i, it)| row(i + 1, it))
                .collect(),
        }
    }

    // ─── Recording ───────────────────────────────────────────────────────

    /// Record `next` as the new present. Returns `false` (and records
    /// nothing) when `next` is the present snapshot itself.
    ///
    /// Inside a batch the state is written through without an entry.
    pub fn set(&mut self, next: Arc<T>, label: &str) -> bool {
        if Arc::ptr_eq(&next, &self.present) {
            return false;
        }
        if self.batch_depth > 0 {
            log::trace!("history: write-through \"{label}\"");
            self.present = next;
            return true;
        }
        let old = std::mem::replace(&mut self.present, next);
        self.push_past(HistoryItem::new(label, old));
        log::debug!("history: set \"{label}\" (past={})", self.past.len());
        true
    }

    /// Functional form of [`set`](Self::set): `update` sees the current
    /// present and returns the next state, or the same `Arc` to reject.
    pub fn set_with(&mut self, label: &str, update: impl FnOnce(&Arc<T>) -> Arc<T>) -> bool {
        let next = update(&self.present);
        self.set(next, label)
    }

    fn push_past(&mut self, item: HistoryItem<T>) {
        self.past.push(item);
        self.trim();
        self.future.clear();
    }

    fn trim(&mut self) {
        if let Some(max) = self.max_depth
            && self.past.len() > max
        {
            let excess = self.past.len() - max;
            self.past.drain(..excess);
        }
    }

    // ─── Batching ────────────────────────────────────────────────────────

    /// Start a batch group. Captures the present so that every state
    /// written until `end_batch()` becomes one undo step.
    pub fn begin_batch(&mut self) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(Arc::clone(&self.present));
        }
        self.batch_depth += 1;
    }

    /// Close a batch group. When the outermost batch closes and the
    /// present differs from the captured snapshot, one entry labeled
    /// `label` is recorded. Returns whether an entry was recorded.
    pub fn end_batch(&mut self, label: &str) -> bool
    where
        T: PartialEq,
    {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }
        let Some(before) = self.batch_snapshot.take() else {
            return false;
        };
        if Arc::ptr_eq(&before, &self.present) || *before == *self.present {
            // Net no-op gesture; keep the original snapshot as present.
            self.present = before;
            return false;
        }
        self.push_past(HistoryItem::new(label, before));
        log::debug!("history: batch \"{label}\" (past={})", self.past.len());
        true
    }

    // ─── Navigation ──────────────────────────────────────────────────────

    /// Step back one entry. No-op on an empty past or while batching.
    pub fn undo(&mut self) -> bool {
        if self.batch_depth > 0 {
            log::warn!("history: undo ignored while a batch is open");
            return false;
        }
        let Some(item) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, item.state);
        log::debug!("history: undo \"{}\"", item.label);
        self.future.push_front(HistoryItem::new(item.label, current));
        true
    }

    /// Step forward one entry. No-op on an empty future or while batching.
    pub fn redo(&mut self) -> bool {
        if self.batch_depth > 0 {
            log::warn!("history: redo ignored while a batch is open");
            return false;
        }
        let Some(item) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, item.state);
        log::debug!("history: redo \"{}\"", item.label);
        self.past.push(HistoryItem::new(item.label, current));
        true
    }

    /// Restore `past[index]` as the present. Everything after it, and the
    /// old present, moves to the redo side in replay order.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.past.len() || self.batch_depth > 0 {
            return false;
        }
        let steps = self.past.len() - index;
        for _ in 0..steps {
            self.undo();
        }
        true
    }
}
