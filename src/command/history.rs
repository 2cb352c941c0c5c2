use thiserror::Error;

/// Errors raised when the history cannot move in the requested direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NoPriorVersion,
    #[error("Nothing to redo")]
    NoNewerVersion,
    #[error("History is empty")]
    EmptyHistory,
}

/// Linear undo/redo history over full snapshots.
///
/// The history is a list of snapshots plus a cursor. Committing while the
/// cursor is not at the end drops the redo branch before appending, so the
/// list always reads oldest to newest along a single timeline.
#[derive(Debug, Clone)]
pub struct EditHistory<T> {
    /// Snapshots, oldest first
    snapshots: Vec<T>,
    /// Index of the current snapshot, `None` iff `snapshots` is empty
    cursor: Option<usize>,
    /// Oldest snapshots are dropped once this many are stored
    max_snapshots: Option<usize>,
}

impl<T> Default for EditHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EditHistory<T> {
    /// Creates a new empty history without a size limit
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
            cursor: None,
            max_snapshots: None,
        }
    }

    /// Creates a new empty history that keeps at most `max_snapshots` entries
    pub fn with_capacity_limit(max_snapshots: usize) -> Self {
        let mut history = Self::new();
        history.set_capacity_limit(Some(max_snapshots));
        history
    }

    /// Changes the size limit, trimming the oldest snapshots if needed.
    /// A limit of zero is treated as one: the current snapshot is always kept.
    pub fn set_capacity_limit(&mut self, max_snapshots: Option<usize>) {
        self.max_snapshots = max_snapshots.map(|max| max.max(1));
        self.enforce_limit();
    }

    pub fn capacity_limit(&self) -> Option<usize> {
        self.max_snapshots
    }

    /// Appends a snapshot after the cursor and makes it current.
    ///
    /// Everything after the cursor (the redo branch) is discarded first.
    pub fn commit(&mut self, snapshot: T) {
        if let Some(cursor) = self.cursor {
            self.snapshots.truncate(cursor + 1);
        }
        self.snapshots.push(snapshot);
        self.cursor = Some(self.snapshots.len() - 1);
        self.enforce_limit();
    }

    /// Drops every snapshot and starts a new timeline from `snapshot`
    pub fn reset(&mut self, snapshot: T) {
        self.clear();
        self.commit(snapshot);
    }

    /// Moves the cursor one step back and returns the snapshot there
    pub fn undo(&mut self) -> Result<&T, HistoryError> {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                Ok(&self.snapshots[cursor - 1])
            }
            _ => Err(HistoryError::NoPriorVersion),
        }
    }

    /// Moves the cursor one step forward and returns the snapshot there
    pub fn redo(&mut self) -> Result<&T, HistoryError> {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.snapshots.len() => {
                self.cursor = Some(cursor + 1);
                Ok(&self.snapshots[cursor + 1])
            }
            _ => Err(HistoryError::NoNewerVersion),
        }
    }

    /// Returns the snapshot at the cursor
    pub fn current(&self) -> Result<&T, HistoryError> {
        self.cursor
            .map(|cursor| &self.snapshots[cursor])
            .ok_or(HistoryError::EmptyHistory)
    }

    /// Returns true if there are snapshots before the cursor
    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    /// Returns true if there are snapshots after the cursor
    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor + 1 < self.snapshots.len())
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Iterates over all snapshots, oldest first, including the redo branch
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.snapshots.iter()
    }

    /// Clear the history
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
    }

    fn enforce_limit(&mut self) {
        let (Some(max), Some(cursor)) = (self.max_snapshots, self.cursor) else {
            return;
        };
        if self.snapshots.len() <= max {
            return;
        }
        // The redo branch goes first, then the oldest snapshots.
        self.snapshots.truncate(max.max(cursor + 1));
        let excess = self.snapshots.len().saturating_sub(max);
        self.snapshots.drain(..excess);
        self.cursor = Some(cursor - excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_limit_keeps_cursor_on_same_snapshot() {
        let mut history = EditHistory::with_capacity_limit(3);
        for value in 0..5 {
            history.commit(value);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(history.current(), Ok(&4));
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_lowering_limit_drops_redo_branch_first() {
        let mut history = EditHistory::new();
        for value in 0..5 {
            history.commit(value);
        }
        history.undo().unwrap();
        history.undo().unwrap();
        assert_eq!(history.current(), Ok(&2));

        history.set_capacity_limit(Some(2));

        assert_eq!(history.current(), Ok(&2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_zero_limit_keeps_current() {
        let mut history = EditHistory::with_capacity_limit(0);
        history.commit("a");
        history.commit("b");
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), Ok(&"b"));
    }
}
