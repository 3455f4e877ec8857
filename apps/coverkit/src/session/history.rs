use crate::session::operations::Operation;

/// Bounded undo/redo stacks of inverse operations.
///
/// `undo` holds the operations that revert the most recent edits; `redo` holds the
/// ones that re-apply undone edits.
#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<Operation>,
    redo: Vec<Operation>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Records the inverse of a fresh edit. Clears the redo stack.
    pub fn record(&mut self, inverse: Operation) {
        self.redo.clear();
        self.push_undo(inverse);
    }

    pub(crate) fn push_undo(&mut self, inverse: Operation) {
        if self.limit == 0 {
            return;
        }
        self.undo.push(inverse);
        if self.undo.len() > self.limit {
            self.undo.remove(0);
        }
    }

    pub(crate) fn push_redo(&mut self, op: Operation) {
        self.redo.push(op);
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Operation> {
        self.undo.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Operation> {
        self.redo.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(text: &str) -> Operation {
        Operation::SetPostingText {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(2);
        history.record(op("a"));
        history.record(op("b"));
        history.record(op("c"));
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.pop_undo(), Some(op("c")));
        assert_eq!(history.pop_undo(), Some(op("b")));
        assert_eq!(history.pop_undo(), None);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new(10);
        history.push_redo(op("x"));
        assert!(history.can_redo());
        history.record(op("y"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_zero_limit_disables_undo() {
        let mut history = History::new(0);
        history.record(op("a"));
        assert!(!history.can_undo());
    }
}
