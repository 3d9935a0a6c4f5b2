//! One-shot start selection shared by interactive backends.

use wavefront_core::GridPosition;

/// State of a start selection session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SelectionOutcome {
    /// No start has been chosen yet.
    #[default]
    Pending,
    /// The user picked this one-based cell.
    Selected(GridPosition),
    /// The session ended without a choice.
    Cancelled,
}

/// Collects a single start position from pointer input.
///
/// The first offer resolves the session. Later offers and cancellations are
/// ignored so a second click can never replace a start that is already being
/// planned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StartSelection {
    outcome: SelectionOutcome,
}

impl StartSelection {
    /// Creates a pending session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a candidate start. Returns `true` if this offer resolved the session.
    pub fn offer(&mut self, position: GridPosition) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.outcome = SelectionOutcome::Selected(position);
        true
    }

    /// Cancels a pending session. Returns `true` if the session was still pending.
    pub fn cancel(&mut self) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.outcome = SelectionOutcome::Cancelled;
        true
    }

    /// Current state of the session.
    #[must_use]
    pub const fn outcome(&self) -> SelectionOutcome {
        self.outcome
    }

    /// Whether the session has been resolved either way.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self.outcome, SelectionOutcome::Pending)
    }

    /// Chosen start, if one was selected.
    #[must_use]
    pub const fn selected(&self) -> Option<GridPosition> {
        match self.outcome {
            SelectionOutcome::Selected(position) => Some(position),
            SelectionOutcome::Pending | SelectionOutcome::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_offer_wins() {
        let mut selection = StartSelection::new();
        assert_eq!(selection.outcome(), SelectionOutcome::Pending);

        assert!(selection.offer(GridPosition::new(3, 4)));
        assert!(!selection.offer(GridPosition::new(1, 1)));

        assert_eq!(selection.selected(), Some(GridPosition::new(3, 4)));
    }

    #[test]
    fn cancellation_only_applies_while_pending() {
        let mut cancelled = StartSelection::new();
        assert!(cancelled.cancel());
        assert!(!cancelled.offer(GridPosition::new(2, 2)));
        assert_eq!(cancelled.outcome(), SelectionOutcome::Cancelled);
        assert_eq!(cancelled.selected(), None);

        let mut selected = StartSelection::new();
        assert!(selected.offer(GridPosition::new(2, 2)));
        assert!(!selected.cancel());
        assert!(selected.is_resolved());
        assert_eq!(selected.selected(), Some(GridPosition::new(2, 2)));
    }
}
