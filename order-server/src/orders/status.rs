//! Order status transitions
//!
//! ```text
//! Pending ──► Processing ──► Completed
//!    │             │
//!    └──► Completed └──► Cancelled
//! ```
//!
//! Pending → Cancelled goes through `OrderLifecycle::cancel`, which gives
//! the reserved stock back. Completed and Cancelled are terminal.

use shared::models::OrderStatus;

/// Whether `change_status` may move an order from `from` to `to`.
/// Staying in the same status is always allowed.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;

    if from == to {
        return true;
    }
    if from.is_terminal() {
        return false;
    }
    matches!(
        (from, to),
        (Pending, Processing) | (Pending, Completed) | (Processing, Completed) | (Processing, Cancelled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_forward_moves_allowed() {
        assert!(can_transition(Pending, Processing));
        assert!(can_transition(Pending, Completed));
        assert!(can_transition(Processing, Completed));
        assert!(can_transition(Processing, Cancelled));
    }

    #[test]
    fn test_terminal_statuses_are_final() {
        for to in [Pending, Processing] {
            assert!(!can_transition(Completed, to));
            assert!(!can_transition(Cancelled, to));
        }
        assert!(!can_transition(Completed, Cancelled));
        assert!(!can_transition(Cancelled, Completed));
    }

    #[test]
    fn test_no_way_back_to_pending() {
        assert!(!can_transition(Processing, Pending));
    }

    #[test]
    fn test_pending_cancel_not_a_plain_transition() {
        assert!(!can_transition(Pending, Cancelled));
    }

    #[test]
    fn test_same_status_is_noop() {
        for status in OrderStatus::ALL {
            assert!(can_transition(status, status));
        }
    }
}
