//! Generation tickets for decode requests.
//!
//! A decode cannot be cancelled once started, so each request is tagged with
//! a [`Ticket`] taken from the component's [`Generation`]. When the decode
//! completes, its result is only delivered if the ticket is still the latest
//! one issued:
//!
//! ```rust
//! use imgdrop_input::Generation;
//!
//! let generation = Generation::default();
//! let first = generation.issue();
//! let second = generation.issue();
//!
//! // The first decode finished late; its result is dropped.
//! assert!(!generation.is_current(first));
//! assert!(generation.is_current(second));
//!
//! // Teardown makes every outstanding ticket stale.
//! generation.invalidate();
//! assert!(!generation.is_current(second));
//! ```

use std::cell::Cell;

/// Identifies one decode request of one component instance.
///
/// Higher values were issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic ticket counter owned by a single component instance.
///
/// Uses a `Cell` because every caller runs on the same event-loop thread.
#[derive(Debug, Default)]
pub struct Generation {
    latest: Cell<u64>,
}

impl Generation {
    /// Issues a new ticket, superseding all earlier ones.
    pub fn issue(&self) -> Ticket {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        Ticket(next)
    }

    /// Returns `true` if no ticket has been issued after `ticket`
    /// and the generation was not invalidated since.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.get() == ticket.0
    }

    /// Makes every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&self) {
        self.latest.set(self.latest.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_increase() {
        let generation = Generation::default();
        let a = generation.issue();
        let b = generation.issue();
        assert!(b > a);
        assert_eq!(b.value(), a.value() + 1);
    }

    #[test]
    fn only_latest_ticket_is_current() {
        let generation = Generation::default();
        let a = generation.issue();
        assert!(generation.is_current(a));

        let b = generation.issue();
        assert!(!generation.is_current(a));
        assert!(generation.is_current(b));
    }

    #[test]
    fn invalidate_then_issue_starts_fresh() {
        let generation = Generation::default();
        let a = generation.issue();
        generation.invalidate();
        assert!(!generation.is_current(a));

        let b = generation.issue();
        assert!(generation.is_current(b));
        assert_ne!(a, b);
    }

    #[test]
    fn separate_generations_are_independent() {
        let left = Generation::default();
        let right = Generation::default();
        let l = left.issue();
        right.issue();
        right.issue();
        assert!(left.is_current(l));
    }
}
