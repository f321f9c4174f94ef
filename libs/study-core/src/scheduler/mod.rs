//! Spaced repetition scheduling.

pub mod sm2;

pub use sm2::Sm2;

use crate::error::Result;
use crate::types::{Card, Quality, ReviewState};

/// Trait for spaced repetition schedulers.
///
/// Implementations are pure: they never mutate their input and perform no I/O.
pub trait ReviewScheduler: Send + Sync {
    /// Scheduler identifier.
    fn name(&self) -> &'static str;

    /// Scheduling parameters for a card that has never been graded.
    fn initial_state(&self) -> ReviewState;

    /// Calculate the next review parameters after a grading.
    fn compute_next(&self, current: &ReviewState, quality: Quality) -> Result<ReviewState>;

    /// Never-reviewed card starting from [`initial_state`](Self::initial_state).
    fn new_card(
        &self,
        id: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Card
    where
        Self: Sized,
    {
        Card::with_state(id, front, back, self.initial_state())
    }

    /// Whether a rating counts as recalled. Recalled cards leave the session.
    fn is_success(&self, quality: Quality) -> bool {
        quality.is_success()
    }
}

/// Compute the next state with the default SM-2 parameters.
pub fn compute_next(current: &ReviewState, quality: Quality) -> Result<ReviewState> {
    Sm2::default().compute_next(current, quality)
}
