//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2: the first two successful reviews use fixed intervals
//! of 1 and 6 days, later ones multiply the previous interval by the ease
//! factor. A lapse restarts the streak without touching the ease factor.

use super::ReviewScheduler;
use crate::error::{Error, Result};
use crate::types::{
    validate_ease_factor, Quality, ReviewState, DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR,
    MIN_INTERVAL_DAYS,
};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    /// Raises the ease floor; values below 1.3 have no effect.
    pub minimum_ease: f64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: DEFAULT_EASE_FACTOR,
            minimum_ease: MIN_EASE_FACTOR,
        }
    }
}

impl ReviewScheduler for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self) -> ReviewState {
        ReviewState {
            interval: MIN_INTERVAL_DAYS,
            ease_factor: self.initial_ease.max(self.ease_floor()),
            repetitions: 0,
        }
    }

    fn compute_next(&self, current: &ReviewState, quality: Quality) -> Result<ReviewState> {
        let ease_factor = validate_ease_factor(current.ease_factor)?;

        let (interval, ease_factor, repetitions) = if quality.is_success() {
            self.schedule_success(current, ease_factor, quality)
        } else {
            (1, ease_factor, 0)
        };

        Ok(ReviewState {
            interval: interval.max(MIN_INTERVAL_DAYS),
            ease_factor: ease_factor.max(self.ease_floor()),
            repetitions,
        })
    }
}

impl Sm2 {
    /// Effective ease floor; never below [`MIN_EASE_FACTOR`].
    pub fn ease_floor(&self) -> f64 {
        if self.minimum_ease.is_nan() {
            return MIN_EASE_FACTOR;
        }
        self.minimum_ease.max(MIN_EASE_FACTOR)
    }

    fn schedule_success(
        &self,
        current: &ReviewState,
        ease: f64,
        quality: Quality,
    ) -> (u32, f64, u32) {
        let interval = match current.repetitions {
            0 => 1,
            1 => 6,
            // `as` saturates, so absurdly long intervals stay at u32::MAX
            _ => (f64::from(current.interval) * ease).round() as u32,
        };

        let miss = f64::from(Quality::MAX - quality.value());
        let new_ease = ease + (0.1 - miss * (0.08 + miss * 0.02));

        (interval, new_ease, current.repetitions.saturating_add(1))
    }

    /// Schedule from untyped prior fields, as received from a loosely typed caller.
    pub fn compute_next_raw(
        &self,
        interval: i64,
        ease_factor: f64,
        repetitions: i64,
        quality: i64,
    ) -> Result<ReviewState> {
        let quality = Quality::try_from(quality)?;
        let current = ReviewState {
            interval: non_negative("interval", interval)?,
            ease_factor,
            repetitions: non_negative("repetitions", repetitions)?,
        };
        self.compute_next(&current, quality)
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<u32> {
    if value < 0 {
        return Err(Error::NegativeField {
            field,
            value: value as f64,
        });
    }
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}
