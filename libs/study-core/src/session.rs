//! Study session queue.
//!
//! A session owns the cards loaded for one study run. The head of the queue is
//! the card on screen. Grading it either retires the card (recalled) or sends
//! it to the back of the queue so the learner sees the other cards before
//! retrying a miss. The session ends when the queue drains, when the number of
//! gradings reaches the session limit, or when an optional time limit passes.

use crate::error::{Error, Result};
use crate::scheduler::{ReviewScheduler, Sm2};
use crate::settings::EffectiveSettings;
use crate::types::{ButtonRating, Card, CardRecord, Quality, ReviewStatus};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Session lifecycle. `Complete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Complete,
}

/// Parameters fixed at session start.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Maximum number of gradings before the session completes.
    pub session_limit: usize,
    /// Apply one random permutation at construction.
    pub shuffle: bool,
    pub time_limit: Option<Duration>,
    pub started_at: DateTime<Utc>,
}

impl SessionConfig {
    pub fn new(session_limit: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            session_limit,
            shuffle: false,
            time_limit: None,
            started_at,
        }
    }

    pub fn from_settings(settings: &EffectiveSettings, started_at: DateTime<Utc>) -> Self {
        Self {
            session_limit: settings.session_limit,
            shuffle: settings.shuffle,
            time_limit: settings.time_limit(),
            started_at,
        }
    }
}

/// Outcome of one grading, for the caller to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub card_id: String,
    pub quality: Quality,
    pub status: ReviewStatus,
    pub new_interval: u32,
    pub new_ease_factor: f64,
    pub new_repetitions: u32,
    pub timestamp: DateTime<Utc>,
    /// Whether the card went back into the queue.
    pub requeued: bool,
}

/// Running tally shown on the study screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub studied: usize,
    pub learned: usize,
    pub repeated: usize,
    pub skipped: usize,
}

impl SessionStats {
    /// Share of gradings that were recalled, `None` before the first grading.
    pub fn accuracy(&self) -> Option<f64> {
        if self.studied == 0 {
            None
        } else {
            Some(self.learned as f64 / self.studied as f64)
        }
    }
}

/// Ordered working set of cards for one study session.
#[derive(Debug)]
pub struct SessionQueue<S: ReviewScheduler = Sm2> {
    queue: VecDeque<Card>,
    finished: Vec<Card>,
    scheduler: S,
    state: SessionState,
    session_limit: usize,
    started_at: DateTime<Utc>,
    time_limit: Option<Duration>,
    stats: SessionStats,
}

impl SessionQueue<Sm2> {
    /// Create a session using the default SM-2 scheduler.
    pub fn new(cards: Vec<Card>, config: SessionConfig) -> Self {
        Self::with_scheduler(cards, config, Sm2::default())
    }

    /// Validate store records and create a session from them.
    pub fn from_records(records: Vec<CardRecord>, config: SessionConfig) -> Result<Self> {
        Self::from_records_with_scheduler(records, config, Sm2::default())
    }
}

impl<S: ReviewScheduler> SessionQueue<S> {
    /// Validate store records, filling missing fields from the scheduler's initial state.
    pub fn from_records_with_scheduler(
        records: Vec<CardRecord>,
        config: SessionConfig,
        scheduler: S,
    ) -> Result<Self> {
        let initial = scheduler.initial_state();
        let cards = records
            .into_iter()
            .map(|record| record.into_card(initial))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::with_scheduler(cards, config, scheduler))
    }

    pub fn with_scheduler(cards: Vec<Card>, config: SessionConfig, scheduler: S) -> Self {
        Self::with_rng(cards, config, scheduler, &mut rand::rng())
    }

    /// Create a session drawing the shuffle permutation from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        mut cards: Vec<Card>,
        config: SessionConfig,
        scheduler: S,
        rng: &mut R,
    ) -> Self {
        if config.shuffle {
            cards.shuffle(rng);
        }

        let mut session = Self {
            queue: VecDeque::from(cards),
            finished: Vec::new(),
            scheduler,
            state: SessionState::Active,
            session_limit: config.session_limit,
            started_at: config.started_at,
            time_limit: config.time_limit,
            stats: SessionStats::default(),
        };

        tracing::debug!(
            cards = session.queue.len(),
            session_limit = session.session_limit,
            shuffle = config.shuffle,
            scheduler = session.scheduler.name(),
            "Starting study session"
        );

        session.refresh_state();
        session
    }

    /// Card currently on screen, `None` once the session is complete.
    pub fn current(&self) -> Option<&Card> {
        match self.state {
            SessionState::Active => self.queue.front(),
            SessionState::Complete => None,
        }
    }

    /// Grade the current card.
    ///
    /// Recalled cards leave the queue; missed cards get the rescheduled
    /// fields and go to the back. Every grading counts toward the limit.
    pub fn grade(&mut self, quality: Quality, now: DateTime<Utc>) -> Result<ReviewEvent> {
        let Some(card) = self.current() else {
            return Err(Error::SessionComplete { operation: "grade" });
        };
        let next = self.scheduler.compute_next(&card.review_state(), quality)?;

        let Some(mut card) = self.queue.pop_front() else {
            return Err(Error::SessionComplete { operation: "grade" });
        };
        card.apply(next, now);
        self.stats.studied += 1;

        let recalled = self.scheduler.is_success(quality);
        let event = ReviewEvent {
            card_id: card.id.clone(),
            quality,
            status: if recalled {
                ReviewStatus::Learned
            } else {
                ReviewStatus::Repeat
            },
            new_interval: next.interval,
            new_ease_factor: next.ease_factor,
            new_repetitions: next.repetitions,
            timestamp: now,
            requeued: !recalled,
        };

        tracing::debug!(
            card_id = %event.card_id,
            quality = quality.value(),
            interval = next.interval,
            ease_factor = next.ease_factor,
            repetitions = next.repetitions,
            requeued = event.requeued,
            "Graded card"
        );

        if recalled {
            self.stats.learned += 1;
            self.finished.push(card);
        } else {
            self.stats.repeated += 1;
            self.queue.push_back(card);
        }

        self.refresh_state();
        Ok(event)
    }

    /// Grade with the two-button scale.
    pub fn grade_status(&mut self, status: ReviewStatus, now: DateTime<Utc>) -> Result<ReviewEvent> {
        self.grade(status.to_quality(), now)
    }

    /// Grade with the four-button scale.
    pub fn grade_button(&mut self, rating: ButtonRating, now: DateTime<Utc>) -> Result<ReviewEvent> {
        self.grade(rating.to_quality(), now)
    }

    /// Move the current card to the back without grading it.
    pub fn skip(&mut self) -> Result<()> {
        if self.current().is_none() {
            return Err(Error::SessionComplete { operation: "skip" });
        }
        let Some(card) = self.queue.pop_front() else {
            return Err(Error::SessionComplete { operation: "skip" });
        };
        tracing::debug!(card_id = %card.id, "Skipped card");
        self.queue.push_back(card);
        self.stats.skipped += 1;
        Ok(())
    }

    /// Complete the session if its time limit has passed at `now`.
    ///
    /// Returns whether the session is complete after the check.
    pub fn expire_if_elapsed(&mut self, now: DateTime<Utc>) -> bool {
        if self.state == SessionState::Active {
            if let Some(limit) = self.time_limit {
                if now.signed_duration_since(self.started_at) >= limit {
                    tracing::debug!(elapsed_limit = %limit, "Session time limit reached");
                    self.complete();
                }
            }
        }
        self.is_complete()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Number of gradings so far, including repeats of the same card.
    pub fn studied_count(&self) -> usize {
        self.stats.studied
    }

    pub fn session_limit(&self) -> usize {
        self.session_limit
    }

    /// Cards still waiting in the queue.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Queued cards in presentation order.
    pub fn queued(&self) -> impl Iterator<Item = &Card> {
        self.queue.iter()
    }

    /// Cards recalled and retired during this session.
    pub fn finished(&self) -> &[Card] {
        &self.finished
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// All session cards with their updated fields, retired cards first.
    pub fn into_cards(self) -> Vec<Card> {
        let mut cards = self.finished;
        cards.extend(self.queue);
        cards
    }

    fn refresh_state(&mut self) {
        if self.state == SessionState::Active
            && (self.queue.is_empty() || self.stats.studied >= self.session_limit)
        {
            self.complete();
        }
    }

    fn complete(&mut self) {
        self.state = SessionState::Complete;
        tracing::info!(
            studied = self.stats.studied,
            learned = self.stats.learned,
            remaining = self.queue.len(),
            "Study session complete"
        );
    }
}
