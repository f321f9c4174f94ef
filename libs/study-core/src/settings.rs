//! Study settings: global defaults, per-deck overrides and the merged view.

use crate::scheduler::Sm2;
use crate::types::{RatingScale, DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Global settings configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudySettings {
    /// Maximum number of gradings in one session.
    pub session_limit: usize,
    pub shuffle: bool,
    pub rating_scale: RatingScale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    pub initial_ease: f64,
    /// Can only raise the 1.3 ease floor.
    pub minimum_ease: f64,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            session_limit: 20,
            shuffle: false,
            rating_scale: RatingScale::default(),
            time_limit_minutes: None,
            initial_ease: DEFAULT_EASE_FACTOR,
            minimum_ease: MIN_EASE_FACTOR,
        }
    }
}

/// Per-deck settings (all fields optional for overrides).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSettings {
    pub deck_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_scale: Option<RatingScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
}

impl DeckSettings {
    /// Create new deck settings with only the deck id set.
    pub fn new(deck_id: impl Into<String>) -> Self {
        Self {
            deck_id: deck_id.into(),
            session_limit: None,
            shuffle: None,
            rating_scale: None,
            time_limit_minutes: None,
        }
    }
}

/// Effective settings (global merged with deck overrides).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveSettings {
    pub session_limit: usize,
    pub shuffle: bool,
    pub rating_scale: RatingScale,
    pub time_limit_minutes: Option<u32>,
    pub initial_ease: f64,
    pub minimum_ease: f64,
}

impl EffectiveSettings {
    /// Merge global settings with optional deck settings.
    ///
    /// Ease parameters are global only so that every deck shares one scheduler.
    pub fn merge(global: &StudySettings, deck: Option<&DeckSettings>) -> Self {
        match deck {
            Some(d) => Self {
                session_limit: d.session_limit.unwrap_or(global.session_limit),
                shuffle: d.shuffle.unwrap_or(global.shuffle),
                rating_scale: d.rating_scale.unwrap_or(global.rating_scale),
                time_limit_minutes: d.time_limit_minutes.or(global.time_limit_minutes),
                initial_ease: global.initial_ease,
                minimum_ease: global.minimum_ease,
            },
            None => Self {
                session_limit: global.session_limit,
                shuffle: global.shuffle,
                rating_scale: global.rating_scale,
                time_limit_minutes: global.time_limit_minutes,
                initial_ease: global.initial_ease,
                minimum_ease: global.minimum_ease,
            },
        }
    }

    /// SM-2 scheduler configured from these settings.
    pub fn scheduler(&self) -> Sm2 {
        Sm2 {
            initial_ease: self.initial_ease,
            minimum_ease: self.minimum_ease,
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_minutes
            .map(|minutes| Duration::minutes(i64::from(minutes)))
    }
}
