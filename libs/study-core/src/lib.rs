//! Spaced repetition core for the language-learning study flow.
//!
//! Provides:
//! - SM-2 review scheduler behind the `ReviewScheduler` trait
//! - Study session queue (current card, grading, skipping, completion)
//! - Study settings with per-deck overrides
//! - Shared types (Card, Quality, ReviewStatus, ButtonRating, etc.)

pub mod error;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod types;

pub use error::{Error, Result};
pub use scheduler::{compute_next, ReviewScheduler, Sm2};
pub use session::{ReviewEvent, SessionConfig, SessionQueue, SessionState, SessionStats};
pub use settings::{DeckSettings, EffectiveSettings, StudySettings};
pub use types::{
    ButtonRating, Card, CardProgress, CardRecord, Quality, RatingScale, ReviewState, ReviewStatus,
};
