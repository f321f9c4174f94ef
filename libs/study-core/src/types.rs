//! Core types for study sessions.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Ease factor assigned to cards that have never been graded.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Lowest ease factor any scheduling update may produce.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Shortest interval any scheduling update may produce.
pub const MIN_INTERVAL_DAYS: u32 = 1;

/// Consecutive successful reviews needed before a card counts as mastered.
pub const MASTERED_REPETITIONS: u32 = 3;

/// Interval in days a card must reach before it counts as mastered.
pub const MASTERED_INTERVAL_DAYS: u32 = 21;

/// Learner quality rating on the 0-5 SM-2 scale.
///
/// 0-2 is a lapse, 3-5 a successful recall with increasing confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Lowest quality that counts as a successful recall.
    pub const SUCCESS_THRESHOLD: u8 = 3;
    pub const MAX: u8 = 5;

    /// Create a quality rating, rejecting values above 5.
    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::QualityOutOfRange {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 >= Self::SUCCESS_THRESHOLD
    }
}

impl TryFrom<i64> for Quality {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match u8::try_from(value) {
            Ok(v) if v <= Self::MAX => Ok(Self(v)),
            _ => Err(Error::QualityOutOfRange { value }),
        }
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Coarse two-button grading used by the simple study screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Repeat,
    Learned,
}

impl ReviewStatus {
    /// Map onto the SM-2 scale: repeat is a lapse, learned a solid recall.
    pub fn to_quality(self) -> Quality {
        match self {
            Self::Repeat => Quality(2),
            Self::Learned => Quality(4),
        }
    }

    /// Create from 2-point button value (1 = repeat, 2 = learned).
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Repeat),
            2 => Some(Self::Learned),
            _ => None,
        }
    }
}

/// Four-button grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonRating {
    Again,
    Hard,
    Good,
    Easy,
}

impl ButtonRating {
    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Hard still counts as recalled, so it sits on the success threshold.
    pub fn to_quality(self) -> Quality {
        match self {
            Self::Again => Quality(1),
            Self::Hard => Quality(3),
            Self::Good => Quality(4),
            Self::Easy => Quality(5),
        }
    }
}

/// Rating scale options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RatingScale {
    #[default]
    #[serde(rename = "4point")]
    FourPoint,
    #[serde(rename = "2point")]
    TwoPoint,
}

impl RatingScale {
    /// Number of grading buttons on this scale.
    pub fn button_count(self) -> u8 {
        match self {
            Self::FourPoint => 4,
            Self::TwoPoint => 2,
        }
    }

    /// Translate a 1-based button value on this scale into a quality rating.
    pub fn quality_for(self, value: u8) -> Option<Quality> {
        match self {
            Self::FourPoint => ButtonRating::from_value(value).map(ButtonRating::to_quality),
            Self::TwoPoint => ReviewStatus::from_value(value).map(ReviewStatus::to_quality),
        }
    }
}

/// Scheduling parameters of a card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Days until the next review.
    pub interval: u32,
    pub ease_factor: f64,
    /// Consecutive successful reviews since the last lapse.
    pub repetitions: u32,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            interval: 1,
            ease_factor: DEFAULT_EASE_FACTOR,
            repetitions: 0,
        }
    }
}

/// Learning progress as shown in the UI. Always derived from the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardProgress {
    New,
    Learning,
    Mastered,
}

/// A flashcard with its review state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    pub interval: u32,
    pub ease_factor: f64,
    pub repetitions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl Card {
    /// Create a never-reviewed card.
    pub fn new(id: impl Into<String>, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self::with_state(id, front, back, ReviewState::default())
    }

    /// Create a never-reviewed card starting from a scheduler's initial state.
    pub fn with_state(
        id: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
        state: ReviewState,
    ) -> Self {
        Self {
            id: id.into(),
            front: front.into(),
            back: back.into(),
            interval: state.interval,
            ease_factor: state.ease_factor,
            repetitions: state.repetitions,
            last_reviewed: None,
        }
    }

    pub fn review_state(&self) -> ReviewState {
        ReviewState {
            interval: self.interval,
            ease_factor: self.ease_factor,
            repetitions: self.repetitions,
        }
    }

    /// Write scheduler output back and record when the grading happened.
    pub fn apply(&mut self, state: ReviewState, reviewed_at: DateTime<Utc>) {
        self.interval = state.interval;
        self.ease_factor = state.ease_factor;
        self.repetitions = state.repetitions;
        self.last_reviewed = Some(reviewed_at);
    }

    pub fn is_new(&self) -> bool {
        self.last_reviewed.is_none() && self.repetitions == 0
    }

    pub fn is_mastered(&self) -> bool {
        self.repetitions >= MASTERED_REPETITIONS && self.interval >= MASTERED_INTERVAL_DAYS
    }

    pub fn is_learning(&self) -> bool {
        !self.is_new() && !self.is_mastered()
    }

    pub fn progress(&self) -> CardProgress {
        if self.is_new() {
            CardProgress::New
        } else if self.is_mastered() {
            CardProgress::Mastered
        } else {
            CardProgress::Learning
        }
    }

    /// Next scheduled review, or `None` for a card that was never graded.
    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed
            .map(|reviewed| reviewed + Duration::days(i64::from(self.interval)))
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date().map_or(true, |due| due <= now)
    }
}

/// Card as handed over by the backing store at session start.
///
/// Numeric fields arrive as plain JSON numbers and are validated when
/// converted into a [`Card`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_interval: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_ease_factor: Option<f64>,
    #[serde(default)]
    pub prior_repetitions: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl CardRecord {
    /// Validate into a card, filling a missing interval or ease from `initial`.
    pub fn into_card(self, initial: ReviewState) -> Result<Card> {
        let interval = match self.prior_interval {
            Some(value) => whole_number("interval", value)?,
            None => initial.interval,
        };
        let ease_factor = match self.prior_ease_factor {
            Some(value) => validate_ease_factor(value)?,
            None => initial.ease_factor,
        };
        let repetitions = whole_number("repetitions", self.prior_repetitions)?;

        Ok(Card {
            id: self.id,
            front: self.front,
            back: self.back,
            interval,
            ease_factor,
            repetitions,
            last_reviewed: self.last_reviewed,
        })
    }
}

impl TryFrom<CardRecord> for Card {
    type Error = Error;

    fn try_from(record: CardRecord) -> Result<Self> {
        record.into_card(ReviewState::default())
    }
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            front: card.front,
            back: card.back,
            prior_interval: Some(f64::from(card.interval)),
            prior_ease_factor: Some(card.ease_factor),
            prior_repetitions: f64::from(card.repetitions),
            last_reviewed: card.last_reviewed,
        }
    }
}

/// Reject ease factors that would poison interval arithmetic.
pub(crate) fn validate_ease_factor(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::NonFiniteEaseFactor { value });
    }
    if value <= 0.0 {
        return Err(Error::NonPositiveEaseFactor { value });
    }
    Ok(value)
}

fn whole_number(field: &'static str, value: f64) -> Result<u32> {
    if value < 0.0 {
        return Err(Error::NegativeField { field, value });
    }
    if !value.is_finite() || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(Error::FractionalField { field, value });
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(interval: f64, ease: f64, repetitions: f64) -> CardRecord {
        CardRecord {
            id: "c1".to_string(),
            front: "안녕하세요".to_string(),
            back: "hello".to_string(),
            prior_interval: Some(interval),
            prior_ease_factor: Some(ease),
            prior_repetitions: repetitions,
            last_reviewed: None,
        }
    }

    #[test]
    fn quality_rejects_values_above_five() {
        assert!(Quality::new(5).is_ok());
        assert_eq!(Quality::new(6), Err(Error::QualityOutOfRange { value: 6 }));
        assert!(matches!(
            Quality::try_from(-1),
            Err(Error::QualityOutOfRange { value: -1 })
        ));
    }

    #[test]
    fn quality_success_threshold() {
        assert!(!Quality::new(2).unwrap().is_success());
        assert!(Quality::new(3).unwrap().is_success());
    }

    #[test]
    fn quality_deserialize_validates() {
        let q: Quality = serde_json::from_str("4").unwrap();
        assert_eq!(q.value(), 4);
        assert!(serde_json::from_str::<Quality>("9").is_err());
    }

    #[test]
    fn binary_status_maps_across_threshold() {
        assert!(!ReviewStatus::Repeat.to_quality().is_success());
        assert!(ReviewStatus::Learned.to_quality().is_success());
    }

    #[test]
    fn rating_scale_button_values() {
        assert_eq!(RatingScale::TwoPoint.quality_for(2).map(Quality::value), Some(4));
        assert_eq!(RatingScale::FourPoint.quality_for(1).map(Quality::value), Some(1));
        assert_eq!(RatingScale::FourPoint.quality_for(4).map(Quality::value), Some(5));
        assert_eq!(RatingScale::TwoPoint.quality_for(3), None);
    }

    #[test]
    fn rating_scale_serde_names() {
        let json = serde_json::to_string(&RatingScale::TwoPoint).unwrap();
        assert_eq!(json, "\"2point\"");
    }

    #[test]
    fn new_card_progress() {
        let card = Card::new("1", "물", "water");
        assert!(card.is_new());
        assert!(!card.is_learning());
        assert_eq!(card.progress(), CardProgress::New);
        assert!(card.is_due(Utc::now()));
    }

    #[test]
    fn progress_follows_scheduling_fields() {
        let reviewed = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut card = Card::new("1", "물", "water");
        card.apply(
            ReviewState {
                interval: 6,
                ease_factor: 2.5,
                repetitions: 2,
            },
            reviewed,
        );
        assert_eq!(card.progress(), CardProgress::Learning);

        card.apply(
            ReviewState {
                interval: 40,
                ease_factor: 2.6,
                repetitions: 4,
            },
            reviewed,
        );
        assert_eq!(card.progress(), CardProgress::Mastered);
    }

    #[test]
    fn due_date_adds_interval() {
        let reviewed = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut card = Card::new("1", "물", "water");
        card.apply(
            ReviewState {
                interval: 6,
                ..ReviewState::default()
            },
            reviewed,
        );
        let due = Utc.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap();
        assert_eq!(card.due_date(), Some(due));
        assert!(!card.is_due(due - Duration::seconds(1)));
        assert!(card.is_due(due));
    }

    #[test]
    fn record_converts_to_card() {
        let card = Card::try_from(record(6.0, 2.5, 2.0)).unwrap();
        assert_eq!(card.interval, 6);
        assert_eq!(card.repetitions, 2);
    }

    #[test]
    fn record_rejects_negative_interval() {
        let err = Card::try_from(record(-1.0, 2.5, 0.0)).unwrap_err();
        assert!(matches!(err, Error::NegativeField { field: "interval", .. }));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn record_rejects_fractional_repetitions() {
        let err = Card::try_from(record(1.0, 2.5, 1.5)).unwrap_err();
        assert!(matches!(err, Error::FractionalField { field: "repetitions", .. }));
    }

    #[test]
    fn record_rejects_nan_ease() {
        let err = Card::try_from(record(1.0, f64::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, Error::NonFiniteEaseFactor { .. }));
    }

    #[test]
    fn card_converts_back_for_write_back() {
        let reviewed = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut card = Card::new("9", "바다", "sea");
        card.apply(
            ReviewState {
                interval: 6,
                ease_factor: 2.36,
                repetitions: 2,
            },
            reviewed,
        );
        let record = CardRecord::from(card.clone());
        assert_eq!(record.prior_interval, Some(6.0));
        assert_eq!(record.last_reviewed, Some(reviewed));
        assert_eq!(Card::try_from(record).unwrap(), card);
    }

    #[test]
    fn record_defaults_missing_fields() {
        let json = r#"{"id": "7", "front": "책", "back": "book"}"#;
        let record: CardRecord = serde_json::from_str(json).unwrap();
        let card = Card::try_from(record).unwrap();
        assert_eq!(card.review_state(), ReviewState::default());
    }

    #[test]
    fn missing_fields_take_supplied_initial_state() {
        let json = r#"{"id": "8", "front": "집", "back": "house", "prior_repetitions": 0}"#;
        let record: CardRecord = serde_json::from_str(json).unwrap();
        let initial = ReviewState {
            interval: 1,
            ease_factor: 2.3,
            repetitions: 0,
        };
        let card = record.into_card(initial).unwrap();
        assert_eq!(card.ease_factor, 2.3);
        assert_eq!(card.interval, 1);
    }

    #[test]
    fn with_state_builds_new_card() {
        let initial = ReviewState {
            ease_factor: 2.1,
            ..ReviewState::default()
        };
        let card = Card::with_state("3", "눈", "snow", initial);
        assert!(card.is_new());
        assert_eq!(card.review_state(), initial);
    }
}
