//! Test fixtures and factory functions for creating test data.

use serde_json::json;

use study_core::{Card, CardRecord};

/// Vocabulary deck as the backing store would hand it over.
pub fn vocabulary_records() -> Vec<CardRecord> {
    let value = json!([
        { "id": "v1", "front": "사과", "back": "apple" },
        {
            "id": "v2", "front": "학교", "back": "school",
            "prior_interval": 6, "prior_ease_factor": 2.5, "prior_repetitions": 2,
            "last_reviewed": "2024-08-27T19:00:00Z"
        },
        {
            "id": "v3", "front": "친구", "back": "friend",
            "prior_interval": 15, "prior_ease_factor": 2.6, "prior_repetitions": 3,
            "last_reviewed": "2024-08-18T07:45:00Z"
        }
    ]);
    serde_json::from_value(value).expect("fixture records should deserialize")
}

/// Create `n` fresh cards numbered from 1.
pub fn fresh_cards(n: usize) -> Vec<Card> {
    (1..=n)
        .map(|i| Card::new(format!("card-{i}"), format!("Question {i}?"), format!("Answer {i}.")))
        .collect()
}
