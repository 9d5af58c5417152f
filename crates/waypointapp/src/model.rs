//! # Domain Model: Locations and Quizzes
//!
//! A working session edits one ordered collection of [`Location`] records. The order is
//! meaningful: it is the path a tour follows from the first pin to the last.
//!
//! ## Wire Format
//!
//! The persisted, exported and remote forms all share one JSON shape:
//!
//! ```text
//! [
//!   {
//!     "id": "0190c3f2-…",
//!     "title": "Petra",
//!     "country": "Jordan",
//!     "description": "<p>Rose city</p>",
//!     "image": "",
//!     "video": null,
//!     "audio": "https://…/guide.mp3",
//!     "coordinates": [30.3285, 35.4444],
//!     "questions": [ { "id": "…", "text": "…", "type": "true_false", "answer": "true" } ],
//!     "block_navigation": true
//!   }
//! ]
//! ```
//!
//! ## Absent vs Empty Media
//!
//! `image` is always a string (possibly empty). `video` and `audio` are `Option<String>` and
//! serialize `None` as an explicit `null`: a missing link and an empty link are different
//! states, and the validator requires the key to be present.
//!
//! `questions`, `block_navigation` and a question's `options` are omitted from the output
//! entirely when absent.
//!
//! ## Identity
//!
//! Ids are opaque strings. New records get a time-ordered UUID (v7), so ids created in quick
//! succession stay unique and sort by creation time. Nothing in the collection layer re-checks
//! uniqueness on insert.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A `[latitude, longitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self(lat, lng)
    }

    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lng(&self) -> f64 {
        self.1
    }

    /// JSON has no NaN or infinity; such values would be written as `null`.
    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    ShortAnswer,
    TrueFalse,
    MultipleChoice,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::TrueFalse => "true_false",
            QuestionType::MultipleChoice => "multiple_choice",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "short_answer" => Some(QuestionType::ShortAnswer),
            "true_false" => Some(QuestionType::TrueFalse),
            "multiple_choice" => Some(QuestionType::MultipleChoice),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub answer: String,
}

impl Question {
    pub fn new(text: String, kind: QuestionType, options: Option<Vec<String>>, answer: String) -> Self {
        Self {
            id: new_id(),
            text,
            kind,
            options,
            answer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub title: String,
    pub country: String,
    pub description: String,
    pub image: String,
    pub video: Option<String>,
    pub audio: Option<String>,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_navigation: Option<bool>,
}

impl Location {
    /// Builds a new record with a fresh id from a full set of field values.
    pub fn new(fields: LocationFields) -> Self {
        Self::with_id(new_id(), fields)
    }

    pub fn with_id(id: String, fields: LocationFields) -> Self {
        Self {
            id,
            title: fields.title,
            country: fields.country,
            description: fields.description,
            image: fields.image,
            video: fields.video,
            audio: fields.audio,
            coordinates: fields.coordinates,
            questions: fields.questions,
            block_navigation: fields.block_navigation,
        }
    }

    /// Every field except `id`, as an owned replacement tuple.
    pub fn fields(&self) -> LocationFields {
        LocationFields {
            title: self.title.clone(),
            country: self.country.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            video: self.video.clone(),
            audio: self.audio.clone(),
            coordinates: self.coordinates,
            questions: self.questions.clone(),
            block_navigation: self.block_navigation,
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.as_ref().map_or(0, Vec::len)
    }
}

/// The mutable part of a [`Location`].
///
/// Updates take the whole tuple rather than a partial patch, so the caller decides
/// explicitly where `country` and `coordinates` come from.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFields {
    pub title: String,
    pub country: String,
    pub description: String,
    pub image: String,
    pub video: Option<String>,
    pub audio: Option<String>,
    pub coordinates: Coordinates,
    pub questions: Option<Vec<Question>>,
    pub block_navigation: Option<bool>,
}

pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Serialize a collection to its compact persisted form.
pub fn to_json(locations: &[Location]) -> serde_json::Result<String> {
    serde_json::to_string(locations)
}

/// Serialize a collection for export files.
pub fn to_json_pretty(locations: &[Location]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(locations)
}
