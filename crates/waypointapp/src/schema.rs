//! # Schema Validation
//!
//! Every bulk load of a collection (startup from the local store, file import, remote
//! artifact load) passes through [`validate`] before it may become session state.
//!
//! ## Acceptance Policy
//!
//! Validation is **all-or-nothing**. If a single record has a single wrong-typed field, the
//! whole input is rejected and [`SchemaError`] names the first failing path:
//!
//! ```text
//! [2].coordinates: expected an array of two numbers
//! [0].questions[1].type: unknown question type "essay"
//! ```
//!
//! Nothing is ever silently dropped: a collection is either accepted exactly as given, or
//! not at all.
//!
//! ## Field Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | `id`, `title`, `country`, `description`, `image` | string |
//! | `video`, `audio` | present, and `null` or string |
//! | `coordinates` | array of exactly two numbers |
//! | `questions` | absent, or array of question objects |
//! | `block_navigation` | absent, or boolean |
//!
//! Question objects: `id`, `text`, `answer` are strings, `type` is one of
//! `short_answer`/`true_false`/`multiple_choice`, `options` is absent or an array of strings.
//! Whether `answer` is one of `options` is an editing concern (see [`crate::draft`]), not a
//! schema one.
//!
//! Ids must also be unique across the collection. Keys not listed above are ignored.

use crate::model::{Coordinates, Location, Question, QuestionType};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("expected a JSON array of locations")]
    NotAnArray,

    #[error("{path}: expected an object")]
    NotAnObject { path: String },

    #[error("{path}: missing required field")]
    MissingField { path: String },

    #[error("{path}: expected {expected}")]
    WrongType {
        path: String,
        expected: &'static str,
    },

    #[error("{path}: unknown question type \"{found}\"")]
    UnknownQuestionType { path: String, found: String },

    #[error("duplicate location id \"{0}\"")]
    DuplicateId(String),
}

/// Failure to turn raw text into a collection.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] SchemaError),
}

impl From<CollectionError> for crate::error::WaypointError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::Parse(e) => crate::error::WaypointError::Serialization(e),
            CollectionError::Invalid(e) => crate::error::WaypointError::Schema(e),
        }
    }
}

type Checked<T> = std::result::Result<T, SchemaError>;

/// Validates a parsed JSON value as a location collection.
pub fn validate(raw: &Value) -> Checked<Vec<Location>> {
    let items = raw.as_array().ok_or(SchemaError::NotAnArray)?;

    let mut seen = HashSet::with_capacity(items.len());
    let mut locations = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let location = location_at(item, &format!("[{}]", i))?;
        if !seen.insert(location.id.clone()) {
            return Err(SchemaError::DuplicateId(location.id));
        }
        locations.push(location);
    }
    Ok(locations)
}

/// Parses JSON text and validates it in one step.
pub fn parse_collection(text: &str) -> std::result::Result<Vec<Location>, CollectionError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(validate(&value)?)
}

fn location_at(item: &Value, path: &str) -> Checked<Location> {
    let obj = item.as_object().ok_or_else(|| SchemaError::NotAnObject {
        path: path.to_string(),
    })?;

    let questions = match obj.get("questions") {
        None => None,
        Some(Value::Array(raw)) => Some(
            raw.iter()
                .enumerate()
                .map(|(i, q)| question_at(q, &format!("{}.questions[{}]", path, i)))
                .collect::<Checked<Vec<Question>>>()?,
        ),
        Some(_) => {
            return Err(SchemaError::WrongType {
                path: format!("{}.questions", path),
                expected: "an array of questions",
            })
        }
    };

    let block_navigation = match obj.get("block_navigation") {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            return Err(SchemaError::WrongType {
                path: format!("{}.block_navigation", path),
                expected: "a boolean",
            })
        }
    };

    Ok(Location {
        id: string_field(obj, path, "id")?,
        title: string_field(obj, path, "title")?,
        country: string_field(obj, path, "country")?,
        description: string_field(obj, path, "description")?,
        image: string_field(obj, path, "image")?,
        video: nullable_string_field(obj, path, "video")?,
        audio: nullable_string_field(obj, path, "audio")?,
        coordinates: coordinates_field(obj, path)?,
        questions,
        block_navigation,
    })
}

fn question_at(item: &Value, path: &str) -> Checked<Question> {
    let obj = item.as_object().ok_or_else(|| SchemaError::NotAnObject {
        path: path.to_string(),
    })?;

    let tag = string_field(obj, path, "type")?;
    let kind = QuestionType::parse(&tag).ok_or_else(|| SchemaError::UnknownQuestionType {
        path: format!("{}.type", path),
        found: tag.clone(),
    })?;

    let options = match obj.get("options") {
        None => None,
        Some(Value::Array(raw)) => Some(
            raw.iter()
                .map(|o| o.as_str().map(str::to_string))
                .collect::<Option<Vec<String>>>()
                .ok_or_else(|| SchemaError::WrongType {
                    path: format!("{}.options", path),
                    expected: "an array of strings",
                })?,
        ),
        Some(_) => {
            return Err(SchemaError::WrongType {
                path: format!("{}.options", path),
                expected: "an array of strings",
            })
        }
    };

    Ok(Question {
        id: string_field(obj, path, "id")?,
        text: string_field(obj, path, "text")?,
        kind,
        options,
        answer: string_field(obj, path, "answer")?,
    })
}

fn string_field(obj: &Map<String, Value>, path: &str, key: &str) -> Checked<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SchemaError::WrongType {
            path: format!("{}.{}", path, key),
            expected: "a string",
        }),
        None => Err(SchemaError::MissingField {
            path: format!("{}.{}", path, key),
        }),
    }
}

/// `null` and strings only; the key itself must be present.
fn nullable_string_field(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Checked<Option<String>> {
    match obj.get(key) {
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaError::WrongType {
            path: format!("{}.{}", path, key),
            expected: "null or a string",
        }),
        None => Err(SchemaError::MissingField {
            path: format!("{}.{}", path, key),
        }),
    }
}

fn coordinates_field(obj: &Map<String, Value>, path: &str) -> Checked<Coordinates> {
    let wrong = || SchemaError::WrongType {
        path: format!("{}.coordinates", path),
        expected: "an array of two numbers",
    };
    match obj.get("coordinates") {
        Some(Value::Array(pair)) if pair.len() == 2 => {
            let lat = pair[0].as_f64().ok_or_else(wrong)?;
            let lng = pair[1].as_f64().ok_or_else(wrong)?;
            Ok(Coordinates::new(lat, lng))
        }
        Some(_) => Err(wrong()),
        None => Err(SchemaError::MissingField {
            path: format!("{}.coordinates", path),
        }),
    }
}
