//! # Drafts: the Add/Edit Form
//!
//! A [`LocationDraft`] is what the user has typed so far. It only becomes a [`Location`]
//! once every required field is present, and submission is refused before any mutation is
//! attempted otherwise.
//!
//! ## Required Fields
//!
//! - `title`: not blank
//! - `description`: has visible text. Rich-text editors emit markup even for an empty
//!   document (`<p><br></p>`), so tags and entities are stripped before the check.
//! - `coordinates`: a pin has been placed
//! - `country`: the pin has been resolved by reverse geocoding
//!
//! ## Quiz Rules
//!
//! The validator in [`crate::schema`] only checks shapes. The stricter rules live here,
//! where the user can still fix their input:
//!
//! - `multiple_choice` needs at least one non-blank option, and the answer must be one of them
//! - `true_false` answers are exactly `"true"` or `"false"`
//! - `options` are dropped for question types that do not use them
//!
//! ## Markdown Descriptions
//!
//! Terminal users write Markdown; [`markdown_to_html`] renders it to the HTML subset the
//! description field stores.

use crate::model::{Coordinates, Location, LocationFields, Question, QuestionType};
use pulldown_cmark::{html, Options, Parser};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("title is required")]
    MissingTitle,

    #[error("description is required")]
    MissingDescription,

    #[error("place a pin first: coordinates are required")]
    MissingCoordinates,

    #[error("coordinates must be finite numbers")]
    NonFiniteCoordinates,

    #[error("country could not be resolved for this pin")]
    MissingCountry,

    #[error("question {0}: text is required")]
    MissingQuestionText(usize),

    #[error("question {0}: multiple choice needs at least one option")]
    MissingOptions(usize),

    #[error("question {0}: answer must be one of the options")]
    AnswerNotAnOption(usize),

    #[error("question {0}: true/false answer must be \"true\" or \"false\"")]
    InvalidTrueFalse(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationDraft {
    pub title: String,
    pub description: String,
    pub image: String,
    pub video: Option<String>,
    pub audio: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub country: Option<String>,
    pub questions: Vec<QuestionDraft>,
    pub block_navigation: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    /// Kept when editing an existing question so its id survives the round trip.
    pub id: Option<String>,
    pub text: String,
    pub kind: QuestionType,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuestionDraft {
    pub fn new(text: impl Into<String>, kind: QuestionType, answer: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            kind,
            options: Vec::new(),
            answer: answer.into(),
        }
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    fn build(&self, number: usize) -> Result<Question, DraftError> {
        if self.text.trim().is_empty() {
            return Err(DraftError::MissingQuestionText(number));
        }

        let answer = self.answer.trim().to_string();
        let options = match self.kind {
            QuestionType::MultipleChoice => {
                let options: Vec<String> = self
                    .options
                    .iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
                if options.is_empty() {
                    return Err(DraftError::MissingOptions(number));
                }
                if !options.contains(&answer) {
                    return Err(DraftError::AnswerNotAnOption(number));
                }
                Some(options)
            }
            QuestionType::TrueFalse => {
                if answer != "true" && answer != "false" {
                    return Err(DraftError::InvalidTrueFalse(number));
                }
                None
            }
            QuestionType::ShortAnswer => None,
        };

        let mut question = Question::new(self.text.trim().to_string(), self.kind, options, answer);
        if let Some(id) = &self.id {
            question.id = id.clone();
        }
        Ok(question)
    }
}

impl From<&Question> for QuestionDraft {
    fn from(q: &Question) -> Self {
        Self {
            id: Some(q.id.clone()),
            text: q.text.clone(),
            kind: q.kind,
            options: q.options.clone().unwrap_or_default(),
            answer: q.answer.clone(),
        }
    }
}

impl LocationDraft {
    /// Starts a draft for an existing record, as opened by an edit.
    pub fn from_location(location: &Location) -> Self {
        Self {
            title: location.title.clone(),
            description: location.description.clone(),
            image: location.image.clone(),
            video: location.video.clone(),
            audio: location.audio.clone(),
            coordinates: Some(location.coordinates),
            country: Some(location.country.clone()),
            questions: location
                .questions
                .iter()
                .flatten()
                .map(QuestionDraft::from)
                .collect(),
            block_navigation: location.block_navigation,
        }
    }

    /// Every problem that blocks submission, in form order.
    pub fn problems(&self) -> Vec<DraftError> {
        let mut problems = Vec::new();
        if self.title.trim().is_empty() {
            problems.push(DraftError::MissingTitle);
        }
        if is_blank_markup(&self.description) {
            problems.push(DraftError::MissingDescription);
        }
        match self.coordinates {
            None => problems.push(DraftError::MissingCoordinates),
            Some(c) if !c.is_finite() => problems.push(DraftError::NonFiniteCoordinates),
            Some(_) => {}
        }
        if self.country.as_deref().map_or(true, |c| c.trim().is_empty()) {
            problems.push(DraftError::MissingCountry);
        }
        for (i, q) in self.questions.iter().enumerate() {
            if let Err(e) = q.build(i + 1) {
                problems.push(e);
            }
        }
        problems
    }

    /// The replacement tuple for this draft, or the first problem that blocks it.
    pub fn into_replacement(self) -> Result<LocationFields, DraftError> {
        if let Some(first) = self.problems().into_iter().next() {
            return Err(first);
        }

        let questions = self
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| q.build(i + 1))
            .collect::<Result<Vec<Question>, DraftError>>()?;
        let has_questions = !questions.is_empty();

        Ok(LocationFields {
            title: self.title.trim().to_string(),
            country: self.country.unwrap_or_default().trim().to_string(),
            description: self.description,
            image: self.image,
            video: self.video,
            audio: self.audio,
            coordinates: self.coordinates.ok_or(DraftError::MissingCoordinates)?,
            questions: has_questions.then_some(questions),
            // Only meaningful alongside a quiz
            block_navigation: if has_questions {
                self.block_navigation
            } else {
                None
            },
        })
    }

    /// A brand new record with a fresh id.
    pub fn into_location(self) -> Result<Location, DraftError> {
        Ok(Location::new(self.into_replacement()?))
    }
}

/// True when the markup has no visible text.
pub fn is_blank_markup(markup: &str) -> bool {
    let mut in_tag = false;
    let mut text = String::new();
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace('\u{a0}', " ")
        .trim()
        .is_empty()
}

/// Renders Markdown to the HTML stored in `description`.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn petra_draft() -> LocationDraft {
        LocationDraft {
            title: "Petra".into(),
            description: String::new(),
            coordinates: Some(Coordinates::new(31.9, 35.9)),
            country: Some("Jordan".into()),
            ..Default::default()
        }
    }

    #[test]
    fn blank_description_blocks_submission() {
        let draft = petra_draft();
        assert_eq!(draft.problems(), vec![DraftError::MissingDescription]);
        assert_eq!(
            draft.into_location().unwrap_err(),
            DraftError::MissingDescription
        );
    }

    #[test]
    fn draft_with_description_becomes_location() {
        let mut draft = petra_draft();
        draft.description = "<p>Rose city</p>".into();
        let location = draft.into_location().unwrap();
        assert_eq!(location.title, "Petra");
        assert_eq!(location.country, "Jordan");
        assert_eq!(location.coordinates, Coordinates::new(31.9, 35.9));
        assert!(!location.id.is_empty());
        assert_eq!(location.questions, None);
    }

    #[test]
    fn empty_editor_markup_counts_as_blank() {
        assert!(is_blank_markup(""));
        assert!(is_blank_markup("<p><br></p>"));
        assert!(is_blank_markup("<p>&nbsp;</p>"));
        assert!(!is_blank_markup("<p>x</p>"));
    }

    #[test]
    fn missing_pin_and_country_are_reported() {
        let draft = LocationDraft {
            title: "Somewhere".into(),
            description: "<p>text</p>".into(),
            ..Default::default()
        };
        assert_eq!(
            draft.problems(),
            vec![DraftError::MissingCoordinates, DraftError::MissingCountry]
        );
    }

    #[test]
    fn non_finite_coordinates_block_submission() {
        let mut draft = petra_draft();
        draft.description = "<p>Rose city</p>".into();
        draft.coordinates = Some(Coordinates::new(f64::NAN, 35.9));
        assert_eq!(draft.problems(), vec![DraftError::NonFiniteCoordinates]);

        draft.coordinates = Some(Coordinates::new(31.9, f64::INFINITY));
        assert_eq!(
            draft.into_location().unwrap_err(),
            DraftError::NonFiniteCoordinates
        );
    }

    #[test]
    fn blank_title_is_reported_first() {
        let mut draft = petra_draft();
        draft.title = "  ".into();
        assert_eq!(draft.into_replacement().unwrap_err(), DraftError::MissingTitle);
    }

    #[test]
    fn multiple_choice_needs_answer_among_options() {
        let mut draft = petra_draft();
        draft.description = "<p>x</p>".into();
        draft.questions = vec![QuestionDraft::new("Capital?", QuestionType::MultipleChoice, "Cairo")
            .with_options(vec!["Amman".into(), "Aqaba".into()])];
        assert_eq!(
            draft.clone().into_replacement().unwrap_err(),
            DraftError::AnswerNotAnOption(1)
        );

        draft.questions[0].answer = "Amman".into();
        let fields = draft.into_replacement().unwrap();
        let q = &fields.questions.unwrap()[0];
        assert_eq!(
            q.options.as_deref(),
            Some(&["Amman".to_string(), "Aqaba".to_string()][..])
        );
    }

    #[test]
    fn multiple_choice_without_options_is_rejected() {
        let mut draft = petra_draft();
        draft.description = "<p>x</p>".into();
        draft.questions = vec![QuestionDraft::new("Pick", QuestionType::MultipleChoice, "")
            .with_options(vec!["  ".into()])];
        assert_eq!(
            draft.into_replacement().unwrap_err(),
            DraftError::MissingOptions(1)
        );
    }

    #[test]
    fn true_false_answer_is_constrained() {
        let mut draft = petra_draft();
        draft.description = "<p>x</p>".into();
        draft.questions = vec![QuestionDraft::new("Pink?", QuestionType::TrueFalse, "yes")];
        assert_eq!(
            draft.into_replacement().unwrap_err(),
            DraftError::InvalidTrueFalse(1)
        );
    }

    #[test]
    fn block_navigation_dropped_without_questions() {
        let mut draft = petra_draft();
        draft.description = "<p>x</p>".into();
        draft.block_navigation = Some(true);
        assert_eq!(draft.into_replacement().unwrap().block_navigation, None);
    }

    #[test]
    fn edit_round_trip_keeps_question_ids() {
        let mut draft = petra_draft();
        draft.description = "<p>x</p>".into();
        draft.questions = vec![QuestionDraft::new("Pink?", QuestionType::TrueFalse, "true")];
        draft.block_navigation = Some(true);
        let location = draft.into_location().unwrap();

        let reopened = LocationDraft::from_location(&location);
        let fields = reopened.into_replacement().unwrap();
        assert_eq!(fields.questions, location.questions);
        assert_eq!(fields.block_navigation, Some(true));
    }

    #[test]
    fn markdown_renders_to_html() {
        assert_eq!(
            markdown_to_html("Rose **city**"),
            "<p>Rose <strong>city</strong></p>"
        );
    }
}
