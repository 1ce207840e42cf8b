//! Question records and recorded answers
//!
//! A [`Question`] is one multiple choice item: a prompt, an ordered list of
//! unique options, and the option that is correct. Questions are immutable
//! once constructed and are validated with `garde` so that the correct
//! option is always one of the offered options.

use std::collections::{BTreeMap, HashSet};

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Difficulty level requested from a question source
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Easy questions
    #[default]
    #[display("easy")]
    Easy,
    /// Medium questions
    #[display("medium")]
    Medium,
    /// Hard questions
    #[display("hard")]
    Hard,
}

impl Difficulty {
    /// All difficulty levels, from easiest to hardest
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// Rejects option lists that contain the same option twice
#[allow(clippy::ptr_arg)]
fn unique_options(options: &Vec<String>, _ctx: &()) -> garde::Result {
    let mut seen = HashSet::with_capacity(options.len());
    match options.iter().find(|option| !seen.insert(option.as_str())) {
        Some(duplicate) => Err(garde::Error::new(format!(
            "option {duplicate:?} appears more than once"
        ))),
        None => Ok(()),
    }
}

/// Builds a validator accepting only values contained in `options`
fn one_of(options: &[String]) -> impl FnOnce(&String, &()) -> garde::Result + '_ {
    move |value, _| {
        if options.contains(value) {
            Ok(())
        } else {
            Err(garde::Error::new(format!(
                "{value:?} is not one of the offered options"
            )))
        }
    }
}

/// A single multiple choice question
///
/// The JSON form uses the field names of the local question file:
/// `question`, `options`, `correct` and `difficulty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// The prompt shown to the user
    #[serde(rename = "question")]
    #[garde(length(max = constants::question::MAX_TEXT_LENGTH))]
    text: String,
    /// The options in display order
    #[garde(
        length(min = constants::question::MIN_OPTION_COUNT, max = constants::question::MAX_OPTION_COUNT),
        inner(length(max = constants::question::MAX_OPTION_LENGTH)),
        custom(unique_options)
    )]
    options: Vec<String>,
    /// The option that answers the question correctly
    #[serde(rename = "correct")]
    #[garde(custom(one_of(&self.options)))]
    correct_option: String,
    /// Difficulty the question was served for
    #[garde(skip)]
    difficulty: Difficulty,
}

impl Question {
    /// Creates a validated question
    ///
    /// # Errors
    ///
    /// Returns the `garde` report when the options are too few, too many or
    /// repeated, or when `correct_option` is not one of them.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, garde::Report> {
        let question = Self {
            text: text.into(),
            options,
            correct_option: correct_option.into(),
            difficulty,
        };
        question.validate()?;
        Ok(question)
    }

    /// The prompt text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The options in display order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The correct option
    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    /// The difficulty this question belongs to
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Whether `option` is one of this question's options
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Whether `option` is the correct answer
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_option == option
    }
}

/// The stored outcome for one question
///
/// An index with no entry in [`Answers`] is unanswered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerRecord {
    /// The user finalized this option
    Chosen(String),
    /// The user skipped, or time ran out with nothing selected
    Skipped,
}

impl AnswerRecord {
    /// Returns the chosen option, if any
    pub fn chosen(&self) -> Option<&str> {
        match self {
            Self::Chosen(option) => Some(option),
            Self::Skipped => None,
        }
    }
}

/// Recorded answers keyed by question position
pub type Answers = BTreeMap<usize, AnswerRecord>;
