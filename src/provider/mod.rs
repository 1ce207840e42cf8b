//! Question sources
//!
//! A [`QuestionProvider`] produces the ordered questions of a quiz for a
//! requested difficulty. The standard chain asks the Open Trivia Database
//! first and falls back to a local JSON file filtered by difficulty.
//! Option shuffling and HTML entity decoding happen here, so the session
//! receives questions whose option order is final.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::question::{Difficulty, Question};

pub mod fallback;
pub mod local;
pub mod remote;

pub use fallback::FallbackProvider;
pub use local::LocalFileProvider;
pub use remote::OpenTriviaProvider;

/// Errors raised while acquiring questions
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP request failed or returned an error status
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The question file could not be read
    #[error("could not read question file: {0}")]
    Io(#[from] std::io::Error),
    /// The payload is not the expected JSON
    #[error("malformed question data: {0}")]
    Json(#[from] serde_json::Error),
    /// The remote API did not answer in time
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The Open Trivia API reported a failure
    #[error("question API answered with response code {0}")]
    ResponseCode(u8),
    /// A question record breaks the question invariants
    #[error("invalid question: {0}")]
    Invalid(#[from] garde::Report),
    /// The source has no questions of this difficulty
    #[error("no {0} questions available")]
    NoQuestions(Difficulty),
    /// Both the primary and the fallback source failed
    #[error("all question sources failed (primary: {primary}; fallback: {fallback})")]
    SourceUnavailable {
        /// Why the primary source failed
        primary: Box<Error>,
        /// Why the fallback source failed
        fallback: Box<Error>,
    },
}

/// A source of quiz questions
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetches the questions of one quiz
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the source cannot supply any question of
    /// the requested difficulty.
    async fn fetch(&self, difficulty: Difficulty) -> Result<Vec<Question>, Error>;
}
