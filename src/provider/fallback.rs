//! Primary source with a fallback
//!
//! The fallback is consulted whenever the primary source fails or answers
//! with no questions. There is no retry beyond that single fallback.

use async_trait::async_trait;

use super::{Error, LocalFileProvider, OpenTriviaProvider, QuestionProvider};
use crate::{
    config::QuizConfig,
    question::{Difficulty, Question},
};

/// Tries `primary` first, then `fallback`
#[derive(Debug, Clone)]
pub struct FallbackProvider<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackProvider<P, F> {
    /// Chains two providers
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl FallbackProvider<OpenTriviaProvider, LocalFileProvider> {
    /// Builds the Open Trivia source backed by the local question file
    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(
            OpenTriviaProvider::from_config(config),
            LocalFileProvider::from_config(config),
        )
    }
}

/// Treats an empty answer as a failure of the source
fn non_empty(
    result: Result<Vec<Question>, Error>,
    difficulty: Difficulty,
) -> Result<Vec<Question>, Error> {
    match result {
        Ok(questions) if questions.is_empty() => Err(Error::NoQuestions(difficulty)),
        other => other,
    }
}

#[async_trait]
impl<P: QuestionProvider, F: QuestionProvider> QuestionProvider for FallbackProvider<P, F> {
    async fn fetch(&self, difficulty: Difficulty) -> Result<Vec<Question>, Error> {
        let primary = match non_empty(self.primary.fetch(difficulty).await, difficulty) {
            Ok(questions) => return Ok(questions),
            Err(error) => error,
        };
        tracing::warn!(error = %primary, %difficulty, "primary question source failed, trying fallback");

        non_empty(self.fallback.fetch(difficulty).await, difficulty).map_err(|fallback| {
            tracing::error!(error = %fallback, %difficulty, "fallback question source failed");
            Error::SourceUnavailable {
                primary: Box::new(primary),
                fallback: Box::new(fallback),
            }
        })
    }
}
