//! Open Trivia Database source
//!
//! Questions are requested as multiple choice items of one difficulty. The
//! API returns HTML-entity encoded text and lists the correct answer apart
//! from the incorrect ones, so each record is decoded, its options merged
//! and shuffled, and the result validated before it leaves this module.

use std::time::Duration;

use async_trait::async_trait;
use itertools::Itertools;
use serde::Deserialize;

use super::{Error, QuestionProvider};
use crate::{
    config::QuizConfig,
    question::{Difficulty, Question},
};

/// Response body of the Open Trivia API
#[derive(Debug, Deserialize)]
struct ApiResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<ApiQuestion>,
}

/// One question as served by the Open Trivia API
#[derive(Debug, Deserialize)]
struct ApiQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

fn decode(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

impl ApiQuestion {
    fn into_question(self, difficulty: Difficulty) -> Result<Question, Error> {
        let correct = decode(&self.correct_answer);
        let mut options = self
            .incorrect_answers
            .iter()
            .map(String::as_str)
            .map(decode)
            .chain(std::iter::once(correct.clone()))
            .collect_vec();
        fastrand::shuffle(&mut options);

        let question = Question::new(decode(&self.question), options, correct, difficulty)?;
        Ok(question)
    }
}

/// Turns an API response body into validated questions
///
/// Any invalid record rejects the whole payload.
fn parse_response(body: &str, difficulty: Difficulty) -> Result<Vec<Question>, Error> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if response.response_code != 0 {
        return Err(Error::ResponseCode(response.response_code));
    }
    if response.results.is_empty() {
        return Err(Error::NoQuestions(difficulty));
    }

    response
        .results
        .into_iter()
        .map(|q| q.into_question(difficulty))
        .collect()
}

/// Fetches questions from the Open Trivia Database
#[derive(Debug, Clone)]
pub struct OpenTriviaProvider {
    client: reqwest::Client,
    api_url: String,
    amount: usize,
    timeout: Duration,
}

impl OpenTriviaProvider {
    /// Creates a provider for the API at `api_url`
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base URL of the API endpoint
    /// * `amount` - Number of questions requested per quiz
    /// * `timeout` - Longest wait for the complete response
    pub fn new(api_url: impl Into<String>, amount: usize, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            amount,
            timeout,
        }
    }

    /// Creates a provider from the configured URL, question count and timeout
    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(
            config.api_url.clone(),
            config.question_count,
            config.request_timeout,
        )
    }

    async fn request(&self, difficulty: Difficulty) -> Result<String, reqwest::Error> {
        self.client
            .get(&self.api_url)
            .query(&[
                ("amount", self.amount.to_string()),
                ("type", "multiple".to_owned()),
                ("difficulty", difficulty.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl QuestionProvider for OpenTriviaProvider {
    async fn fetch(&self, difficulty: Difficulty) -> Result<Vec<Question>, Error> {
        tracing::debug!(url = %self.api_url, %difficulty, amount = self.amount, "requesting questions");
        let body = tokio::time::timeout(self.timeout, self.request(difficulty))
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;

        parse_response(&body, difficulty)
    }
}
