//! Runtime configuration
//!
//! [`QuizConfig`] gathers the tunable parts of a quiz: how long each
//! question may take, how many questions are requested, and where the
//! questions come from. It is read from JSON and validated with `garde`
//! against the bounds in [`crate::constants`].

use std::{path::PathBuf, time::Duration};

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// Checks that a duration lies in `[MIN_SECONDS, MAX_SECONDS]` whole seconds
///
/// Usable as a `garde` custom validator through a named wrapper.
///
/// # Errors
///
/// Returns a `garde::Error` naming the allowed range when `duration` is
/// shorter or longer.
pub fn validate_duration<const MIN_SECONDS: u64, const MAX_SECONDS: u64>(
    duration: &Duration,
    _ctx: &(),
) -> garde::Result {
    let seconds = duration.as_secs();
    if !(MIN_SECONDS..=MAX_SECONDS).contains(&seconds) {
        return Err(garde::Error::new(format!(
            "{seconds}s is not between {MIN_SECONDS}s and {MAX_SECONDS}s"
        )));
    }
    Ok(())
}

/// Validates the time allowed for each question
fn validate_time_limit(val: &Duration, ctx: &()) -> garde::Result {
    validate_duration::<
        { constants::timer::MIN_TIME_LIMIT },
        { constants::timer::MAX_TIME_LIMIT },
    >(val, ctx)
}

/// Validates the wait for the remote question API
fn validate_request_timeout(val: &Duration, ctx: &()) -> garde::Result {
    validate_duration::<
        { constants::provider::MIN_REQUEST_TIMEOUT },
        { constants::provider::MAX_REQUEST_TIMEOUT },
    >(val, ctx)
}

/// Errors raised while loading a configuration
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration is not valid JSON for [`QuizConfig`]
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its allowed bounds
    #[error("invalid configuration: {0}")]
    Invalid(#[from] garde::Report),
}

/// Configuration for a quiz
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QuizConfig {
    /// Time allowed for each question
    #[garde(custom(validate_time_limit))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub time_limit: Duration,
    /// Number of questions requested from the remote source
    #[garde(range(min = 1, max = constants::provider::MAX_QUESTION_COUNT))]
    pub question_count: usize,
    /// Base URL of the remote question API
    #[garde(length(min = 1))]
    pub api_url: String,
    /// How long the remote API may take before the fallback is used
    #[garde(custom(validate_request_timeout))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub request_timeout: Duration,
    /// JSON file consulted when the remote source fails
    #[garde(skip)]
    pub local_path: PathBuf,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(constants::timer::DEFAULT_TIME_LIMIT),
            question_count: constants::provider::DEFAULT_QUESTION_COUNT,
            api_url: constants::provider::DEFAULT_API_URL.to_owned(),
            request_timeout: Duration::from_secs(constants::provider::DEFAULT_REQUEST_TIMEOUT),
            local_path: PathBuf::from(constants::provider::DEFAULT_LOCAL_PATH),
        }
    }
}

impl QuizConfig {
    /// Reads and validates a configuration from JSON
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed JSON and [`Error::Invalid`]
    /// when a value is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
