//! Configuration constants for the timed quiz
//!
//! This module contains the limits and defaults used throughout the quiz
//! to keep question data and timing within consistent boundaries.

/// Question record constants
pub mod question {
    /// Minimum number of options a multiple choice question must offer
    pub const MIN_OPTION_COUNT: usize = 2;
    /// Maximum number of options a multiple choice question may offer
    pub const MAX_OPTION_COUNT: usize = 8;
    /// Maximum length of a question prompt in characters
    pub const MAX_TEXT_LENGTH: usize = 500;
    /// Maximum length of a single option in characters
    pub const MAX_OPTION_LENGTH: usize = 200;
}

/// Countdown constants
pub mod timer {
    /// Minimum time limit in seconds for answering a question
    pub const MIN_TIME_LIMIT: u64 = 5;
    /// Maximum time limit in seconds for answering a question
    pub const MAX_TIME_LIMIT: u64 = 240;
    /// Time limit in seconds used when none is configured
    pub const DEFAULT_TIME_LIMIT: u64 = 30;
    /// Interval in seconds at which the displayed remaining time is refreshed
    pub const DISPLAY_TICK: u64 = 1;
}

/// Question source constants
pub mod provider {
    /// Base URL of the Open Trivia Database question API
    pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";
    /// Local JSON file consulted when the remote API fails
    pub const DEFAULT_LOCAL_PATH: &str = "questions.json";
    /// Number of questions requested per quiz
    pub const DEFAULT_QUESTION_COUNT: usize = 10;
    /// Largest amount the Open Trivia API serves in one request
    pub const MAX_QUESTION_COUNT: usize = 50;
    /// Shortest allowed wait in seconds for the remote API
    pub const MIN_REQUEST_TIMEOUT: u64 = 1;
    /// Longest allowed wait in seconds for the remote API
    pub const MAX_REQUEST_TIMEOUT: u64 = 120;
    /// Wait in seconds for the remote API before falling back
    pub const DEFAULT_REQUEST_TIMEOUT: u64 = 10;
}
