//! Local JSON question file
//!
//! The file holds a JSON array of question records of every difficulty.
//! Only records of the requested difficulty are served; records that do not
//! decode as a question or break its invariants are skipped with a warning.

use std::path::PathBuf;

use async_trait::async_trait;
use garde::Validate;
use itertools::Itertools;

use super::{Error, QuestionProvider};
use crate::{
    config::QuizConfig,
    question::{Difficulty, Question},
};

/// Serves questions from a JSON file on disk
#[derive(Debug, Clone)]
pub struct LocalFileProvider {
    path: PathBuf,
}

impl LocalFileProvider {
    /// Creates a provider reading the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a provider reading the configured local file
    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.local_path.clone())
    }
}

/// Keeps the valid questions of one difficulty
///
/// Each record is decoded on its own. Records that do not decode as a
/// question (an unknown difficulty, a missing field) or that break the
/// question invariants are skipped with a warning.
fn select(records: Vec<serde_json::Value>, difficulty: Difficulty) -> Result<Vec<Question>, Error> {
    let selected = records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match serde_json::from_value::<Question>(record) {
            Ok(question) => Some(question),
            Err(error) => {
                tracing::warn!(position, %error, "skipping undecodable question");
                None
            }
        })
        .filter(|q| q.difficulty() == difficulty)
        .filter(|q| match q.validate() {
            Ok(()) => true,
            Err(report) => {
                tracing::warn!(question = q.text(), %report, "skipping invalid question");
                false
            }
        })
        .collect_vec();

    if selected.is_empty() {
        Err(Error::NoQuestions(difficulty))
    } else {
        Ok(selected)
    }
}

#[async_trait]
impl QuestionProvider for LocalFileProvider {
    async fn fetch(&self, difficulty: Difficulty) -> Result<Vec<Question>, Error> {
        tracing::debug!(path = ?self.path, %difficulty, "reading questions");
        let data = tokio::fs::read(&self.path).await?;
        let records: Vec<serde_json::Value> = serde_json::from_slice(&data)?;
        select(records, difficulty)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const FILE: &str = r#"[
        {"question": "2 + 2?", "options": ["3", "4"], "correct": "4", "difficulty": "easy"},
        {"question": "Square root of 144?", "options": ["12", "14", "16"], "correct": "12", "difficulty": "medium"},
        {"question": "Broken", "options": ["A", "B"], "correct": "C", "difficulty": "easy"},
        {"question": "Capital of Peru?", "options": ["Lima", "Quito"], "correct": "Lima", "difficulty": "easy"}
    ]"#;

    fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("questions-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_fetch_filters_by_difficulty() {
        let path = write_temp(FILE);
        let provider = LocalFileProvider::new(&path);

        let questions = provider.fetch(Difficulty::Easy).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.difficulty() == Difficulty::Easy));
        assert_eq!(questions[0].text(), "2 + 2?");
        assert_eq!(questions[1].text(), "Capital of Peru?");

        let questions = provider.fetch(Difficulty::Medium).await.unwrap();
        assert_eq!(questions.len(), 1);

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_fetch_skips_foreign_records() {
        let path = write_temp(
            r#"[
                {"question": "2 + 2?", "options": ["3", "4"], "correct": "4", "difficulty": "easy"},
                {"question": "Riemann?", "options": ["Yes", "No"], "correct": "Yes", "difficulty": "expert"},
                {"question": "No level", "options": ["A", "B"], "correct": "A"},
                {"difficulty": "expert"},
                42
            ]"#,
        );
        let provider = LocalFileProvider::new(&path);

        let questions = provider.fetch(Difficulty::Easy).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text(), "2 + 2?");

        let result = provider.fetch(Difficulty::Hard).await;
        assert!(matches!(result, Err(Error::NoQuestions(Difficulty::Hard))));

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_fetch_no_matching_difficulty() {
        let path = write_temp(FILE);
        let provider = LocalFileProvider::new(&path);

        let result = provider.fetch(Difficulty::Hard).await;
        assert!(matches!(result, Err(Error::NoQuestions(Difficulty::Hard))));

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let provider = LocalFileProvider::new(
            std::env::temp_dir().join(format!("missing-{}.json", uuid::Uuid::new_v4())),
        );

        let result = provider.fetch(Difficulty::Easy).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_fetch_malformed_file() {
        let path = write_temp("{ not json");
        let provider = LocalFileProvider::new(&path);

        let result = provider.fetch(Difficulty::Easy).await;
        assert!(matches!(result, Err(Error::Json(_))));

        std::fs::remove_file(path).unwrap();
    }
}
