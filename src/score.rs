//! Scoring and results
//!
//! This module turns the final questions and recorded answers into a score
//! and a verdict per question. Scoring is a pure function: it never fails
//! and treats an index without a recorded answer as wrong.

use enum_map::{Enum, EnumMap};
use itertools::Itertools;
use serde::Serialize;

use crate::question::{AnswerRecord, Answers, Question};

/// Outcome of a single question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Enum)]
pub enum Verdict {
    /// The recorded answer is the correct option
    Correct,
    /// The recorded answer is another option, or nothing was recorded
    Wrong,
    /// The question was skipped or timed out with nothing selected
    Skipped,
}

impl Verdict {
    /// Classifies one recorded answer against its question
    pub fn of(question: &Question, answer: Option<&AnswerRecord>) -> Self {
        match answer {
            Some(AnswerRecord::Skipped) => Self::Skipped,
            Some(AnswerRecord::Chosen(option)) if question.is_correct(option) => Self::Correct,
            Some(AnswerRecord::Chosen(_)) | None => Self::Wrong,
        }
    }
}

/// Score and per-question verdicts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Number of correct verdicts
    pub score: usize,
    /// Verdict for every question, in question order
    pub per_question: Vec<Verdict>,
}

impl Score {
    /// Counts how many questions received each verdict
    pub fn tally(&self) -> EnumMap<Verdict, usize> {
        let mut tally = EnumMap::default();
        for verdict in &self.per_question {
            tally[*verdict] += 1;
        }
        tally
    }
}

/// Computes the score of a finished quiz
///
/// # Arguments
///
/// * `questions` - The questions of the session, in order
/// * `answers` - Recorded answers keyed by question index
///
/// # Returns
///
/// The number of correct answers and a verdict per question
pub fn compute_score(questions: &[Question], answers: &Answers) -> Score {
    let per_question = questions
        .iter()
        .enumerate()
        .map(|(index, question)| Verdict::of(question, answers.get(&index)))
        .collect_vec();
    let score = per_question
        .iter()
        .filter(|v| **v == Verdict::Correct)
        .count();

    Score {
        score,
        per_question,
    }
}

/// One row of the results view
#[derive(Debug, Clone, Serialize)]
pub struct ResultItem {
    /// The question that was asked
    pub question: Question,
    /// What was recorded for it, if anything
    pub answer: Option<AnswerRecord>,
    /// How the answer was judged
    pub verdict: Verdict,
}

/// Read-only payload for the results view
#[derive(Debug, Clone, Serialize)]
pub struct Results {
    /// Number of correct answers
    pub score: usize,
    /// Number of questions in the quiz
    pub total: usize,
    /// One entry per question
    pub items: Vec<ResultItem>,
}

impl Results {
    /// Builds the results view payload from the final questions and answers
    pub fn new(questions: &[Question], answers: &Answers) -> Self {
        let Score {
            score,
            per_question,
        } = compute_score(questions, answers);

        Self {
            score,
            total: questions.len(),
            items: questions
                .iter()
                .zip(per_question)
                .enumerate()
                .map(|(index, (question, verdict))| ResultItem {
                    question: question.clone(),
                    answer: answers.get(&index).cloned(),
                    verdict,
                })
                .collect_vec(),
        }
    }
}
