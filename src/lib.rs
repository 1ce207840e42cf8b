//! # Timed Quiz Library
//!
//! This library provides the core logic of a timed multiple choice quiz.
//! It loads questions for a difficulty from a remote API with a local file
//! fallback, presents them one at a time with a per-question countdown,
//! records each answer, skip, or timeout, and scores the finished quiz.
//!
//! The [`session::QuizSession`] state machine is the center of the crate.
//! It is driven by discrete events and never blocks; the
//! [`runtime::QuizRunner`] hosts one on tokio and connects it to a
//! [`provider::QuestionProvider`] and a [`view::View`].

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod provider;
pub mod question;
pub mod runtime;
pub mod score;
pub mod session;
pub mod timer;
pub mod view;

pub use config::QuizConfig;
pub use question::{AnswerRecord, Answers, Difficulty, Question};
pub use runtime::QuizRunner;
pub use score::{Results, Score, Verdict, compute_score};
pub use session::{Intent, Phase, QuizSession, Snapshot};
