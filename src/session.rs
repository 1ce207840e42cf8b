//! Quiz session state machine
//!
//! A [`QuizSession`] owns the whole state of one quiz: the question list,
//! the current position, the recorded answers, the pending selection and
//! the countdown bound to the current question. Every mutation arrives as
//! a discrete event (an [`Intent`] from the presentation layer, an
//! [`AlarmMessage`] from the host's scheduler, or a provider response) and
//! runs to completion before the next one is handled.
//!
//! Phases progress `Loading -> Answering -> Finished`. `Answering` is
//! re-entered for each question. A failed load ends in `Unavailable`,
//! which only a new difficulty selection leaves.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::QuizConfig,
    provider,
    question::{AnswerRecord, Answers, Difficulty, Question},
    score::{self, Results, Score},
    timer::{AlarmMessage, Countdown},
};

/// Errors that leave a session without questions
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The question source returned no questions
    #[error("no questions available")]
    EmptyQuestionSet,
    /// Every question source failed
    #[error("could not load questions, please try again later")]
    SourceUnavailable,
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Waiting for the question source to respond
    Loading,
    /// A question is shown and accepts input
    Answering,
    /// Every question has been passed
    Finished,
    /// Loading failed; a new difficulty must be selected
    Unavailable(Error),
}

/// Identifies one question request
///
/// Responses carrying an older key than the latest request are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestKey {
    id: u64,
    difficulty: Difficulty,
}

impl RequestKey {
    /// The difficulty that was requested
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

/// User intents forwarded by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Intent {
    /// Mark an option as the pending selection
    SelectOption(String),
    /// Skip the current question
    Skip,
    /// Finalize the pending selection and move on ("Next")
    ConfirmAndAdvance,
    /// Go back to the first question
    Restart {
        /// Whether recorded answers are discarded
        reset_answers: bool,
    },
    /// Replace the quiz with questions of another difficulty
    ChangeDifficulty(Difficulty),
}

/// The complete state of one quiz
#[derive(Debug, Clone, Serialize)]
pub struct QuizState {
    questions: Vec<Question>,
    current_index: usize,
    answers: Answers,
    pending: Option<String>,
    phase: Phase,
}

impl QuizState {
    fn loading() -> Self {
        Self {
            questions: Vec::new(),
            current_index: 0,
            answers: Answers::new(),
            pending: None,
            phase: Phase::Loading,
        }
    }

    /// The questions of this quiz, fixed for its lifetime
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Index of the question being answered (the last one once finished)
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question being answered, if any
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Answering => self.questions.get(self.current_index),
            _ => None,
        }
    }

    /// Finalized answers keyed by question index
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// The selection not yet finalized for the current question
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// The current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// The current question as shown to the user, without its correct option
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    /// 1-based position for progress display
    pub number: usize,
    /// The prompt
    pub text: String,
    /// The options in display order
    pub options: Vec<String>,
}

/// Everything the presentation layer needs to render the session
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Current phase
    pub phase: Phase,
    /// Difficulty of the current quiz
    pub difficulty: Difficulty,
    /// Index of the current question
    pub current_index: usize,
    /// Total number of questions
    pub count: usize,
    /// The question to render while answering
    pub question: Option<QuestionView>,
    /// The selection to highlight
    pub pending_selection: Option<String>,
    /// Remaining time for display
    #[serde_as(as = "Option<serde_with::DurationMilliSeconds<u64>>")]
    pub time_left: Option<Duration>,
}

/// A single quiz session
#[derive(Debug, Clone)]
pub struct QuizSession {
    difficulty: Difficulty,
    last_request: u64,
    time_limit: Duration,
    state: QuizState,
    countdown: Countdown,
}

impl QuizSession {
    /// Creates a session in the loading phase
    ///
    /// # Arguments
    ///
    /// * `time_limit` - Time allowed for each question
    pub fn new(time_limit: Duration) -> Self {
        Self {
            difficulty: Difficulty::default(),
            last_request: 0,
            time_limit,
            state: QuizState::loading(),
            countdown: Countdown::new(),
        }
    }

    /// Creates a session using the configured time limit
    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.time_limit)
    }

    /// The state of the quiz
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    /// The current phase
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Difficulty of the current or pending quiz
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The countdown bound to the current question
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Discards the current quiz and waits for questions of `difficulty`
    ///
    /// # Returns
    ///
    /// The key the provider response must carry to be applied
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> RequestKey {
        self.countdown.stop();
        self.last_request += 1;
        self.difficulty = difficulty;
        self.state = QuizState::loading();
        tracing::info!(%difficulty, request = self.last_request, "loading questions");

        RequestKey {
            id: self.last_request,
            difficulty,
        }
    }

    /// Applies a question source response
    ///
    /// Responses to superseded requests are ignored. An empty list or a
    /// provider failure moves the session to [`Phase::Unavailable`].
    ///
    /// # Returns
    ///
    /// `true` if the response was applied
    pub fn receive_questions<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        key: RequestKey,
        response: Result<Vec<Question>, provider::Error>,
        schedule_message: S,
    ) -> bool {
        if key.id != self.last_request || self.state.phase != Phase::Loading {
            tracing::debug!(request = key.id, latest = self.last_request, "dropping stale questions");
            return false;
        }

        match response {
            Ok(questions) => {
                if let Err(error) = self.initialize(questions, schedule_message) {
                    self.state.phase = Phase::Unavailable(error);
                }
            }
            Err(error) => {
                tracing::error!(%error, difficulty = %key.difficulty, "questions unavailable");
                self.state.phase = Phase::Unavailable(Error::SourceUnavailable);
            }
        }
        true
    }

    /// Starts the quiz at its first question
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyQuestionSet`] if `questions` is empty; the
    /// session is left unchanged in that case.
    pub fn initialize<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        questions: Vec<Question>,
        schedule_message: S,
    ) -> Result<(), Error> {
        if questions.is_empty() {
            tracing::warn!(difficulty = %self.difficulty, "empty question set");
            return Err(Error::EmptyQuestionSet);
        }

        tracing::info!(count = questions.len(), difficulty = %self.difficulty, "quiz started");
        self.state = QuizState {
            questions,
            current_index: 0,
            answers: Answers::new(),
            pending: None,
            phase: Phase::Answering,
        };
        self.enter_question(schedule_message);
        Ok(())
    }

    /// Stores `option` as the pending selection for the current question
    ///
    /// Replaces any earlier pending selection. Ignored outside
    /// [`Phase::Answering`] and for strings that are not options of the
    /// current question.
    ///
    /// # Returns
    ///
    /// `true` if the selection was stored
    pub fn select_option(&mut self, option: impl Into<String>) -> bool {
        let option = option.into();
        if self
            .state
            .current_question()
            .is_some_and(|question| question.has_option(&option))
        {
            self.state.pending = Some(option);
            true
        } else {
            tracing::debug!(?option, "ignoring selection");
            false
        }
    }

    /// Finalizes the pending selection and advances
    ///
    /// Does nothing without a pending selection.
    ///
    /// # Returns
    ///
    /// `true` if the session advanced
    pub fn confirm_and_advance<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        schedule_message: S,
    ) -> bool {
        if self.state.phase != Phase::Answering {
            return false;
        }
        match self.state.pending.take() {
            Some(option) => {
                self.finalize_and_advance(AnswerRecord::Chosen(option), schedule_message);
                true
            }
            None => false,
        }
    }

    /// Records the current question as skipped and advances
    ///
    /// Any pending selection is discarded.
    ///
    /// # Returns
    ///
    /// `true` if the session advanced
    pub fn skip<S: FnMut(AlarmMessage, Duration)>(&mut self, schedule_message: S) -> bool {
        if self.state.phase != Phase::Answering {
            return false;
        }
        self.finalize_and_advance(AnswerRecord::Skipped, schedule_message);
        true
    }

    /// Handles the current question running out of time
    ///
    /// Records the pending selection if there is one, otherwise a skip,
    /// then advances.
    ///
    /// # Returns
    ///
    /// `true` if the session advanced
    pub fn time_up<S: FnMut(AlarmMessage, Duration)>(&mut self, schedule_message: S) -> bool {
        if self.state.phase != Phase::Answering {
            return false;
        }
        let record = self
            .state
            .pending
            .take()
            .map_or(AnswerRecord::Skipped, AnswerRecord::Chosen);
        tracing::debug!(index = self.state.current_index, ?record, "time up");
        self.finalize_and_advance(record, schedule_message);
        true
    }

    /// Returns to the first question of the same quiz
    ///
    /// Without `reset_answers`, earlier answers stay recorded and each
    /// revisited question starts with its recorded option pending.
    ///
    /// # Returns
    ///
    /// `true` if the session restarted; `false` while loading or unavailable
    pub fn restart<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        reset_answers: bool,
        schedule_message: S,
    ) -> bool {
        if !matches!(self.state.phase, Phase::Answering | Phase::Finished) {
            return false;
        }

        tracing::info!(reset_answers, "quiz restarted");
        self.countdown.stop();
        self.state.current_index = 0;
        self.state.pending = None;
        if reset_answers {
            self.state.answers.clear();
        }
        self.state.phase = Phase::Answering;
        self.enter_question(schedule_message);
        true
    }

    /// Handles an alarm delivered by the host's scheduler
    ///
    /// # Returns
    ///
    /// `true` if the alarm was current and the session advanced
    pub fn receive_alarm<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        alarm: AlarmMessage,
        schedule_message: S,
    ) -> bool {
        match alarm {
            AlarmMessage::TimeUp { index, .. } => {
                if index == self.state.current_index && self.countdown.expire(&alarm) {
                    self.time_up(schedule_message)
                } else {
                    false
                }
            }
        }
    }

    /// Dispatches an intent from the presentation layer
    ///
    /// # Returns
    ///
    /// The key of a new question request when the difficulty changed
    pub fn receive_intent<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        intent: Intent,
        schedule_message: S,
    ) -> Option<RequestKey> {
        match intent {
            Intent::SelectOption(option) => {
                self.select_option(option);
            }
            Intent::Skip => {
                self.skip(schedule_message);
            }
            Intent::ConfirmAndAdvance => {
                self.confirm_and_advance(schedule_message);
            }
            Intent::Restart { reset_answers } => {
                self.restart(reset_answers, schedule_message);
            }
            Intent::ChangeDifficulty(difficulty) => return Some(self.select_difficulty(difficulty)),
        }
        None
    }

    /// Scores the recorded answers
    pub fn score(&self) -> Score {
        score::compute_score(&self.state.questions, &self.state.answers)
    }

    /// The results view payload, available once finished
    pub fn results(&self) -> Option<Results> {
        match self.state.phase {
            Phase::Finished => Some(Results::new(&self.state.questions, &self.state.answers)),
            _ => None,
        }
    }

    /// Captures what the presentation layer renders
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            difficulty: self.difficulty,
            current_index: self.state.current_index,
            count: self.state.questions.len(),
            question: self.state.current_question().map(|q| QuestionView {
                number: self.state.current_index + 1,
                text: q.text().to_owned(),
                options: q.options().to_vec(),
            }),
            pending_selection: self.state.pending.clone(),
            time_left: self.countdown.remaining(),
        }
    }

    /// Records `record` for the current question and moves past it
    ///
    /// This is the only path that writes answers, shared by confirm, skip
    /// and time up.
    fn finalize_and_advance<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        record: AnswerRecord,
        schedule_message: S,
    ) {
        self.countdown.stop();
        let index = self.state.current_index;
        self.state.answers.insert(index, record);
        self.state.pending = None;

        if index + 1 >= self.state.questions.len() {
            self.state.phase = Phase::Finished;
            tracing::info!(score = self.score().score, total = self.state.questions.len(), "quiz finished");
        } else {
            self.state.current_index += 1;
            self.enter_question(schedule_message);
        }
    }

    /// Prepares the current question and binds the countdown to it
    fn enter_question<S: FnMut(AlarmMessage, Duration)>(&mut self, schedule_message: S) {
        let index = self.state.current_index;
        self.state.pending = self
            .state
            .answers
            .get(&index)
            .and_then(AnswerRecord::chosen)
            .map(ToOwned::to_owned);
        self.countdown.start(index, self.time_limit, schedule_message);
    }
}
