//! Tokio host for a quiz session
//!
//! [`QuizRunner`] owns a [`QuizSession`] and is its only writer. Intents
//! from the presentation layer, countdown alarms, and question source
//! responses all funnel into one event loop and are applied one at a time.
//!
//! Each scheduled alarm is a sleeping task. The previous task is aborted
//! before a new one is spawned, and any pending task is aborted as soon as
//! the session's countdown stops, so a late alarm never reaches a newer
//! question. The session still rejects stale alarms on its own.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{
    config::QuizConfig,
    constants,
    provider::{self, QuestionProvider},
    question::{Difficulty, Question},
    session::{Intent, Phase, QuizSession, RequestKey},
    timer::AlarmMessage,
    view::View,
};

/// Events produced by tasks spawned from the runner
#[derive(Debug)]
enum Event {
    /// A countdown alarm elapsed
    Alarm(AlarmMessage),
    /// A question source answered a request
    Questions(RequestKey, Result<Vec<Question>, provider::Error>),
}

/// Aborts the pending alarm task, then spawns one delivering `alarm` after `delay`
fn schedule_alarm(
    events: &mpsc::UnboundedSender<Event>,
    alarm_task: &mut Option<JoinHandle<()>>,
    alarm: AlarmMessage,
    delay: Duration,
) {
    if let Some(previous) = alarm_task.take() {
        previous.abort();
    }
    let events = events.clone();
    *alarm_task = Some(tokio::spawn(async move {
        time::sleep(delay).await;
        // the runner may already be gone
        let _ = events.send(Event::Alarm(alarm));
    }));
}

/// Runs one quiz session against a question source and a view
pub struct QuizRunner<P, V> {
    session: QuizSession,
    provider: Arc<P>,
    view: V,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    alarm_task: Option<JoinHandle<()>>,
}

impl<P: QuestionProvider + 'static, V: View> QuizRunner<P, V> {
    /// Creates a runner for `session`
    ///
    /// # Arguments
    ///
    /// * `session` - The session to host, usually still loading
    /// * `provider` - Source answering question requests
    /// * `view` - Renderer receiving snapshots and results
    pub fn new(session: QuizSession, provider: P, view: V) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session,
            provider: Arc::new(provider),
            view,
            events_tx,
            events_rx,
            alarm_task: None,
        }
    }

    /// Creates a runner with a fresh session using the configured time limit
    pub fn from_config(config: &QuizConfig, provider: P, view: V) -> Self {
        Self::new(QuizSession::from_config(config), provider, view)
    }

    /// The hosted session
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Requests questions of `difficulty`, replacing the current quiz
    pub fn start(&mut self, difficulty: Difficulty) {
        self.handle_intent(Intent::ChangeDifficulty(difficulty));
    }

    /// Processes events until the intent channel closes
    ///
    /// # Returns
    ///
    /// The session in its final state
    pub async fn run(mut self, mut intents: mpsc::Receiver<Intent>) -> QuizSession {
        let mut display = time::interval(Duration::from_secs(constants::timer::DISPLAY_TICK));
        display.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => self.handle_intent(intent),
                    None => break,
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
                _ = display.tick(), if self.session.phase() == Phase::Answering => {
                    self.view.render(&self.session.snapshot());
                }
            }
        }

        self.cancel_alarm();
        self.session
    }

    fn handle_intent(&mut self, intent: Intent) {
        let before = self.session.phase();
        let events = &self.events_tx;
        let alarm_task = &mut self.alarm_task;
        let request = self.session.receive_intent(intent, |alarm, delay| {
            schedule_alarm(events, alarm_task, alarm, delay);
        });

        if let Some(key) = request {
            self.request_questions(key);
        }
        self.after_event(before);
    }

    fn handle_event(&mut self, event: Event) {
        let before = self.session.phase();
        let events = &self.events_tx;
        let alarm_task = &mut self.alarm_task;
        let schedule = |alarm, delay| schedule_alarm(events, alarm_task, alarm, delay);

        match event {
            Event::Alarm(alarm) => {
                self.session.receive_alarm(alarm, schedule);
            }
            Event::Questions(key, response) => {
                self.session.receive_questions(key, response, schedule);
            }
        }
        self.after_event(before);
    }

    /// Spawns the provider request for `key`
    fn request_questions(&self, key: RequestKey) {
        let provider = Arc::clone(&self.provider);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let response = provider.fetch(key.difficulty()).await;
            let _ = events.send(Event::Questions(key, response));
        });
    }

    fn after_event(&mut self, before: Phase) {
        if !self.session.countdown().is_running() {
            self.cancel_alarm();
        }

        self.view.render(&self.session.snapshot());
        if before != Phase::Finished {
            if let Some(results) = self.session.results() {
                self.view.show_results(&results);
            }
        }
    }

    fn cancel_alarm(&mut self) {
        if let Some(task) = self.alarm_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        question::AnswerRecord,
        score::Results,
        session::{self, Snapshot},
    };

    #[derive(Clone, Default)]
    struct Recorder {
        snapshots: Arc<Mutex<Vec<Snapshot>>>,
        results: Arc<Mutex<Vec<Results>>>,
    }

    impl View for Recorder {
        fn render(&self, snapshot: &Snapshot) {
            self.snapshots.lock().unwrap().push(snapshot.clone());
        }

        fn show_results(&self, results: &Results) {
            self.results.lock().unwrap().push(results.clone());
        }
    }

    /// Serves two questions; easy requests answer five seconds late
    struct Stub {
        fail: bool,
    }

    #[async_trait]
    impl QuestionProvider for Stub {
        async fn fetch(&self, difficulty: Difficulty) -> Result<Vec<Question>, provider::Error> {
            if self.fail {
                return Err(provider::Error::NoQuestions(difficulty));
            }
            if difficulty == Difficulty::Easy {
                time::sleep(Duration::from_secs(5)).await;
            }
            Ok(vec![
                Question::new("Q1", vec!["A".into(), "B".into()], "A", difficulty).unwrap(),
                Question::new("Q2", vec!["C".into(), "D".into()], "D", difficulty).unwrap(),
            ])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_then_time_up() {
        let view = Recorder::default();
        let runner = QuizRunner::new(
            QuizSession::new(Duration::from_secs(30)),
            Stub { fail: false },
            view.clone(),
        );
        let (intents, receiver) = mpsc::channel(8);
        let handle = tokio::spawn(runner.run(receiver));

        intents
            .send(Intent::ChangeDifficulty(Difficulty::Medium))
            .await
            .unwrap();
        time::sleep(Duration::from_millis(10)).await;
        intents.send(Intent::SelectOption("A".into())).await.unwrap();
        intents.send(Intent::ConfirmAndAdvance).await.unwrap();
        time::sleep(Duration::from_secs(31)).await;
        drop(intents);

        let session = handle.await.unwrap();
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.state().answers().get(&0), Some(&AnswerRecord::Chosen("A".into())));
        assert_eq!(session.state().answers().get(&1), Some(&AnswerRecord::Skipped));

        let results = view.results.lock().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_dropped() {
        let view = Recorder::default();
        let mut runner = QuizRunner::new(
            QuizSession::new(Duration::from_secs(30)),
            Stub { fail: false },
            view.clone(),
        );
        runner.start(Difficulty::Easy);
        let (intents, receiver) = mpsc::channel(8);
        let handle = tokio::spawn(runner.run(receiver));

        intents
            .send(Intent::ChangeDifficulty(Difficulty::Medium))
            .await
            .unwrap();
        time::sleep(Duration::from_secs(6)).await;
        drop(intents);

        let session = handle.await.unwrap();
        assert_eq!(session.difficulty(), Difficulty::Medium);
        assert_eq!(session.phase(), Phase::Answering);
        assert!(session
            .state()
            .questions()
            .iter()
            .all(|q| q.difficulty() == Difficulty::Medium));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_is_rendered() {
        let view = Recorder::default();
        let mut runner = QuizRunner::new(
            QuizSession::new(Duration::from_secs(30)),
            Stub { fail: true },
            view.clone(),
        );
        runner.start(Difficulty::Hard);
        let (intents, receiver) = mpsc::channel(8);
        let handle = tokio::spawn(runner.run(receiver));

        time::sleep(Duration::from_millis(10)).await;
        drop(intents);

        let session = handle.await.unwrap();
        assert_eq!(
            session.phase(),
            Phase::Unavailable(session::Error::SourceUnavailable)
        );
        let snapshots = view.snapshots.lock().unwrap();
        assert_eq!(
            snapshots.last().map(|s| s.phase),
            Some(Phase::Unavailable(session::Error::SourceUnavailable))
        );
        assert!(view.results.lock().unwrap().is_empty());
    }
}
