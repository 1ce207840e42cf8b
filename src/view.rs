//! Presentation boundary
//!
//! This module defines the trait through which a running quiz reaches its
//! renderer. The renderer is a pure consumer: it receives snapshots and
//! results, and sends user intents back through the runner's channel.

use crate::{score::Results, session::Snapshot};

/// Trait for rendering a quiz session
///
/// Implementations might draw to a terminal, push JSON over a WebSocket,
/// or update a browser DOM.
pub trait View {
    /// Renders the current state of the session
    ///
    /// Called after every handled event and on each display tick while a
    /// question is being answered.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - The state to render
    fn render(&self, snapshot: &Snapshot);

    /// Shows the final results once the last question is passed
    ///
    /// # Arguments
    ///
    /// * `results` - Score, verdicts and recorded answers of the quiz
    fn show_results(&self, results: &Results);
}
