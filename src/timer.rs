//! Per-question countdown
//!
//! The countdown does not own a clock thread. Starting it hands an
//! [`AlarmMessage`] and a delay to a host scheduling function; the host
//! delivers the alarm back when the delay elapses. A delivered alarm only
//! counts if it belongs to the start that is still armed, so a late alarm
//! from a previous question, or from before a restart, is discarded.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Alarm messages scheduled by the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Time ran out for the question at `index`
    TimeUp {
        /// Index of the question the countdown was bound to
        index: usize,
        /// Start generation; differs between two starts on the same index
        epoch: u64,
    },
}

/// The currently armed start
#[derive(Debug, Clone, Copy)]
struct Binding {
    index: usize,
    epoch: u64,
    started: Instant,
    duration: Duration,
}

/// A countdown bound to at most one question at a time
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    binding: Option<Binding>,
    epoch: u64,
}

impl Countdown {
    /// Creates a stopped countdown
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts counting down `duration` for the question at `index`
    ///
    /// Any running countdown is torn down first, then exactly one alarm is
    /// handed to `schedule_message`.
    ///
    /// # Arguments
    ///
    /// * `index` - Question the countdown is bound to
    /// * `duration` - Time until the alarm fires
    /// * `schedule_message` - Host function that delivers the alarm after the delay
    pub fn start<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        index: usize,
        duration: Duration,
        mut schedule_message: S,
    ) {
        self.stop();
        self.epoch += 1;
        self.binding = Some(Binding {
            index,
            epoch: self.epoch,
            started: Instant::now(),
            duration,
        });
        tracing::trace!(index, epoch = self.epoch, ?duration, "countdown started");
        schedule_message(
            AlarmMessage::TimeUp {
                index,
                epoch: self.epoch,
            },
            duration,
        );
    }

    /// Disarms the countdown
    ///
    /// # Returns
    ///
    /// `true` if a countdown was running
    pub fn stop(&mut self) -> bool {
        self.binding.take().is_some()
    }

    /// Accepts a delivered alarm
    ///
    /// # Returns
    ///
    /// `true` exactly once for the alarm of the armed start; `false` for
    /// stale, duplicate, or cancelled alarms
    pub fn expire(&mut self, alarm: &AlarmMessage) -> bool {
        let AlarmMessage::TimeUp { index, epoch } = *alarm;
        match self.binding {
            Some(binding) if binding.index == index && binding.epoch == epoch => {
                self.binding = None;
                true
            }
            _ => {
                tracing::debug!(index, epoch, "dropping stale alarm");
                false
            }
        }
    }

    /// Whether a countdown is armed
    pub fn is_running(&self) -> bool {
        self.binding.is_some()
    }

    /// The question index the countdown is bound to
    pub fn bound_index(&self) -> Option<usize> {
        self.binding.map(|b| b.index)
    }

    /// Remaining time for display, saturating at zero
    ///
    /// This is not authoritative: only an accepted alarm means time ran out.
    pub fn remaining(&self) -> Option<Duration> {
        self.binding.map(|binding| {
            binding.duration.saturating_sub(binding.started.elapsed())
        })
    }
}
