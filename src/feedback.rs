use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::error::FeedbackError;

/// One event per submitted word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Feedback {
    Correct,
    Incorrect,
}

/// Receiver of per-word feedback (sound, flash, ...).
///
/// The engine never waits on a sink and drops its errors after logging them.
pub trait FeedbackSink {
    fn notify(&mut self, feedback: Feedback) -> Result<(), FeedbackError>;
}

impl<S: FeedbackSink + ?Sized> FeedbackSink for Box<S> {
    fn notify(&mut self, feedback: Feedback) -> Result<(), FeedbackError> {
        (**self).notify(feedback)
    }
}

/// Rings the terminal bell. Mistakes always ring; correct words only when
/// `on_correct` is set.
pub struct TerminalBell<W: Write> {
    out: W,
    on_correct: bool,
}

impl TerminalBell<std::io::Stdout> {
    pub fn stdout(on_correct: bool) -> Self {
        Self::new(std::io::stdout(), on_correct)
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W, on_correct: bool) -> Self {
        Self { out, on_correct }
    }
}

impl<W: Write> FeedbackSink for TerminalBell<W> {
    fn notify(&mut self, feedback: Feedback) -> Result<(), FeedbackError> {
        if feedback == Feedback::Correct && !self.on_correct {
            return Ok(());
        }
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn notify(&mut self, _feedback: Feedback) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Collects events in a shared list so tests can inspect them after the
/// sink has been moved into an engine.
#[derive(Debug, Default, Clone)]
pub struct RecordingFeedback {
    events: Arc<Mutex<Vec<Feedback>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Feedback> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl FeedbackSink for RecordingFeedback {
    fn notify(&mut self, feedback: Feedback) -> Result<(), FeedbackError> {
        match self.events.lock() {
            Ok(mut events) => events.push(feedback),
            Err(poisoned) => poisoned.into_inner().push(feedback),
        }
        Ok(())
    }
}
