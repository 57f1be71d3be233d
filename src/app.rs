use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::SessionEngine;
use crate::feedback::Feedback;
use crate::session::GameState;

/// How long the word display stays tinted after a submission.
pub const FLASH_DURATION: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackFlash {
    pub feedback: Feedback,
    pub at: Instant,
}

/// Terminal front end state: the engine plus what only the UI cares about,
/// the visible input buffer and the post-submission flash.
pub struct App {
    pub engine: SessionEngine,
    pub input: String,
    pub flash: Option<FeedbackFlash>,
}

impl App {
    pub fn new(engine: SessionEngine) -> Self {
        Self {
            engine,
            input: String::new(),
            flash: None,
        }
    }

    /// Let the engine catch up with wall time and expire the flash.
    pub fn on_tick(&mut self, now: Instant) {
        self.engine.advance(now);
        if self.active_flash(now).is_none() {
            self.flash = None;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> AppAction {
        // Timers due before this key must land first.
        self.engine.advance(now);

        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return AppAction::Quit;
        }

        match self.engine.state() {
            GameState::Idle | GameState::GameOver => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                    self.start(now);
                }
            }
            GameState::Playing => match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.input.push(c);
                    self.edit(now);
                }
                KeyCode::Backspace => {
                    if self.input.pop().is_some() {
                        self.edit(now);
                    }
                }
                _ => {}
            },
        }

        AppAction::Continue
    }

    pub fn start(&mut self, now: Instant) {
        self.input.clear();
        self.flash = None;
        match self.engine.state() {
            GameState::GameOver => self.engine.restart(now),
            _ => self.engine.start(now),
        }
    }

    /// Cancel the engine timers before the app goes away.
    pub fn shutdown(&mut self) {
        self.engine.stop();
    }

    pub fn active_flash(&self, now: Instant) -> Option<Feedback> {
        self.flash
            .filter(|flash| now.saturating_duration_since(flash.at) < FLASH_DURATION)
            .map(|flash| flash.feedback)
    }

    fn edit(&mut self, now: Instant) {
        if let Some(submission) = self.engine.handle_input(&self.input) {
            self.input.clear();
            self.flash = Some(FeedbackFlash {
                feedback: submission.feedback,
                at: now,
            });
        }
    }
}
