use std::time::Instant;

use crate::feedback::FeedbackSink;
use crate::high_score::HighScoreStore;
use crate::language::FALLBACK_WORD;
use crate::session::{GameState, Session, TypingAttempt, WordHistoryEntry, BASE_DECAY_RATE, MAX_PROGRESS};
use crate::timer::{PeriodicTimer, CLOCK_INTERVAL, DECAY_INTERVAL};
use crate::typing_policy::{self, Submission};
use crate::word_provider::WordSource;

/// Seconds of play per difficulty level.
pub const LEVEL_SECONDS: u32 = 40;
/// Decay rate added per level.
pub const DECAY_STEP: f64 = 0.5;
/// Decay ticks per second; each tick drains `decay_rate / DECAY_TICKS_PER_SEC`.
pub const DECAY_TICKS_PER_SEC: f64 = 5.0;

pub fn level_for(elapsed_seconds: u32) -> u32 {
    elapsed_seconds / LEVEL_SECONDS
}

pub fn decay_rate_for(elapsed_seconds: u32) -> f64 {
    BASE_DECAY_RATE + level_for(elapsed_seconds) as f64 * DECAY_STEP
}

/// The game session state machine.
///
/// Owns the [`Session`] and the two periodic processes that drive it. The
/// host calls [`advance`](Self::advance) with the current instant whenever
/// it wakes up and forwards the input buffer to
/// [`handle_input`](Self::handle_input) on every edit. Every handler is a
/// no-op unless the session is playing.
pub struct SessionEngine {
    session: Session,
    decay_timer: PeriodicTimer,
    clock_timer: PeriodicTimer,
    words: Box<dyn WordSource>,
    store: Box<dyn HighScoreStore>,
    feedback: Box<dyn FeedbackSink>,
}

impl SessionEngine {
    pub fn new(
        words: impl WordSource + 'static,
        store: impl HighScoreStore + 'static,
        feedback: impl FeedbackSink + 'static,
    ) -> Self {
        let high_score = load_high_score(&store);

        Self {
            session: Session::new(high_score),
            decay_timer: PeriodicTimer::new(DECAY_INTERVAL),
            clock_timer: PeriodicTimer::new(CLOCK_INTERVAL),
            words: Box::new(words),
            store: Box::new(store),
            feedback: Box::new(feedback),
        }
    }

    /// Read-only view for rendering.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> GameState {
        self.session.state
    }

    pub fn level(&self) -> u32 {
        level_for(self.session.elapsed_seconds)
    }

    pub fn timers_running(&self) -> bool {
        self.decay_timer.is_running() || self.clock_timer.is_running()
    }

    /// Begin a fresh session. Any running timers are cancelled before the
    /// state is reset, so a tick from the previous session can never land.
    pub fn start(&mut self, now: Instant) {
        self.cancel_timers();

        let word = self.next_word();
        self.session = Session {
            state: GameState::Playing,
            attempt: TypingAttempt::fresh(&word),
            current_word: word,
            ..Session::new(self.session.high_score)
        };

        self.decay_timer.start(now);
        self.clock_timer.start(now);
        tracing::info!(word = %self.session.current_word, "session started");
    }

    pub fn restart(&mut self, now: Instant) {
        self.start(now);
    }

    /// Tear the session down: both periodic processes are cancelled and a
    /// running game drops back to Idle, so neither ticks nor input touch it
    /// until the next `start`. A finished game stays GameOver.
    pub fn stop(&mut self) {
        self.cancel_timers();
        if self.session.is_playing() {
            self.session.state = GameState::Idle;
        }
        tracing::debug!(state = %self.session.state, "session engine stopped");
    }

    /// Ingest the whole input buffer after an edit. Returns the scoring
    /// outcome when the edit submitted the word; the host should then clear
    /// its visible buffer.
    pub fn handle_input(&mut self, raw_text: &str) -> Option<Submission> {
        if !self.session.is_playing() {
            return None;
        }

        let attempt = typing_policy::regrade(&self.session.current_word, raw_text);
        let Some(submission) = typing_policy::evaluate(&attempt) else {
            self.session.attempt = attempt;
            return None;
        };

        if let Err(e) = self.feedback.notify(submission.feedback) {
            tracing::debug!(error = %e, "feedback playback failed");
        }

        self.session.score = self.session.score.saturating_add(submission.correct_chars);
        self.session.progress = (self.session.progress + submission.recovery as f64).min(MAX_PROGRESS);
        self.session.word_history.push(WordHistoryEntry {
            target_word: self.session.current_word.clone(),
            typed_word: attempt.typed_so_far,
            letter_states: attempt.letter_states,
        });

        tracing::debug!(
            word = %self.session.current_word,
            correct_chars = submission.correct_chars,
            recovery = submission.recovery,
            feedback = %submission.feedback,
            "word submitted"
        );

        let word = self.next_word();
        self.session.attempt = TypingAttempt::fresh(&word);
        self.session.current_word = word;

        Some(submission)
    }

    /// One 100 ms decay step. Exhausting the meter ends the game on the
    /// same tick.
    pub fn on_decay_tick(&mut self) {
        if !self.session.is_playing() {
            return;
        }

        let next = self.session.progress - self.session.decay_rate / DECAY_TICKS_PER_SEC;
        if next <= 0.0 {
            self.session.progress = 0.0;
            self.end_game();
        } else {
            self.session.progress = next;
        }
    }

    /// One 1 s clock step: count the second and re-derive difficulty.
    pub fn on_clock_tick(&mut self) {
        if !self.session.is_playing() {
            return;
        }

        self.session.elapsed_seconds += 1;
        let previous_level = level_for(self.session.elapsed_seconds - 1);
        self.session.decay_rate = decay_rate_for(self.session.elapsed_seconds);

        if self.level() != previous_level {
            tracing::info!(
                level = self.level(),
                decay_rate = self.session.decay_rate,
                "level up"
            );
        }
    }

    /// Fire every tick due at or before `now`, oldest first. A decay tick
    /// and a clock tick due at the same instant fire decay first. Returns
    /// the number of ticks fired.
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut fired = 0;

        loop {
            let decay_due = self.decay_timer.next_due().filter(|due| *due <= now);
            let clock_due = self.clock_timer.next_due().filter(|due| *due <= now);

            match (decay_due, clock_due) {
                (None, None) => break,
                (Some(decay), Some(clock)) if clock < decay => {
                    self.clock_timer.fire_if_due(now);
                    self.on_clock_tick();
                }
                (Some(_), _) => {
                    self.decay_timer.fire_if_due(now);
                    self.on_decay_tick();
                }
                (None, Some(_)) => {
                    self.clock_timer.fire_if_due(now);
                    self.on_clock_tick();
                }
            }
            fired += 1;
        }

        fired
    }

    fn end_game(&mut self) {
        self.cancel_timers();
        self.session.state = GameState::GameOver;

        let score = self.session.score;
        tracing::info!(
            score,
            elapsed_seconds = self.session.elapsed_seconds,
            words = self.session.word_history.len(),
            "game over"
        );

        if score > self.session.high_score {
            if let Err(e) = self.store.persist(score) {
                tracing::warn!(error = %e, score, "failed to persist high score");
            }
            tracing::info!(previous = self.session.high_score, score, "new high score");
            self.session.high_score = score;
        }
    }

    fn cancel_timers(&mut self) {
        self.decay_timer.cancel();
        self.clock_timer.cancel();
    }

    fn next_word(&mut self) -> String {
        let word = self.words.draw_word();
        if word.is_empty() {
            tracing::warn!("word source returned an empty word");
            return FALLBACK_WORD.to_string();
        }
        word
    }
}

/// Read the stored best score, treating every failure as "none yet". An
/// absent score is seeded with 0.
fn load_high_score(store: &dyn HighScoreStore) -> u32 {
    match store.load() {
        Ok(Some(score)) => score,
        Ok(None) => {
            if let Err(e) = store.persist(0) {
                tracing::warn!(error = %e, "failed to seed high score");
            }
            0
        }
        Err(e) => {
            tracing::warn!(error = %e, "high score unavailable, starting from 0");
            0
        }
    }
}
