/// Progress meter ceiling; a fresh session starts full.
pub const MAX_PROGRESS: f64 = 100.0;
/// Decay rate at level 0, in progress units per second.
pub const BASE_DECAY_RATE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GameState {
    Idle,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum LetterState {
    Correct,
    Incorrect,
    Pending,
}

/// The in-progress attempt at the current word, recomputed on every keystroke.
#[derive(Debug, Clone, PartialEq)]
pub struct TypingAttempt {
    pub target_word: String,
    pub typed_so_far: String,
    pub letter_states: Vec<LetterState>,
}

impl TypingAttempt {
    /// A blank attempt: nothing typed, every letter pending.
    pub fn fresh(target_word: &str) -> Self {
        let target_word = target_word.to_lowercase();
        let letter_states = vec![LetterState::Pending; target_word.chars().count()];
        Self {
            target_word,
            typed_so_far: String::new(),
            letter_states,
        }
    }

    pub fn typed_len(&self) -> usize {
        self.typed_so_far.chars().count()
    }
}

impl Default for TypingAttempt {
    fn default() -> Self {
        Self::fresh("")
    }
}

/// A submitted word, frozen at the moment of submission.
#[derive(Debug, Clone, PartialEq)]
pub struct WordHistoryEntry {
    pub target_word: String,
    pub typed_word: String,
    pub letter_states: Vec<LetterState>,
}

impl WordHistoryEntry {
    pub fn is_exact(&self) -> bool {
        self.letter_states
            .iter()
            .all(|state| *state == LetterState::Correct)
            && self.typed_word.chars().count() == self.target_word.chars().count()
    }

    /// Characters typed past the end of the target word.
    pub fn overflow(&self) -> &str {
        let target_len = self.target_word.chars().count();
        match self.typed_word.char_indices().nth(target_len) {
            Some((byte_idx, _)) => &self.typed_word[byte_idx..],
            None => "",
        }
    }
}

/// All mutable game state. Owned by the engine; everything else reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: GameState,
    pub current_word: String,
    pub score: u32,
    pub high_score: u32,
    pub elapsed_seconds: u32,
    pub progress: f64,
    pub decay_rate: f64,
    pub word_history: Vec<WordHistoryEntry>,
    pub attempt: TypingAttempt,
}

impl Session {
    pub fn new(high_score: u32) -> Self {
        Self {
            state: GameState::Idle,
            current_word: String::new(),
            score: 0,
            high_score,
            elapsed_seconds: 0,
            progress: MAX_PROGRESS,
            decay_rate: BASE_DECAY_RATE,
            word_history: Vec::new(),
            attempt: TypingAttempt::default(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    /// Letters typed correctly across the whole history, as a percentage.
    pub fn accuracy(&self) -> Option<f64> {
        let (correct, total) = self
            .word_history
            .iter()
            .flat_map(|entry| entry.letter_states.iter())
            .fold((0usize, 0usize), |(correct, total), state| match state {
                LetterState::Correct => (correct + 1, total + 1),
                LetterState::Incorrect => (correct, total + 1),
                LetterState::Pending => (correct, total),
            });

        match total {
            0 => None,
            total => Some(((correct as f64 / total as f64) * 100.0).round()),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_attempt_is_all_pending() {
        let attempt = TypingAttempt::fresh("Ghost");

        assert_eq!(attempt.target_word, "ghost");
        assert_eq!(attempt.typed_so_far, "");
        assert_eq!(attempt.letter_states, vec![LetterState::Pending; 5]);
    }

    #[test]
    fn new_session_is_idle_and_full() {
        let session = Session::new(12);

        assert_eq!(session.state, GameState::Idle);
        assert_eq!(session.high_score, 12);
        assert_eq!(session.score, 0);
        assert_eq!(session.progress, MAX_PROGRESS);
        assert_eq!(session.decay_rate, BASE_DECAY_RATE);
        assert!(session.word_history.is_empty());
    }

    #[test]
    fn history_overflow_returns_excess_chars() {
        let entry = WordHistoryEntry {
            target_word: "boo".into(),
            typed_word: "boooo".into(),
            letter_states: vec![LetterState::Correct; 3],
        };

        assert_eq!(entry.overflow(), "oo");
        assert!(!entry.is_exact());
    }

    #[test]
    fn exact_entry_has_no_overflow() {
        let entry = WordHistoryEntry {
            target_word: "boo".into(),
            typed_word: "boo".into(),
            letter_states: vec![LetterState::Correct; 3],
        };

        assert_eq!(entry.overflow(), "");
        assert!(entry.is_exact());
    }

    #[test]
    fn accuracy_counts_graded_letters() {
        let mut session = Session::default();
        assert_eq!(session.accuracy(), None);

        session.word_history.push(WordHistoryEntry {
            target_word: "ghost".into(),
            typed_word: "ghast".into(),
            letter_states: vec![
                LetterState::Correct,
                LetterState::Correct,
                LetterState::Incorrect,
                LetterState::Correct,
                LetterState::Correct,
            ],
        });

        assert_eq!(session.accuracy(), Some(80.0));
    }

    #[test]
    fn game_state_display() {
        assert_eq!(GameState::GameOver.to_string(), "GameOver");
        assert_eq!(LetterState::Pending.to_string(), "Pending");
    }
}
