use crate::feedback::Feedback;
use crate::session::{LetterState, TypingAttempt};

/// Extra progress recovered for typing the word exactly.
pub const PERFECT_BONUS: u32 = 2;

/// Scoring outcome of a submitted attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub correct_chars: u32,
    pub recovery: u32,
    pub feedback: Feedback,
}

impl Submission {
    pub fn is_exact(&self) -> bool {
        self.feedback == Feedback::Correct
    }
}

/// Grade each target letter against what has been typed so far.
/// Letters past the typed length stay pending.
pub fn grade_letters(target: &str, typed: &str) -> Vec<LetterState> {
    let mut typed_chars = typed.chars();
    target
        .chars()
        .map(|expected| match typed_chars.next() {
            None => LetterState::Pending,
            Some(c) if c == expected => LetterState::Correct,
            Some(_) => LetterState::Incorrect,
        })
        .collect()
}

/// Rebuild the attempt from the raw input buffer. Comparison is
/// case-insensitive, so both sides are lower-cased here.
pub fn regrade(target_word: &str, raw_input: &str) -> TypingAttempt {
    let target_word = target_word.to_lowercase();
    let typed_so_far = raw_input.to_lowercase();
    let letter_states = grade_letters(&target_word, &typed_so_far);

    TypingAttempt {
        target_word,
        typed_so_far,
        letter_states,
    }
}

/// Reaching the target's length counts as submitting the word.
pub fn is_submitted(attempt: &TypingAttempt) -> bool {
    attempt.typed_len() >= attempt.target_word.chars().count()
}

/// Score a submitted attempt. Characters typed past the target length are
/// never counted, but they do rule out the exact-match bonus.
pub fn evaluate(attempt: &TypingAttempt) -> Option<Submission> {
    if !is_submitted(attempt) {
        return None;
    }

    let correct_chars = attempt
        .target_word
        .chars()
        .zip(attempt.typed_so_far.chars())
        .filter(|(expected, typed)| expected == typed)
        .count() as u32;

    let exact = attempt.typed_so_far == attempt.target_word;
    let (recovery, feedback) = if exact {
        (correct_chars + PERFECT_BONUS, Feedback::Correct)
    } else {
        (correct_chars, Feedback::Incorrect)
    };

    Some(Submission {
        correct_chars,
        recovery,
        feedback,
    })
}
