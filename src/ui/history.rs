use itertools::{EitherOrBoth, Itertools};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    session::{LetterState, Session, WordHistoryEntry},
    ui::letter_style,
};

/// One summary row: the target word, then what was typed with each letter
/// coloured by its grade and any overflow marked wrong.
pub fn history_line(entry: &WordHistoryEntry, target_width: usize) -> Line<'static> {
    let pad = target_width.saturating_sub(entry.target_word.width());
    let mut spans = vec![Span::styled(
        format!("{}{}  ", entry.target_word, " ".repeat(pad)),
        Style::default().fg(Color::Cyan),
    )];

    spans.extend(
        entry
            .typed_word
            .chars()
            .zip_longest(entry.letter_states.iter())
            .filter_map(|pair| match pair {
                EitherOrBoth::Both(c, state) => {
                    // Pending can't survive submission; treat it as a miss.
                    let state = match state {
                        LetterState::Correct => LetterState::Correct,
                        _ => LetterState::Incorrect,
                    };
                    Some(Span::styled(c.to_string(), letter_style(state)))
                }
                EitherOrBoth::Left(c) => Some(Span::styled(
                    c.to_string(),
                    letter_style(LetterState::Incorrect),
                )),
                EitherOrBoth::Right(_) => None,
            }),
    );

    Line::from(spans)
}

pub fn render_history(session: &Session, area: Rect, buf: &mut Buffer) {
    if session.word_history.is_empty() || area.height == 0 {
        return;
    }

    let target_width = session
        .word_history
        .iter()
        .map(|entry| entry.target_word.width())
        .max()
        .unwrap_or(0);

    // Most recent words first so the end of the run is always visible.
    let lines = session
        .word_history
        .iter()
        .rev()
        .map(|entry| history_line(entry, target_width))
        .collect::<Vec<_>>();

    let title = match session.accuracy() {
        Some(accuracy) => format!(
            "Typing History ({} words, {accuracy}% letters)",
            session.word_history.len()
        ),
        None => format!("Typing History ({} words)", session.word_history.len()),
    };

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .render(area, buf);
}
