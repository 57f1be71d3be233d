pub mod history;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::{
    app::App,
    feedback::Feedback,
    session::{GameState, LetterState, Session},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
/// At or below this the meter turns red.
const LOW_PROGRESS: f64 = 30.0;

const GHOST: [&str; 4] = [
    r"  .-.  ",
    r" (o o) ",
    r" | O | ",
    r"  \_/~ ",
];

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(self.engine.state()).render(self, area, buf);
    }
}

pub(crate) fn letter_style(state: LetterState) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match state {
        LetterState::Correct => bold.fg(Color::Green),
        LetterState::Incorrect => bold.fg(Color::Red),
        LetterState::Pending => bold.add_modifier(Modifier::DIM),
    }
}

/// Split the screen into header / ghost / meter / word / input / controls
/// and a remaining body area used for the history summary.
pub(crate) fn main_layout(area: Rect) -> [Rect; 7] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(GHOST.len() as u16),
            Constraint::Length(3), // meter
            Constraint::Length(2), // word
            Constraint::Length(3), // input
            Constraint::Length(2), // controls
            Constraint::Min(0),    // history
        ])
        .split(area);

    [
        chunks[0], chunks[1], chunks[2], chunks[3], chunks[4], chunks[5], chunks[6],
    ]
}

pub(crate) fn render_header(session: &Session, level: u32, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(16), Constraint::Length(20)])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "Ghost Typist",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    title.render(chunks[0], buf);

    let label = Style::default().add_modifier(Modifier::DIM);
    let stat = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<12}"), label),
            Span::raw(value),
        ])
    };
    let stats = Paragraph::new(vec![
        stat("High Score:", session.high_score.to_string()),
        stat("Score:", session.score.to_string()),
        stat("Time:", session.elapsed_seconds.to_string()),
        stat("Level:", (level + 1).to_string()),
    ]);
    stats.render(chunks[1], buf);
}

pub(crate) fn render_ghost(area: Rect, buf: &mut Buffer) {
    let ghost = Paragraph::new(GHOST.iter().map(|row| Line::from(*row)).collect::<Vec<_>>())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);
    ghost.render(area, buf);
}

pub(crate) fn render_meter(session: &Session, area: Rect, buf: &mut Buffer) {
    let color = if session.progress <= LOW_PROGRESS {
        Color::Red
    } else {
        Color::Cyan
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .ratio((session.progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}", session.progress));
    gauge.render(area, buf);
}

pub(crate) fn render_word(session: &Session, flash: Option<Feedback>, area: Rect, buf: &mut Buffer) {
    if session.state == GameState::GameOver {
        let over = Paragraph::new(Span::styled(
            "GAME OVER!",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        over.render(area, buf);
        return;
    }

    let attempt = &session.attempt;
    let cursor = attempt.typed_len();
    let spans = session
        .current_word
        .chars()
        .zip(attempt.letter_states.iter())
        .enumerate()
        .map(|(idx, (c, state))| {
            let style = if idx == cursor {
                letter_style(*state).add_modifier(Modifier::UNDERLINED)
            } else {
                letter_style(*state)
            };
            Span::styled(c.to_string(), style)
        })
        .collect::<Vec<Span>>();

    let style = match flash {
        Some(Feedback::Correct) => Style::default().bg(Color::Green),
        Some(Feedback::Incorrect) => Style::default().bg(Color::Red),
        None => Style::default(),
    };

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .style(style)
        .render(area, buf);
}

pub(crate) fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let playing = app.engine.state() == GameState::Playing;
    let (text, style) = if playing && !app.input.is_empty() {
        (app.input.clone(), Style::default())
    } else {
        (
            "Type here ...".to_string(),
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        )
    };
    let border = if playing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    Paragraph::new(Span::styled(text, style))
        .block(Block::default().borders(Borders::ALL).border_style(border))
        .render(area, buf);
}

pub(crate) fn render_controls(state: GameState, area: Rect, buf: &mut Buffer) {
    let hint = match state {
        GameState::Idle => "(space/enter) start game / (esc)ape",
        GameState::Playing => "type the word before the meter runs out / (esc)ape",
        GameState::GameOver => "(space/enter) play again / (esc)ape",
    };

    Paragraph::new(Span::styled(
        hint,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SessionEngine;
    use crate::feedback::NullFeedback;
    use crate::high_score::MemoryHighScoreStore;
    use crate::word_provider::ScriptedWords;
    use std::time::Instant;

    fn test_app(words: &[&str]) -> App {
        App::new(SessionEngine::new(
            ScriptedWords::new(words.iter().copied()),
            MemoryHighScoreStore::with_score(42),
            NullFeedback,
        ))
    }

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn idle_screen_shows_start_hint_and_high_score() {
        let app = test_app(&["ghost"]);
        let out = rendered(&app, Rect::new(0, 0, 80, 30));

        assert!(out.contains("Ghost Typist"));
        assert!(out.contains("start game"));
        assert!(out.contains("42"));
    }

    #[test]
    fn playing_screen_shows_word_and_buffer() {
        let mut app = test_app(&["phantom"]);
        app.engine.start(Instant::now());
        app.input = "pha".into();
        app.engine.handle_input("pha");

        let out = rendered(&app, Rect::new(0, 0, 80, 30));

        assert!(out.contains("phantom"));
        assert!(out.contains("pha"));
    }

    #[test]
    fn mistyped_letter_is_red() {
        let mut app = test_app(&["ghost"]);
        app.engine.start(Instant::now());
        app.engine.handle_input("gx");

        let area = Rect::new(0, 0, 80, 30);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);

        let h = buffer
            .content()
            .iter()
            .find(|c| c.symbol() == "h" && c.fg == Color::Red);
        assert!(h.is_some());
    }

    #[test]
    fn game_over_screen_lists_history() {
        let mut app = test_app(&["ghost", "boo"]);
        let t0 = Instant::now();
        app.engine.start(t0);
        app.engine.handle_input("ghast");
        app.engine.advance(t0 + std::time::Duration::from_secs(120));

        let out = rendered(&app, Rect::new(0, 0, 80, 40));

        assert!(out.contains("GAME OVER!"));
        assert!(out.contains("play again"));
        assert!(out.contains("ghast"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let mut app = test_app(&["ghost"]);
        app.engine.start(Instant::now());
        let area = Rect::new(0, 0, 20, 5);
        let mut buffer = Buffer::empty(area);

        (&app).render(area, &mut buffer);

        assert_eq!(*buffer.area(), area);
    }

    #[test]
    fn letter_styles_differ_by_state() {
        assert_eq!(letter_style(LetterState::Correct).fg, Some(Color::Green));
        assert_eq!(letter_style(LetterState::Incorrect).fg, Some(Color::Red));
        assert_eq!(letter_style(LetterState::Pending).fg, None);
    }
}
