use std::time::Instant;

use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    app::App,
    session::GameState,
    ui::{history, main_layout, render_controls, render_ghost, render_header, render_input, render_meter, render_word},
};

/// A UI Screen boundary: one per game state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Waiting for the first start command
pub struct IdleScreen;

impl Screen for IdleScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let [header, ghost, meter, _word, input, controls, _] = main_layout(area);
        let session = app.engine.session();

        render_header(session, app.engine.level(), header, buf);
        render_ghost(ghost, buf);
        render_meter(session, meter, buf);
        render_input(app, input, buf);
        render_controls(session.state, controls, buf);
    }
}

/// Live game
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let [header, ghost, meter, word, input, controls, _] = main_layout(area);
        let session = app.engine.session();

        render_header(session, app.engine.level(), header, buf);
        render_ghost(ghost, buf);
        render_meter(session, meter, buf);
        render_word(session, app.active_flash(Instant::now()), word, buf);
        render_input(app, input, buf);
        render_controls(session.state, controls, buf);
    }
}

/// Final meter, restart hint and the typing history
pub struct GameOverScreen;

impl Screen for GameOverScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let [header, ghost, meter, word, input, controls, body] = main_layout(area);
        let session = app.engine.session();

        render_header(session, app.engine.level(), header, buf);
        render_ghost(ghost, buf);
        render_meter(session, meter, buf);
        render_word(session, None, word, buf);
        render_input(app, input, buf);
        render_controls(session.state, controls, buf);
        history::render_history(session, body, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: GameState) -> Box<dyn Screen> {
    match state {
        GameState::Idle => Box::new(IdleScreen),
        GameState::Playing => Box::new(PlayingScreen),
        GameState::GameOver => Box::new(GameOverScreen),
    }
}
