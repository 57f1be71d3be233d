// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod high_score;
pub mod language;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod typing_policy;
pub mod ui;
pub mod word_provider;

pub use engine::SessionEngine;
pub use session::{GameState, LetterState, Session};
