use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use ghost_typist::{
    app::{App, AppAction},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    engine::SessionEngine,
    feedback::{FeedbackSink, NullFeedback, TerminalBell},
    high_score::{HighScoreStore, MemoryHighScoreStore, SqliteHighScoreStore},
    logging::init_logging,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    word_provider::{BundledVocabulary, FileVocabulary, WordProvider},
};

/// terminal typing arcade: type the word before the ghost meter drains
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing arcade. Each word you finish refills the ghost meter; the meter drains faster every 40 seconds. Press Space or Enter to start, Esc to quit."
)]
pub struct Cli {
    /// JSON word file to draw from (a bare array or {name, size, words})
    #[clap(short = 'w', long = "words")]
    word_file: Option<PathBuf>,

    /// do not ring the terminal bell on mistakes
    #[clap(long)]
    no_bell: bool,

    /// also ring the bell on exactly typed words
    #[clap(long)]
    bell_on_correct: bool,

    /// log filter used when RUST_LOG is unset
    #[clap(long)]
    log_level: Option<String>,

    /// emit log lines as JSON
    #[clap(long)]
    log_json: bool,

    /// high score database to use instead of the default location
    #[clap(long)]
    db: Option<PathBuf>,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags override what the config file says.
    fn merge(&self, mut cfg: Config) -> Config {
        if let Some(path) = &self.word_file {
            cfg.word_file = Some(path.clone());
        }
        if self.no_bell {
            cfg.bell = false;
        }
        if self.bell_on_correct {
            cfg.bell_on_correct = true;
        }
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
        if self.log_json {
            cfg.log_json = true;
        }
        cfg
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let config = cli.merge(config_store.load());
    if cli.save_config {
        config_store.save(&config)?;
    }

    // Logs go to a file only; stdout belongs to the TUI.
    let _log_guard = init_logging(&config.log_level, config.log_json, AppDirs::log_dir());

    let engine = build_engine(&cli, &config);

    install_panic_hook();
    let _terminal_guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(engine);
    let result = start_tui(&mut terminal, &mut app);
    app.shutdown();

    result
}

/// Raw mode plus the alternate screen, undone on drop so that early
/// returns leave a usable shell behind.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        // Built before the next fallible step so a failure there still restores.
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Best effort; there is nothing useful to do if the terminal refuses.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Restore the terminal before the default hook prints, otherwise the panic
/// message is lost on the alternate screen.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));
}

fn build_engine(cli: &Cli, config: &Config) -> SessionEngine {
    let mut words = match &config.word_file {
        Some(path) => WordProvider::new(FileVocabulary::new(path)),
        None => WordProvider::new(BundledVocabulary::default()),
    };
    words.load_in_background();

    let opened = match &cli.db {
        Some(path) => SqliteHighScoreStore::open(path),
        None => SqliteHighScoreStore::new(),
    };
    let store: Box<dyn HighScoreStore> = match opened {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "high score storage unavailable, scores won't persist");
            Box::new(MemoryHighScoreStore::new())
        }
    };

    let feedback: Box<dyn FeedbackSink> = if config.bell {
        Box::new(TerminalBell::stdout(config.bell_on_correct))
    } else {
        Box::new(NullFeedback)
    };

    SessionEngine::new(words, store, feedback)
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            GameEvent::Tick => app.on_tick(Instant::now()),
            GameEvent::Resize => {}
            GameEvent::Closed => {
                tracing::warn!("terminal input closed, leaving");
                break;
            }
            GameEvent::Key(key) => {
                if app.on_key(key, Instant::now()) == AppAction::Quit {
                    break;
                }
            }
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["ghost-typist"]);

        assert_eq!(cli.word_file, None);
        assert!(!cli.no_bell);
        assert!(!cli.bell_on_correct);
        assert_eq!(cli.log_level, None);
        assert_eq!(cli.db, None);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_cli_word_file() {
        let cli = Cli::parse_from(["ghost-typist", "-w", "words.json"]);
        assert_eq!(cli.word_file, Some(PathBuf::from("words.json")));

        let cli = Cli::parse_from(["ghost-typist", "--words", "/tmp/spooky.json"]);
        assert_eq!(cli.word_file, Some(PathBuf::from("/tmp/spooky.json")));
    }

    #[test]
    fn test_cli_db_path() {
        let cli = Cli::parse_from(["ghost-typist", "--db", "scores.db"]);
        assert_eq!(cli.db, Some(PathBuf::from("scores.db")));
    }

    #[test]
    fn test_merge_keeps_config_when_no_flags() {
        let cli = Cli::parse_from(["ghost-typist"]);
        let cfg = Config {
            word_file: Some(PathBuf::from("mine.json")),
            bell: false,
            bell_on_correct: true,
            log_level: "debug".into(),
            log_json: true,
        };

        assert_eq!(cli.merge(cfg.clone()), cfg);
    }

    #[test]
    fn test_merge_flags_override_config() {
        let cli = Cli::parse_from([
            "ghost-typist",
            "--words",
            "other.json",
            "--no-bell",
            "--log-level",
            "trace",
        ]);

        let merged = cli.merge(Config::default());

        assert_eq!(merged.word_file, Some(PathBuf::from("other.json")));
        assert!(!merged.bell);
        assert!(!merged.bell_on_correct);
        assert_eq!(merged.log_level, "trace");
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["ghost-typist", "--number-of-words", "3"]).is_err());
    }

    #[test]
    fn test_cli_help_mentions_words_flag() {
        let mut cmd = Cli::command();
        let help = cmd.render_help().to_string();
        assert!(help.contains("--words"));
        assert!(help.contains("--no-bell"));
    }
}
