use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::error::WordError;
use crate::language::{backup_words, Language, DEFAULT_VOCABULARY, FALLBACK_WORD};

/// Anything the engine can draw target words from. Must never return an
/// empty word and must never block.
pub trait WordSource {
    fn draw_word(&mut self) -> String;
}

/// Where a vocabulary is fetched from.
pub trait VocabularySource: Send + Sync + 'static {
    fn fetch(&self) -> Result<Vec<String>, WordError>;

    fn describe(&self) -> String;
}

/// Vocabulary compiled into the binary.
#[derive(Debug, Clone)]
pub struct BundledVocabulary {
    name: String,
}

impl BundledVocabulary {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for BundledVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_VOCABULARY)
    }
}

impl VocabularySource for BundledVocabulary {
    fn fetch(&self) -> Result<Vec<String>, WordError> {
        Ok(Language::bundled(&self.name)?.words)
    }

    fn describe(&self) -> String {
        format!("bundled:{}", self.name)
    }
}

/// A user-supplied JSON word file.
#[derive(Debug, Clone)]
pub struct FileVocabulary {
    path: PathBuf,
}

impl FileVocabulary {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl VocabularySource for FileVocabulary {
    fn fetch(&self) -> Result<Vec<String>, WordError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| WordError::Io {
            path: self.path.clone(),
            source,
        })?;
        let name = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        Ok(Language::parse(&name, &contents)?.words)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Fetch from `source`, degrading to the backup list on any failure.
fn resolve(source: &dyn VocabularySource) -> Vec<String> {
    match source.fetch() {
        Ok(words) if !words.is_empty() => {
            tracing::info!(source = %source.describe(), count = words.len(), "vocabulary loaded");
            words
        }
        Ok(_) => {
            tracing::warn!(source = %source.describe(), error = %WordError::Empty, "using backup word list");
            backup_words()
        }
        Err(e) => {
            tracing::warn!(source = %source.describe(), error = %e, "using backup word list");
            backup_words()
        }
    }
}

/// Random word provider over a lazily loaded vocabulary.
///
/// Until the vocabulary arrives every draw returns [`FALLBACK_WORD`] and
/// makes sure a background load is in flight.
pub struct WordProvider {
    source: Arc<dyn VocabularySource>,
    words: Vec<String>,
    pending: Option<Receiver<Vec<String>>>,
}

impl WordProvider {
    pub fn new<S: VocabularySource>(source: S) -> Self {
        Self {
            source: Arc::new(source),
            words: Vec::new(),
            pending: None,
        }
    }

    /// Provider over a fixed list; an empty list falls back to the backup words.
    pub fn with_words(words: Vec<String>) -> Self {
        let mut provider = Self::new(BundledVocabulary::default());
        provider.words = if words.is_empty() {
            backup_words()
        } else {
            words
        };
        provider
    }

    pub fn is_loaded(&self) -> bool {
        !self.words.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.words.len()
    }

    /// Load synchronously, replacing any in-flight background load.
    pub fn load_vocabulary(&mut self) {
        self.pending = None;
        self.words = resolve(self.source.as_ref());
    }

    /// Start loading on a worker thread unless a load is already running or
    /// the vocabulary is present.
    pub fn load_in_background(&mut self) {
        if self.is_loaded() || self.pending.is_some() {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        std::thread::spawn(move || {
            let _ = tx.send(resolve(source.as_ref()));
        });
        self.pending = Some(rx);
    }

    /// Install a finished background load, if any.
    pub fn poll(&mut self) {
        let received = match &self.pending {
            Some(rx) => rx.try_recv(),
            None => return,
        };

        match received {
            Ok(words) => {
                self.words = words;
                self.pending = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("vocabulary loader exited without a result");
                self.words = backup_words();
                self.pending = None;
            }
        }
    }
}

impl WordSource for WordProvider {
    fn draw_word(&mut self) -> String {
        self.poll();

        match self.words.choose(&mut rand::thread_rng()) {
            Some(word) => word.clone(),
            None => {
                tracing::debug!("vocabulary not loaded yet, serving fallback word");
                self.load_in_background();
                FALLBACK_WORD.to_string()
            }
        }
    }
}

/// Deterministic source cycling through a fixed sequence.
#[derive(Debug, Clone)]
pub struct ScriptedWords {
    words: Vec<String>,
    next: usize,
}

impl ScriptedWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|w: &String| !w.is_empty())
            .collect();
        Self { words, next: 0 }
    }
}

impl WordSource for ScriptedWords {
    fn draw_word(&mut self) -> String {
        if self.words.is_empty() {
            return FALLBACK_WORD.to_string();
        }
        let word = self.words[self.next % self.words.len()].clone();
        self.next += 1;
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    struct FailingVocabulary;

    impl VocabularySource for FailingVocabulary {
        fn fetch(&self) -> Result<Vec<String>, WordError> {
            Err(WordError::Empty)
        }

        fn describe(&self) -> String {
            "failing".into()
        }
    }

    fn wait_until_loaded(provider: &mut WordProvider) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !provider.is_loaded() && Instant::now() < deadline {
            provider.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn unloaded_provider_serves_fallback_and_starts_loading() {
        let mut provider = WordProvider::new(BundledVocabulary::default());

        assert_eq!(provider.draw_word(), FALLBACK_WORD);
        assert!(provider.pending.is_some());

        wait_until_loaded(&mut provider);
        assert!(provider.is_loaded());
        assert!(!provider.draw_word().is_empty());
    }

    #[test]
    fn failed_load_degrades_to_backup_list() {
        let mut provider = WordProvider::new(FailingVocabulary);
        provider.load_vocabulary();

        assert_eq!(provider.vocabulary_size(), 50);
        let word = provider.draw_word();
        assert!(crate::language::BACKUP_WORDS.contains(&word.as_str()));
    }

    #[test]
    fn file_vocabulary_reads_plain_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(&path, r#"["wraith", "ghoul"]"#).unwrap();

        let mut provider = WordProvider::new(FileVocabulary::new(&path));
        provider.load_vocabulary();

        assert_eq!(provider.vocabulary_size(), 2);
        let word = provider.draw_word();
        assert!(word == "wraith" || word == "ghoul");
    }

    #[test]
    fn missing_file_degrades_to_backup_list() {
        let dir = tempdir().unwrap();
        let mut provider = WordProvider::new(FileVocabulary::new(dir.path().join("nope.json")));
        provider.load_vocabulary();

        assert_eq!(provider.vocabulary_size(), 50);
    }

    #[test]
    fn empty_file_degrades_to_backup_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "[]").unwrap();

        let mut provider = WordProvider::new(FileVocabulary::new(&path));
        provider.load_vocabulary();

        assert_eq!(provider.vocabulary_size(), 50);
    }

    #[test]
    fn with_words_never_empty() {
        let provider = WordProvider::with_words(vec![]);
        assert!(provider.is_loaded());
    }

    #[test]
    fn scripted_words_cycle() {
        let mut words = ScriptedWords::new(["ghost", "", "boo"]);

        assert_eq!(words.draw_word(), "ghost");
        assert_eq!(words.draw_word(), "boo");
        assert_eq!(words.draw_word(), "ghost");
    }

    #[test]
    fn empty_script_serves_fallback() {
        let mut words = ScriptedWords::new(Vec::<String>::new());
        assert_eq!(words.draw_word(), FALLBACK_WORD);
    }
}
