use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

use crate::error::WordError;

static LANG_DIR: Dir = include_dir!("src/lang");

#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

/// Word files come either as a bare JSON array or as a full language object.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum WordList {
    Plain(Vec<String>),
    Language(Language),
}

impl Language {
    /// Load a vocabulary compiled into the binary.
    pub fn bundled(name: &str) -> Result<Self, WordError> {
        read_language_from_file(&format!("{name}.json"))
    }

    /// Parse a word file, accepting either supported layout.
    pub fn parse(name: &str, contents: &str) -> Result<Self, WordError> {
        let lang = match from_str::<WordList>(contents)? {
            WordList::Plain(words) => Language {
                name: name.to_string(),
                size: words.len() as u32,
                words,
            },
            WordList::Language(lang) => lang,
        };
        Ok(lang.normalized())
    }

    /// Lower-case, trim and drop blank entries.
    fn normalized(mut self) -> Self {
        self.words = self
            .words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        self.size = self.words.len() as u32;
        self
    }
}

fn read_language_from_file(file_name: &str) -> Result<Language, WordError> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| WordError::MissingBundle(file_name.to_string()))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| WordError::Encoding(file_name.to_string()))?;

    let name = file_name.trim_end_matches(".json");
    Language::parse(name, file_as_str)
}
