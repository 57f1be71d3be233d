pub mod core;

pub use core::Language;

/// Bundled vocabulary used when no word file is configured.
pub const DEFAULT_VOCABULARY: &str = "ghost";

/// Served while the vocabulary is still loading.
pub const FALLBACK_WORD: &str = "ghost";

/// Used when the configured vocabulary cannot be loaded at all.
pub const BACKUP_WORDS: [&str; 50] = [
    "ghost", "spooky", "type", "keyboard", "haunted",
    "fast", "quick", "game", "spirit", "phantom",
    "monster", "scary", "boo", "creepy", "shadow",
    "danger", "escape", "survive", "chase", "eerie",
    "vanish", "appear", "float", "supernatural", "spectral",
    "dark", "night", "moon", "howl", "fear",
    "scream", "terror", "haunt", "curse", "mist",
    "fog", "grave", "tomb", "crypt", "dead",
    "undead", "zombie", "vampire", "werewolf", "witch",
    "wizard", "magic", "spell", "potion", "ritual",
];

pub fn backup_words() -> Vec<String> {
    BACKUP_WORDS.iter().map(|w| w.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_word_is_usable() {
        assert!(!FALLBACK_WORD.is_empty());
        assert!(BACKUP_WORDS.contains(&FALLBACK_WORD));
    }

    #[test]
    fn backup_words_are_lowercase_and_non_empty() {
        let words = backup_words();
        assert_eq!(words.len(), 50);
        assert!(words
            .iter()
            .all(|w| !w.is_empty() && *w == w.to_lowercase()));
    }
}
