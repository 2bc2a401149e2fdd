//! Built-in practice word lists.
//!
//! Used when no lesson data is available for a language. Unknown languages
//! fall back to the English list.

use crate::model::{Difficulty, LanguageTag, PhraseError, TargetPhrase};

use crate::model::Difficulty::{Advanced, Beginner, Intermediate};

type Entry = (&'static str, &'static str, Difficulty);

const FALLBACK: &str = "en";

const ENGLISH: &[Entry] = &[
    ("Hello", "Hola", Beginner),
    ("Thank you", "Gracias", Beginner),
    ("Good morning", "Buenos días", Beginner),
    ("How are you?", "¿Cómo estás?", Beginner),
    ("Beautiful", "Hermoso", Intermediate),
    ("Pronunciation", "Pronunciación", Advanced),
];

const SPANISH: &[Entry] = &[
    ("Hola", "Hello", Beginner),
    ("Gracias", "Thank you", Beginner),
    ("Buenos días", "Good morning", Beginner),
    ("¿Cómo estás?", "How are you?", Beginner),
    ("Hermoso", "Beautiful", Intermediate),
    ("Pronunciación", "Pronunciation", Advanced),
];

const FRENCH: &[Entry] = &[
    ("Bonjour", "Hello", Beginner),
    ("Merci", "Thank you", Beginner),
    ("Comment allez-vous?", "How are you?", Intermediate),
    ("Magnifique", "Beautiful", Intermediate),
    ("Prononciation", "Pronunciation", Advanced),
];

const GERMAN: &[Entry] = &[
    ("Hallo", "Hello", Beginner),
    ("Danke", "Thank you", Beginner),
    ("Wie geht es Ihnen?", "How are you?", Intermediate),
    ("Schön", "Beautiful", Intermediate),
    ("Aussprache", "Pronunciation", Advanced),
];

const ITALIAN: &[Entry] = &[
    ("Ciao", "Hello", Beginner),
    ("Grazie", "Thank you", Beginner),
    ("Come stai?", "How are you?", Intermediate),
    ("Bellissimo", "Beautiful", Intermediate),
    ("Pronuncia", "Pronunciation", Advanced),
];

/// Read-only catalog of practice phrases keyed by language code.
#[derive(Debug, Clone, Copy)]
pub struct PhraseCatalog {
    lists: &'static [(&'static str, &'static [Entry])],
}

impl PhraseCatalog {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            lists: &[
                ("en", ENGLISH),
                ("es", SPANISH),
                ("fr", FRENCH),
                ("de", GERMAN),
                ("it", ITALIAN),
            ],
        }
    }

    /// Language codes with a dedicated list.
    #[must_use]
    pub fn languages(&self) -> Vec<&'static str> {
        self.lists.iter().map(|(code, _)| *code).collect()
    }

    #[must_use]
    pub fn has_language(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    /// Phrases for `code`, tagged with the locale for that code.
    ///
    /// When the catalog has no list for `code`, the English words are returned,
    /// still tagged with the requested locale.
    ///
    /// # Errors
    ///
    /// Returns `PhraseError::EmptyLanguage` if `code` is blank.
    pub fn phrases_for(&self, code: &str) -> Result<Vec<TargetPhrase>, PhraseError> {
        let tag = LanguageTag::resolve(code)?;
        let entries = self
            .find(code)
            .or_else(|| self.find(FALLBACK))
            .unwrap_or_default();

        entries
            .iter()
            .map(|(text, translation, difficulty)| {
                TargetPhrase::new(*text, tag.clone(), *difficulty)
                    .map(|phrase| phrase.with_translation(*translation))
            })
            .collect()
    }

    fn find(&self, code: &str) -> Option<&'static [Entry]> {
        let code = code.trim();
        self.lists
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(_, entries)| *entries)
    }
}

impl Default for PhraseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
