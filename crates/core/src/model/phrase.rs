use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::language::LanguageTag;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PhraseError {
    #[error("phrase text cannot be empty")]
    EmptyText,

    #[error("language tag cannot be empty")]
    EmptyLanguage,

    #[error("unknown difficulty tier: {0}")]
    UnknownDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier of a target phrase.
///
/// The tier selects both the success threshold used when grading an attempt
/// and the playback rate used when the phrase is read aloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = PhraseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(PhraseError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── TARGET PHRASE ─────────────────────────────────────────────────────────────
//

/// A word or sentence the learner is asked to pronounce.
///
/// Phrases are immutable once built; a session only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPhrase {
    text: String,
    translation: Option<String>,
    language_tag: LanguageTag,
    difficulty: Difficulty,
}

impl TargetPhrase {
    /// Creates a phrase, trimming surrounding whitespace from the text.
    ///
    /// # Errors
    ///
    /// Returns `PhraseError::EmptyText` if the text is blank.
    pub fn new(
        text: impl Into<String>,
        language_tag: LanguageTag,
        difficulty: Difficulty,
    ) -> Result<Self, PhraseError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(PhraseError::EmptyText);
        }
        Ok(Self {
            text,
            translation: None,
            language_tag,
            difficulty,
        })
    }

    /// Attaches the translation shown to the learner as a prompt.
    #[must_use]
    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        let translation = translation.into().trim().to_string();
        self.translation = (!translation.is_empty()).then_some(translation);
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    #[must_use]
    pub fn language_tag(&self) -> &LanguageTag {
        &self.language_tag
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}
