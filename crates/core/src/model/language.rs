use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::phrase::PhraseError;

/// Short language codes used by the lesson catalog, mapped to the full
/// locale speech services expect.
const LOCALES: &[(&str, &str)] = &[
    ("en", "en-US"),
    ("es", "es-ES"),
    ("fr", "fr-FR"),
    ("de", "de-DE"),
    ("it", "it-IT"),
    ("pt", "pt-PT"),
    ("ru", "ru-RU"),
    ("nl", "nl-NL"),
    ("zh", "zh-CN"),
    ("ja", "ja-JP"),
    ("ko", "ko-KR"),
    ("hi", "hi-IN"),
    ("ar", "ar-SA"),
    ("he", "he-IL"),
    ("sv", "sv-SE"),
    ("no", "no-NO"),
];

/// Recognition / synthesis locale such as `fr-FR`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Resolves a catalog language code (`"fr"`) or a full tag (`"fr-CA"`).
    ///
    /// Known short codes map to their default locale; anything else is kept
    /// as given so platform-specific tags still reach the speech backend.
    ///
    /// # Errors
    ///
    /// Returns `PhraseError::EmptyLanguage` if the input is blank.
    pub fn resolve(code: &str) -> Result<Self, PhraseError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(PhraseError::EmptyLanguage);
        }
        let tag = LOCALES
            .iter()
            .find(|(short, _)| short.eq_ignore_ascii_case(code))
            .map_or_else(|| code.to_string(), |(_, locale)| (*locale).to_string());
        Ok(Self(tag))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag, lowercased (`"fr"` for `fr-FR`).
    #[must_use]
    pub fn language_code(&self) -> String {
        self.0
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

impl fmt::Debug for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageTag({})", self.0)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
