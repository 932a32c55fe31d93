use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Language used when a request does not name one. Base question and matrix
/// rows are stored in this language; every other language lives in the
/// `*_language` translation tables.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A short language code such as `en`, `he` or `pt-br`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn parse(code: &str) -> Result<Self, CoreError> {
        let code = code.trim().to_ascii_lowercase();
        let valid = (2..=8).contains(&code.len())
            && code.starts_with(|c: char| c.is_ascii_lowercase())
            && code.chars().all(|c| c.is_ascii_lowercase() || c == '-');
        if !valid {
            return Err(CoreError::InvalidLanguage(code));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the language of the base tables.
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_LANGUAGE
    }
}

impl Default for Language {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl TryFrom<String> for Language {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Language::parse(&value)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
