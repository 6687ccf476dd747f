use serde::{Deserialize, Serialize};

use super::enums::Language;

/// Text in a given language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DisplayText {
    pub language: Language,
    pub text: String,
}

impl DisplayText {
    pub fn new(language: Language, text: impl Into<String>) -> Self {
        Self {
            language,
            text: text.into(),
        }
    }
}
