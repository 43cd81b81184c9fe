// ============================================================
// Layer 3 - Language Code
// ============================================================
// A NLLB / FLORES-200 style language code such as `eng_Latn`.
//
// The code is embedded verbatim into the prompt text and looked
// up as a token in the tokenizer vocabulary, so the only thing
// checked here is that it is a single non-empty word. Whether the
// model actually knows the language is the tokenizer's call.
// Either way a bad code means the primitive cannot translate, so
// both checks report an inference failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::MbrError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Result<Self, MbrError> {
        let code = code.into();
        if code.is_empty() {
            return Err(MbrError::inference("language code is empty"));
        }
        if code.chars().any(char::is_whitespace) {
            return Err(MbrError::inference(format!(
                "language code '{code}' contains whitespace"
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = MbrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = MbrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}
