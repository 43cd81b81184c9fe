// ============================================================
// Layer 6 - Language Map
// ============================================================
// Reads `languages.json`, a flat object mapping language codes
// to display names:
//
//   { "eng_Latn": "English", "zul_Latn": "isiZulu", ... }
//
// The map belongs to the caller. The translation core never
// looks at it; the CLI uses it to list languages and to reject
// codes the deployment does not offer.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::{fs, path::Path};

use crate::domain::language::LanguageCode;

#[derive(Debug, Clone, Default)]
pub struct LanguageMap {
    names: BTreeMap<LanguageCode, String>,
}

impl LanguageMap {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read language map '{}'", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Invalid language map '{}'", path.display()))
    }

    /// Missing file gives an empty map so translation still runs
    pub fn load_or_empty(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                "Language map '{}' not found; language codes are checked by the tokenizer only",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let names: BTreeMap<LanguageCode, String> = serde_json::from_str(json)?;
        Ok(Self { names })
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Codes in sorted order
    pub fn codes(&self) -> impl Iterator<Item = &LanguageCode> {
        self.names.keys()
    }

    pub fn display_name(&self, code: &LanguageCode) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Display name when known, the raw code otherwise
    pub fn label(&self, code: &LanguageCode) -> String {
        self.display_name(code)
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string())
    }

    /// An empty map accepts every code
    pub fn ensure_offered(&self, code: &LanguageCode) -> Result<()> {
        if self.is_empty() || self.names.contains_key(code) {
            return Ok(());
        }
        let offered: Vec<&str> = self.codes().map(LanguageCode::as_str).collect();
        anyhow::bail!("Language '{}' is not offered (available: {})", code, offered.join(", "))
    }
}
