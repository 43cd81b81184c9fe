// ============================================================
// Layer 6 - Tokenizer Store
// ============================================================
// Loads the model's HuggingFace `tokenizer.json` from the model
// directory. The tokenizer is loaded once at startup and shared
// read-only by every request.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use crate::data::codec::EOS_TOKEN;

pub const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Load the tokenizer from `{dir}/tokenizer.json`
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        let tokenizer = Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))?;

        if tokenizer.token_to_id(EOS_TOKEN).is_none() {
            tracing::warn!(
                "Tokenizer at '{}' has no '{}' token; prompts will end in <unk>",
                path.display(),
                EOS_TOKEN
            );
        }

        tracing::info!(
            "Loaded tokenizer from '{}' ({} tokens)",
            path.display(),
            tokenizer.get_vocab_size(true)
        );
        Ok(tokenizer)
    }
}
