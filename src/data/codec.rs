// ============================================================
// Layer 4 - Prompt Codec
// ============================================================
// Turns requests into engine input and engine output back into
// text, using the model's HuggingFace tokenizer:
//
//   prompt:  "{source_lang} {source_text}</s>"
//            encoded without the tokenizer's own post-processor
//            and cut to MAX_SOURCE_TOKENS tokens
//   forced:  the target language tag is the first decoder token
//   decode:  special tokens (language tags, </s>, <pad>) dropped
//
// Both language tags must exist in the vocabulary. An unknown
// tag is reported as an inference failure rather than being
// silently mapped to <unk>.

use tokenizers::Tokenizer;

use crate::domain::error::{CoreResult, MbrError};
use crate::domain::language::LanguageCode;
use crate::domain::request::{TranslationBatch, TranslationRequest};
use crate::domain::traits::GenerationInput;

pub const MAX_SOURCE_TOKENS: usize = 128;
pub const EOS_TOKEN: &str = "</s>";

pub fn prompt_text(source_text: &str, source_lang: &LanguageCode) -> String {
    format!("{source_lang} {source_text}{EOS_TOKEN}")
}

pub struct PromptCodec<'a> {
    tokenizer: &'a Tokenizer,
}

impl<'a> PromptCodec<'a> {
    pub fn new(tokenizer: &'a Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Vocabulary id of a language tag
    pub fn language_token(&self, code: &LanguageCode) -> CoreResult<u32> {
        self.tokenizer.token_to_id(code.as_str()).ok_or_else(|| {
            MbrError::inference(format!("language code '{code}' is not in the tokenizer vocabulary"))
        })
    }

    pub fn encode_prompt(&self, request: &TranslationRequest) -> CoreResult<Vec<u32>> {
        self.language_token(request.source_lang())?;

        let text     = prompt_text(request.source_text(), request.source_lang());
        let encoding = self.tokenizer
            .encode(text.as_str(), false)
            .map_err(|e| MbrError::inference(format!("tokenisation failed: {e}")))?;

        let mut ids = encoding.get_ids().to_vec();
        ids.truncate(MAX_SOURCE_TOKENS);
        Ok(ids)
    }

    /// Build the single engine call for a whole batch
    pub fn encode_batch(&self, batch: &TranslationBatch) -> CoreResult<GenerationInput> {
        let mut input_ids         = Vec::with_capacity(batch.len());
        let mut decoder_input_ids = Vec::with_capacity(batch.len());

        for request in batch.requests() {
            input_ids.push(self.encode_prompt(request)?);
            decoder_input_ids.push(self.language_token(request.target_lang())?);
        }

        Ok(GenerationInput { input_ids, decoder_input_ids })
    }

    pub fn decode(&self, ids: &[u32]) -> CoreResult<String> {
        self.tokenizer
            .decode(ids, true)
            .map_err(|e| MbrError::inference(format!("detokenisation failed: {e}")))
    }
}
