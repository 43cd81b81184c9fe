// ============================================================
// Layer 2 - TranslateUseCase
// ============================================================
// The long-lived translation service. Built once at startup
// (tokenizer + engine loaded), then passed to whoever needs to
// translate. Each call:
//
//   Step 1: generate N = num_beams candidates   (Layer 5 - ml)
//           in a single engine call
//   Step 2: MBR-select the consensus candidate  (Layer 5 - ml)
//
// Calls share nothing mutable; the engine and tokenizer are
// only read. A call either returns a complete result or an
// error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokenizers::Tokenizer;

use crate::domain::candidates::{CandidateSet, MbrResult};
use crate::domain::error::CoreResult;
use crate::domain::language::LanguageCode;
use crate::domain::request::{DecodingParams, TranslationBatch, TranslationRequest};
use crate::domain::traits::Seq2SeqEngine;
use crate::infra::{
    echo_engine::EchoEngine,
    http_engine::{HttpEngine, DEFAULT_TIMEOUT_SECS},
    tokenizer_store::TokenizerStore,
};
use crate::ml::{generator::CandidateGenerator, mbr::MbrSelector};

// ─── Configuration ───────────────────────────────────────────────────────────
/// Where the inference primitive lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineConfig {
    Http {
        url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    Echo,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub model_dir:       String,
    pub languages_file:  String,
    pub engine:          EngineConfig,
    pub decoding:        DecodingParams,
    pub default_source:  String,
    pub default_target:  String,
    /// Approximate MBR: compare each candidate with at most this many others
    pub reference_limit: Option<usize>,
    /// Seed for the approximate-MBR reference subsets
    pub subset_seed:     Option<u64>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            model_dir:       "./model".to_string(),
            languages_file:  "languages.json".to_string(),
            engine:          EngineConfig::Http {
                url:          "http://127.0.0.1:8000".to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            decoding:        DecodingParams::beam(5),
            default_source:  "eng_Latn".to_string(),
            default_target:  "zul_Latn".to_string(),
            reference_limit: None,
            subset_seed:     None,
        }
    }
}

impl EngineConfig {
    pub fn build(&self) -> Result<Box<dyn Seq2SeqEngine>> {
        match self {
            Self::Http { url, timeout_secs } => {
                tracing::info!("Using model server at {}", url);
                let engine = HttpEngine::new(url.as_str(), Duration::from_secs(*timeout_secs))
                    .with_context(|| format!("Cannot build HTTP client for '{url}'"))?;
                Ok(Box::new(engine))
            }
            Self::Echo => {
                tracing::warn!("Using the echo engine: output repeats the source text");
                Ok(Box::new(EchoEngine::new()))
            }
        }
    }
}

// ─── TranslateUseCase ────────────────────────────────────────────────────────
pub struct TranslateUseCase {
    engine:    Box<dyn Seq2SeqEngine>,
    tokenizer: Tokenizer,
    selector:  MbrSelector,
}

impl TranslateUseCase {
    pub fn new(engine: Box<dyn Seq2SeqEngine>, tokenizer: Tokenizer, selector: MbrSelector) -> Self {
        Self { engine, tokenizer, selector }
    }

    /// Load the tokenizer and connect the engine described by `cfg`
    pub fn from_config(cfg: &TranslatorConfig) -> Result<Self> {
        let tokenizer = TokenizerStore::new(&cfg.model_dir).load()?;
        let engine    = cfg.engine.build()?;
        let selector  = MbrSelector::configured(cfg.reference_limit, cfg.subset_seed);
        Ok(Self::new(engine, tokenizer, selector))
    }

    fn generator(&self) -> CandidateGenerator<'_> {
        CandidateGenerator::new(self.engine.as_ref(), &self.tokenizer)
    }

    pub fn translate(&self, request: &TranslationRequest) -> CoreResult<MbrResult> {
        self.translate_with_candidates(request).map(|(_, result)| result)
    }

    /// Same as `translate`, also handing back every candidate
    pub fn translate_with_candidates(
        &self,
        request: &TranslationRequest,
    ) -> CoreResult<(CandidateSet, MbrResult)> {
        tracing::debug!(
            "Translating {} -> {} with {} candidates",
            request.source_lang(),
            request.target_lang(),
            request.params().num_beams
        );
        let candidates = self.generator().generate(request)?;
        let result     = self.selector.select(&candidates)?;
        Ok((candidates, result))
    }

    /// One engine call for the batch, one selection per item
    pub fn translate_batch(&self, batch: &TranslationBatch) -> CoreResult<Vec<MbrResult>> {
        self.generator()
            .generate_batch(batch)?
            .iter()
            .map(|candidates| self.selector.select(candidates))
            .collect()
    }
}

/// Translate one sentence with beam search and MBR selection
/// (max_length 256, N = num_beams candidates).
pub fn translate_mbr(
    text:        &str,
    engine:      &dyn Seq2SeqEngine,
    tokenizer:   &Tokenizer,
    source_lang: &str,
    target_lang: &str,
    num_beams:   usize,
) -> CoreResult<String> {
    let request = TranslationRequest::new(
        text,
        LanguageCode::new(source_lang)?,
        LanguageCode::new(target_lang)?,
        DecodingParams::beam(num_beams),
    )?;
    let candidates = CandidateGenerator::new(engine, tokenizer).generate(&request)?;
    Ok(MbrSelector::new().select(&candidates)?.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::MbrError;
    use crate::infra::tokenizer_store::test_support::{ids, tiny_tokenizer};
    use crate::ml::generator::test_support::{FailingEngine, ScriptedEngine};

    fn code(s: &str) -> LanguageCode {
        LanguageCode::new(s).unwrap()
    }

    #[test]
    fn test_echo_round_trip_returns_a_candidate() {
        let tok        = tiny_tokenizer();
        let engine     = EchoEngine::new();
        let candidates = CandidateGenerator::new(&engine, &tok)
            .generate(&TranslationRequest::new(
                "hello", code("eng_Latn"), code("eng_Latn"), DecodingParams::beam(3),
            ).unwrap())
            .unwrap();

        let out = translate_mbr("hello", &engine, &tok, "eng_Latn", "eng_Latn", 3).unwrap();
        assert_eq!(candidates.len(), 3);
        assert!(candidates.contains(&out));
        assert_eq!(out, "hello");
    }

    #[test]
    fn test_consensus_wins_end_to_end() {
        let tok     = tiny_tokenizer();
        let cat     = ids(&tok, &["zul_Latn", "the", "cat", "sat", "</s>"]);
        let dog     = ids(&tok, &["zul_Latn", "dog", "</s>"]);
        let engine  = ScriptedEngine::new(vec![dog, cat.clone(), cat.clone(), cat]);
        let service = TranslateUseCase::new(Box::new(engine), tok, MbrSelector::new());

        let request = TranslationRequest::new(
            "hello", code("eng_Latn"), code("zul_Latn"), DecodingParams::beam(4),
        ).unwrap();
        let (candidates, result) = service.translate_with_candidates(&request).unwrap();
        assert_eq!(candidates.len(), 4);
        assert_eq!(result.text, "the cat sat");
        assert_eq!(result.index, 1);
    }

    #[test]
    fn test_batch_selects_per_item() {
        let tok      = tiny_tokenizer();
        let hello    = ids(&tok, &["zul_Latn", "sawubona", "</s>"]);
        let world    = ids(&tok, &["zul_Latn", "mhlaba", "</s>"]);
        let greeting = ids(&tok, &["zul_Latn", "sawubona", "mhlaba", "</s>"]);
        let engine   = ScriptedEngine::new(vec![
            hello.clone(), hello, world.clone(),
            greeting.clone(), world, greeting,
        ]);
        let service  = TranslateUseCase::new(Box::new(engine), tok, MbrSelector::new());

        let make = |text: &str| TranslationRequest::new(
            text, code("eng_Latn"), code("zul_Latn"), DecodingParams::beam(3),
        ).unwrap();
        let batch   = TranslationBatch::new(vec![make("hello"), make("hello world")]).unwrap();
        let results = service.translate_batch(&batch).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "sawubona");
        assert_eq!(results[1].text, "sawubona mhlaba");
    }

    #[test]
    fn test_inference_error_reaches_caller() {
        let tok = tiny_tokenizer();
        let err = translate_mbr("hello", &FailingEngine, &tok, "eng_Latn", "zul_Latn", 5).unwrap_err();
        assert!(matches!(err, MbrError::Inference(_)));

        let err = translate_mbr("hello", &EchoEngine, &tok, "eng_Latn", "fra_Latn", 5).unwrap_err();
        assert!(matches!(err, MbrError::Inference(_)));
    }

    #[test]
    fn test_malformed_language_code_is_inference_error() {
        let tok = tiny_tokenizer();
        let err = translate_mbr("hello", &EchoEngine, &tok, "", "zul_Latn", 3).unwrap_err();
        assert!(matches!(err, MbrError::Inference(_)));

        let err = translate_mbr("hello", &EchoEngine, &tok, "eng_Latn", "zul Latn", 3).unwrap_err();
        assert!(matches!(err, MbrError::Inference(_)));
    }

    #[test]
    fn test_zero_beams_rejected() {
        let tok = tiny_tokenizer();
        let err = translate_mbr("hello", &EchoEngine, &tok, "eng_Latn", "zul_Latn", 0).unwrap_err();
        assert!(matches!(err, MbrError::InvalidInput(_)));
    }

    #[test]
    fn test_config_defaults_and_json_shape() {
        let cfg = TranslatorConfig::default();
        assert_eq!(cfg.decoding.num_beams, 5);
        assert_eq!(cfg.default_target, "zul_Latn");

        let parsed: TranslatorConfig = serde_json::from_str(
            r#"{ "engine": { "kind": "echo" }, "reference_limit": 4 }"#,
        ).unwrap();
        assert_eq!(parsed.engine, EngineConfig::Echo);
        assert_eq!(parsed.reference_limit, Some(4));
        assert_eq!(parsed.model_dir, "./model");
    }
}
