// ============================================================
// Layer 3 - Translation Requests
// ============================================================
// What the caller asks for:
//
//   DecodingParams     - how the engine should search
//   TranslationRequest - one source sentence + language pair
//   TranslationBatch   - several distinct requests that share
//                        one set of DecodingParams, so they can
//                        go to the engine in a single call
//
// A batch is a list of *different* sentences. The N replicas
// generated for one sentence are a CandidateSet (candidates.rs);
// the two shapes are kept as separate types so they cannot be
// mixed up.

use serde::{Deserialize, Serialize};

use crate::domain::error::{CoreResult, MbrError};
use crate::domain::language::LanguageCode;

pub const DEFAULT_MAX_LENGTH: usize = 256;
pub const DEFAULT_NUM_BEAMS: usize = 10;

/// Beam search returns the top-N distinct beams; sampling draws
/// N independent samples at the given temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodingStrategy {
    Beam,
    Sample { temperature: f32 },
}

impl DecodingStrategy {
    pub fn is_sampling(&self) -> bool {
        matches!(self, Self::Sample { .. })
    }

    /// Temperature is only meaningful when sampling
    pub fn temperature(&self) -> Option<f32> {
        match self {
            Self::Beam => None,
            Self::Sample { temperature } => Some(*temperature),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingParams {
    /// Upper bound on generated tokens per candidate
    pub max_length: usize,
    /// Beam count, also the number of candidates returned
    pub num_beams:  usize,
    pub strategy:   DecodingStrategy,
    /// Fixed seed for sampling; None draws a fresh one per call
    pub seed:       Option<u64>,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            num_beams:  DEFAULT_NUM_BEAMS,
            strategy:   DecodingStrategy::Beam,
            seed:       None,
        }
    }
}

impl DecodingParams {
    pub fn beam(num_beams: usize) -> Self {
        Self { num_beams, ..Self::default() }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_sampling(mut self, temperature: f32) -> Self {
        self.strategy = DecodingStrategy::Sample { temperature };
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.num_beams == 0 {
            return Err(MbrError::invalid_input("at least one beam / candidate is required"));
        }
        if self.max_length == 0 {
            return Err(MbrError::invalid_input("max_length must be positive"));
        }
        if let DecodingStrategy::Sample { temperature } = self.strategy {
            if !temperature.is_finite() || temperature <= 0.0 {
                return Err(MbrError::invalid_input(format!(
                    "sampling temperature must be a positive number, got {temperature}"
                )));
            }
        }
        Ok(())
    }
}

/// One sentence to translate. Immutable once built.
///
/// Empty or whitespace-only text is not rejected; it goes to the
/// engine as-is and the engine decides what to return.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    source_text: String,
    source_lang: LanguageCode,
    target_lang: LanguageCode,
    params:      DecodingParams,
}

impl TranslationRequest {
    pub fn new(
        source_text: impl Into<String>,
        source_lang: LanguageCode,
        target_lang: LanguageCode,
        params:      DecodingParams,
    ) -> CoreResult<Self> {
        params.validate()?;
        Ok(Self {
            source_text: source_text.into(),
            source_lang,
            target_lang,
            params,
        })
    }

    pub fn source_text(&self) -> &str { &self.source_text }

    pub fn source_lang(&self) -> &LanguageCode { &self.source_lang }

    pub fn target_lang(&self) -> &LanguageCode { &self.target_lang }

    pub fn params(&self) -> &DecodingParams { &self.params }
}

/// Distinct requests sent to the engine in one call.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationBatch {
    requests: Vec<TranslationRequest>,
}

impl TranslationBatch {
    /// Fails if the batch is empty or the requests disagree on
    /// decoding parameters.
    pub fn new(requests: Vec<TranslationRequest>) -> CoreResult<Self> {
        let first = requests
            .first()
            .ok_or_else(|| MbrError::invalid_input("translation batch is empty"))?;
        if let Some(pos) = requests.iter().position(|r| r.params != first.params) {
            return Err(MbrError::invalid_input(format!(
                "request {pos} uses different decoding parameters than request 0"
            )));
        }
        Ok(Self { requests })
    }

    pub fn requests(&self) -> &[TranslationRequest] {
        &self.requests
    }

    /// Parameters shared by every request in the batch
    pub fn params(&self) -> &DecodingParams {
        &self.requests[0].params
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl From<TranslationRequest> for TranslationBatch {
    fn from(request: TranslationRequest) -> Self {
        Self { requests: vec![request] }
    }
}
