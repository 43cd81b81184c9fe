// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// Seams between the MBR core and the things it does not own:
//
//   Seq2SeqEngine    - the translation model. Implemented by
//                      HttpEngine (remote model server) and
//                      EchoEngine (offline identity engine).
//   SimilarityMetric - pairwise utility used by MBR selection.
//                      Implemented by ChrF.
//
// The application layer only sees these traits, so engines can
// be swapped at startup without touching selection code.

use serde::{Deserialize, Serialize};

use crate::domain::error::CoreResult;

/// One engine call: a prompt per batch item plus the token that
/// decoding is forced to start with (the target language tag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInput {
    pub input_ids:         Vec<Vec<u32>>,
    pub decoder_input_ids: Vec<u32>,
}

impl GenerationInput {
    pub fn batch_len(&self) -> usize {
        self.input_ids.len()
    }
}

/// Decoding controls forwarded to the engine as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_length:           usize,
    pub num_beams:            usize,
    pub do_sample:            bool,
    pub temperature:          Option<f32>,
    pub num_return_sequences: usize,
    pub seed:                 Option<u64>,
}

/// A loaded sequence-to-sequence model.
///
/// Must return `batch_len * num_return_sequences` token sequences,
/// grouped by batch item in input order. Implementations are shared
/// read-only across requests.
pub trait Seq2SeqEngine: Send + Sync {
    fn generate(
        &self,
        input:  &GenerationInput,
        params: &GenerationParams,
    ) -> CoreResult<Vec<Vec<u32>>>;
}

/// A directed similarity between a hypothesis and one reference.
///
/// `Features` lets callers extract a string's representation once
/// and compare it many times. No symmetry is assumed:
/// `compare(a, b)` and `compare(b, a)` may differ.
pub trait SimilarityMetric {
    type Features;

    fn extract(&self, text: &str) -> Self::Features;

    fn compare(&self, hypothesis: &Self::Features, reference: &Self::Features) -> f64;

    fn score(&self, hypothesis: &str, reference: &str) -> f64 {
        self.compare(&self.extract(hypothesis), &self.extract(reference))
    }
}
