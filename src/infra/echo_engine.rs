// ============================================================
// Layer 6 - Echo Engine
// ============================================================
// An identity "model": every returned sequence is the forced
// target tag followed by the prompt tokens. Decoding that drops
// the special tokens and gives back the source text.
//
// Used for offline runs (`--engine echo`) and as the engine in
// orchestration tests.

use crate::domain::error::{CoreResult, MbrError};
use crate::domain::traits::{GenerationInput, GenerationParams, Seq2SeqEngine};

#[derive(Debug, Clone, Copy, Default)]
pub struct EchoEngine;

impl EchoEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Seq2SeqEngine for EchoEngine {
    fn generate(
        &self,
        input:  &GenerationInput,
        params: &GenerationParams,
    ) -> CoreResult<Vec<Vec<u32>>> {
        if input.decoder_input_ids.len() != input.batch_len() {
            return Err(MbrError::inference(format!(
                "{} prompts but {} forced decoder tokens",
                input.batch_len(),
                input.decoder_input_ids.len()
            )));
        }

        let mut sequences = Vec::with_capacity(input.batch_len() * params.num_return_sequences);
        for (prompt, &forced) in input.input_ids.iter().zip(&input.decoder_input_ids) {
            let mut sequence = Vec::with_capacity(prompt.len() + 1);
            sequence.push(forced);
            sequence.extend_from_slice(prompt);
            sequence.truncate(params.max_length);

            for _ in 0..params.num_return_sequences {
                sequences.push(sequence.clone());
            }
        }

        tracing::debug!("Echo engine returned {} sequences", sequences.len());
        Ok(sequences)
    }
}
