// ============================================================
// Layer 5 - Candidate Generator
// ============================================================
// Produces the N candidate translations MBR chooses from, with a
// single engine call per batch:
//
//   1. encode every request's prompt + forced target tag
//   2. one generate() call with num_return_sequences = N
//   3. check the engine returned batch_len · N sequences
//   4. split them back per request (engine groups by item)
//   5. cap each at max_length tokens and decode
//
// Beam search asks the engine for its top-N distinct beams.
// Sampling passes a seed; without a fixed one a fresh seed is
// drawn per call so separate calls are independent.
//
// Candidates are kept exactly as the tokenizer decodes them; MBR
// scores the same characters the caller gets back.

use tokenizers::Tokenizer;

use crate::data::codec::PromptCodec;
use crate::domain::candidates::CandidateSet;
use crate::domain::error::{CoreResult, MbrError};
use crate::domain::request::{DecodingParams, TranslationBatch, TranslationRequest};
use crate::domain::traits::{GenerationParams, Seq2SeqEngine};

pub struct CandidateGenerator<'a> {
    engine:    &'a dyn Seq2SeqEngine,
    tokenizer: &'a Tokenizer,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(engine: &'a dyn Seq2SeqEngine, tokenizer: &'a Tokenizer) -> Self {
        Self { engine, tokenizer }
    }

    /// N candidates for one request
    pub fn generate(&self, request: &TranslationRequest) -> CoreResult<CandidateSet> {
        self.generate_batch(&TranslationBatch::from(request.clone()))?
            .into_iter()
            .next()
            .ok_or_else(|| MbrError::inference("engine produced no candidate set"))
    }

    /// One candidate set per request, in request order
    pub fn generate_batch(&self, batch: &TranslationBatch) -> CoreResult<Vec<CandidateSet>> {
        let codec  = PromptCodec::new(self.tokenizer);
        let input  = codec.encode_batch(batch)?;
        let params = generation_params(batch.params());
        let n      = params.num_return_sequences;

        let sequences = self.engine.generate(&input, &params)?;
        if sequences.len() != batch.len() * n {
            return Err(MbrError::inference(format!(
                "engine returned {} sequences, expected {} ({} items x {} candidates)",
                sequences.len(),
                batch.len() * n,
                batch.len(),
                n
            )));
        }

        let sets = sequences
            .chunks(n)
            .map(|group| -> CoreResult<CandidateSet> {
                let texts = group
                    .iter()
                    .map(|ids| codec.decode(&ids[..ids.len().min(params.max_length)]))
                    .collect::<CoreResult<Vec<String>>>()?;
                CandidateSet::new(texts)
            })
            .collect::<CoreResult<Vec<CandidateSet>>>()?;

        tracing::debug!("Generated {} candidate sets of {} candidates", sets.len(), n);
        Ok(sets)
    }
}

/// Engine parameters for N = num_beams returned candidates
pub fn generation_params(params: &DecodingParams) -> GenerationParams {
    let do_sample = params.strategy.is_sampling();
    let seed = match (do_sample, params.seed) {
        (true, None) => Some(rand::random::<u64>()),
        (_, seed)    => seed,
    };

    GenerationParams {
        max_length:           params.max_length,
        num_beams:            params.num_beams,
        do_sample,
        temperature:          params.strategy.temperature(),
        num_return_sequences: params.num_beams,
        seed,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{FailingEngine, ScriptedEngine};
    use super::*;
    use crate::domain::language::LanguageCode;
    use crate::infra::echo_engine::EchoEngine;
    use crate::infra::tokenizer_store::test_support::{ids, tiny_tokenizer};

    fn request(text: &str, params: DecodingParams) -> TranslationRequest {
        TranslationRequest::new(
            text,
            LanguageCode::new("eng_Latn").unwrap(),
            LanguageCode::new("zul_Latn").unwrap(),
            params,
        ).unwrap()
    }

    #[test]
    fn test_five_beams_give_five_candidates() {
        let tok = tiny_tokenizer();
        let gen = CandidateGenerator::new(&EchoEngine, &tok);
        let set = gen.generate(&request("hello world", DecodingParams::beam(5))).unwrap();
        assert_eq!(set.len(), 5);
        assert!(set.iter().all(|c| c == "hello world"));
    }

    #[test]
    fn test_batch_keeps_items_apart() {
        let tok   = tiny_tokenizer();
        let gen   = CandidateGenerator::new(&EchoEngine, &tok);
        let batch = TranslationBatch::new(vec![
            request("hello", DecodingParams::beam(3)),
            request("the cat sat", DecodingParams::beam(3)),
        ]).unwrap();

        let sets = gen.generate_batch(&batch).unwrap();
        assert_eq!(sets.len(), 2);
        assert!(sets[0].iter().all(|c| c == "hello"));
        assert!(sets[1].iter().all(|c| c == "the cat sat"));
    }

    #[test]
    fn test_single_engine_call_per_batch() {
        let tok    = tiny_tokenizer();
        let seq    = ids(&tok, &["zul_Latn", "sawubona", "</s>"]);
        let engine = ScriptedEngine::new(vec![seq; 4]);
        let gen    = CandidateGenerator::new(&engine, &tok);
        let batch  = TranslationBatch::new(vec![
            request("hello", DecodingParams::beam(2)),
            request("world", DecodingParams::beam(2)),
        ]).unwrap();

        gen.generate_batch(&batch).unwrap();
        assert_eq!(engine.call_count(), 1);
        assert_eq!(engine.last_params().num_return_sequences, 2);
    }

    #[test]
    fn test_wrong_sequence_count_is_inference_error() {
        let tok    = tiny_tokenizer();
        let seq    = ids(&tok, &["zul_Latn", "sawubona"]);
        let engine = ScriptedEngine::new(vec![seq; 2]);
        let gen    = CandidateGenerator::new(&engine, &tok);
        let err    = gen.generate(&request("hello", DecodingParams::beam(3))).unwrap_err();
        assert!(matches!(err, MbrError::Inference(_)));
    }

    #[test]
    fn test_engine_failure_propagates() {
        let tok = tiny_tokenizer();
        let gen = CandidateGenerator::new(&FailingEngine, &tok);
        let err = gen.generate(&request("hello", DecodingParams::beam(2))).unwrap_err();
        assert_eq!(err, MbrError::inference("model not loaded"));
    }

    #[test]
    fn test_candidates_capped_at_max_length() {
        let tok    = tiny_tokenizer();
        let seq    = ids(&tok, &["zul_Latn", "the", "cat", "sat", "</s>"]);
        let engine = ScriptedEngine::new(vec![seq]);
        let gen    = CandidateGenerator::new(&engine, &tok);
        let params = DecodingParams::beam(1).with_max_length(3);
        let set    = gen.generate(&request("hello", params)).unwrap();
        assert_eq!(set[0], "the cat");
    }

    #[test]
    fn test_decoded_text_is_not_rewritten() {
        let tok    = tiny_tokenizer();
        let seq    = ids(&tok, &["zul_Latn", "mhlaba\u{200B}", "</s>"]);
        let engine = ScriptedEngine::new(vec![seq]);
        let gen    = CandidateGenerator::new(&engine, &tok);
        let set    = gen.generate(&request("hello", DecodingParams::beam(1))).unwrap();
        assert_eq!(set[0], "mhlaba\u{200B}");
    }

    #[test]
    fn test_unseeded_sampling_draws_fresh_seed_per_call() {
        let tok    = tiny_tokenizer();
        let seq    = ids(&tok, &["zul_Latn", "sawubona", "</s>"]);
        let engine = ScriptedEngine::new(vec![seq; 2]);
        let gen    = CandidateGenerator::new(&engine, &tok);
        let req    = request("hello", DecodingParams::beam(2).with_sampling(0.9));

        gen.generate(&req).unwrap();
        gen.generate(&req).unwrap();

        let seeds = engine.seeds();
        assert_eq!(seeds.len(), 2);
        assert!(seeds.iter().all(Option::is_some));
        assert_ne!(seeds[0], seeds[1]);
    }

    #[test]
    fn test_seeded_sampling_reuses_seed() {
        let tok    = tiny_tokenizer();
        let seq    = ids(&tok, &["zul_Latn", "sawubona", "</s>"]);
        let engine = ScriptedEngine::new(vec![seq; 2]);
        let gen    = CandidateGenerator::new(&engine, &tok);
        let req    = request("hello", DecodingParams::beam(2).with_sampling(0.9).with_seed(7));

        gen.generate(&req).unwrap();
        gen.generate(&req).unwrap();
        assert_eq!(engine.seeds(), vec![Some(7), Some(7)]);
    }

    #[test]
    fn test_sampling_gets_a_seed() {
        let sampled = generation_params(&DecodingParams::beam(4).with_sampling(0.7));
        assert!(sampled.do_sample);
        assert_eq!(sampled.temperature, Some(0.7));
        assert!(sampled.seed.is_some());

        let fixed = generation_params(&DecodingParams::beam(4).with_sampling(0.7).with_seed(42));
        assert_eq!(fixed.seed, Some(42));

        let beam = generation_params(&DecodingParams::beam(4));
        assert!(!beam.do_sample);
        assert_eq!(beam.temperature, None);
        assert_eq!(beam.seed, None);
        assert_eq!(beam.num_return_sequences, 4);
    }
}
