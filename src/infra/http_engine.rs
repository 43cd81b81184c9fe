// ============================================================
// Layer 6 - HTTP Engine
// ============================================================
// Talks to a model server that wraps a HuggingFace seq2seq
// `generate` call.
//
//   POST {base_url}/generate
//   {
//     "input_ids":            [[u32, ...], ...],   one per item
//     "decoder_input_ids":    [u32, ...],          forced tag per item
//     "max_length": 256, "num_beams": 5, "do_sample": false,
//     "temperature": null, "num_return_sequences": 5, "seed": null
//   }
//   → 200 { "sequences": [[u32, ...], ...] }
//
// Any transport failure, non-2xx status or unreadable body is an
// inference failure. Nothing is retried here.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::error::{CoreResult, MbrError};
use crate::domain::traits::{GenerationInput, GenerationParams, Seq2SeqEngine};

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    #[serde(flatten)]
    input:  &'a GenerationInput,
    #[serde(flatten)]
    params: &'a GenerationParams,
}

#[derive(Deserialize)]
struct GenerateResponse {
    sequences: Vec<Vec<u32>>,
}

#[derive(Debug, Clone)]
pub struct HttpEngine {
    base_url: String,
    http:     Client,
}

impl HttpEngine {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/generate", self.base_url)
    }
}

impl Seq2SeqEngine for HttpEngine {
    fn generate(
        &self,
        input:  &GenerationInput,
        params: &GenerationParams,
    ) -> CoreResult<Vec<Vec<u32>>> {
        let url = self.endpoint();
        tracing::debug!(
            "POST {} ({} prompts, {} sequences each)",
            url,
            input.batch_len(),
            params.num_return_sequences
        );

        let response = self.http
            .post(&url)
            .json(&GenerateRequest { input, params })
            .send()
            .map_err(|e| MbrError::inference(format!("model server unreachable at {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MbrError::inference(format!("model server returned {status}: {body}")));
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| MbrError::inference(format!("unreadable model server response: {e}")))?;
        Ok(body.sequences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_is_flat() {
        let input = GenerationInput {
            input_ids:         vec![vec![3, 8, 2]],
            decoder_input_ids: vec![4],
        };
        let params = GenerationParams {
            max_length: 256,
            num_beams: 5,
            do_sample: false,
            temperature: None,
            num_return_sequences: 5,
            seed: None,
        };
        let body = serde_json::to_value(GenerateRequest { input: &input, params: &params }).unwrap();
        assert_eq!(body["input_ids"], serde_json::json!([[3, 8, 2]]));
        assert_eq!(body["decoder_input_ids"], serde_json::json!([4]));
        assert_eq!(body["num_return_sequences"], 5);
        assert!(body["temperature"].is_null());
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let engine = HttpEngine::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(engine.endpoint(), "http://localhost:8000/generate");
    }

    #[test]
    fn test_request_failure_is_inference_error() {
        // no scheme: the request fails before any connection is attempted
        let engine = HttpEngine::new("model-server", Duration::from_millis(50)).unwrap();
        let input  = GenerationInput { input_ids: vec![vec![1]], decoder_input_ids: vec![1] };
        let params = GenerationParams {
            max_length: 8, num_beams: 1, do_sample: false,
            temperature: None, num_return_sequences: 1, seed: None,
        };
        assert!(matches!(engine.generate(&input, &params), Err(MbrError::Inference(_))));
    }
}
