// ============================================================
// Layer 3 - Core Error Type
// ============================================================
// The two failure kinds of the translation core:
//
//   Inference    - the inference primitive (tokenizer + engine)
//                  could not produce output: unknown language
//                  token, transport failure, wrong output count.
//                  Never retried here; the caller decides.
//
//   InvalidInput - a contract violation by the caller, e.g. an
//                  empty candidate set or zero requested beams.
//
// Layers 1, 2 and 6 wrap this in anyhow::Error via `?`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MbrError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl MbrError {
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Result alias used by the domain, data and ml layers
pub type CoreResult<T> = std::result::Result<T, MbrError>;
