// ============================================================
// Layer 3 - Candidates and MBR Result
// ============================================================
// CandidateSet: the N translations produced for ONE request.
//   Never empty. Order is the engine's output order, which is
//   also the tie-break order during selection.
//
// MbrResult: the winning candidate plus its diagnostics. Built
//   fresh per request and handed back to the caller.

use std::ops::Deref;

use serde::Serialize;

use crate::domain::error::{CoreResult, MbrError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSet {
    candidates: Vec<String>,
}

impl CandidateSet {
    pub fn new(candidates: Vec<String>) -> CoreResult<Self> {
        if candidates.is_empty() {
            return Err(MbrError::invalid_input("candidate set is empty"));
        }
        Ok(Self { candidates })
    }

    pub fn as_slice(&self) -> &[String] {
        &self.candidates
    }
}

impl Deref for CandidateSet {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.candidates
    }
}

impl TryFrom<Vec<String>> for CandidateSet {
    type Error = MbrError;

    fn try_from(candidates: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(candidates)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MbrResult {
    /// The selected translation
    pub text:   String,
    /// Position of the selection in the candidate set
    pub index:  usize,
    /// Average similarity of the selection to the other
    /// candidates; None when there was nothing to compare with
    pub score:  Option<f64>,
    /// Average similarity of every candidate, same order as the set
    pub scores: Vec<f64>,
}

impl MbrResult {
    /// Result for a set of one: no comparison happens
    pub fn sole(text: impl Into<String>) -> Self {
        Self { text: text.into(), index: 0, score: None, scores: Vec::new() }
    }
}
