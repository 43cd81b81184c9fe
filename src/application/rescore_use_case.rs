// ============================================================
// Layer 2 - RescoreUseCase
// ============================================================
// MBR selection over candidates that were produced elsewhere,
// e.g. an n-best list dumped by another decoder. Input is one
// candidate per line; blank lines are ignored.

use anyhow::Result;

use crate::data::preprocessor::Preprocessor;
use crate::domain::candidates::{CandidateSet, MbrResult};
use crate::ml::mbr::MbrSelector;

pub struct RescoreUseCase {
    selector:     MbrSelector,
    preprocessor: Preprocessor,
}

impl RescoreUseCase {
    pub fn new(selector: MbrSelector) -> Self {
        Self { selector, preprocessor: Preprocessor::new() }
    }

    pub fn rescore(&self, text: &str) -> Result<(CandidateSet, MbrResult)> {
        let candidates = CandidateSet::new(self.preprocessor.split_candidates(text))?;
        tracing::info!("Rescoring {} candidates", candidates.len());
        let result = self.selector.select(&candidates)?;
        Ok((candidates, result))
    }
}
