// ============================================================
// Layer 5 - MBR Selector
// ============================================================
// Minimum-Bayes-risk selection (Kumar & Byrne 2004) with the
// candidates themselves standing in for the distribution of
// translations:
//
//   score(i) = mean over j ≠ i of similarity(cand[i] as hyp,
//                                            cand[j] as ref)
//   best     = first i with the highest score(i)
//
// The similarity is directional (chrF++ weights recall), so both
// (i, j) and (j, i) are computed. score(i, i) is never computed.
//
// Cost is N extractions + N·(N-1) comparisons. For large N an
// optional reference limit scores each candidate against a fixed
// size random subset of the others; the RNG is seeded, so
// selection stays deterministic.
//
// Reference: Kumar & Byrne (2004) Minimum Bayes-Risk Decoding
//            for Statistical Machine Translation

use rand::{rngs::StdRng, seq::index, SeedableRng};

use crate::domain::candidates::MbrResult;
use crate::domain::error::{CoreResult, MbrError};
use crate::domain::traits::SimilarityMetric;
use crate::ml::chrf::ChrF;

pub const DEFAULT_SUBSET_SEED: u64 = 0x5EED;

pub struct MbrSelector<M: SimilarityMetric = ChrF> {
    metric:          M,
    reference_limit: Option<usize>,
    seed:            u64,
}

impl MbrSelector<ChrF> {
    /// Exact MBR with chrF++
    pub fn new() -> Self {
        Self::with_metric(ChrF::default())
    }

    /// Exact MBR unless `reference_limit` is set; `seed` replaces
    /// DEFAULT_SUBSET_SEED for the reference subsets.
    pub fn configured(reference_limit: Option<usize>, seed: Option<u64>) -> Self {
        let mut selector = Self::new();
        if let Some(limit) = reference_limit {
            selector = selector.with_reference_limit(limit);
        }
        if let Some(seed) = seed {
            selector = selector.with_seed(seed);
        }
        selector
    }
}

impl Default for MbrSelector<ChrF> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: SimilarityMetric> MbrSelector<M> {
    pub fn with_metric(metric: M) -> Self {
        Self { metric, reference_limit: None, seed: DEFAULT_SUBSET_SEED }
    }

    /// Compare each candidate with at most `limit` others (min 1)
    pub fn with_reference_limit(mut self, limit: usize) -> Self {
        self.reference_limit = Some(limit.max(1));
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Average directed similarity of every candidate to the others.
    /// Empty for fewer than two candidates.
    pub fn expected_utilities<S: AsRef<str>>(&self, candidates: &[S]) -> Vec<f64> {
        let n = candidates.len();
        if n < 2 {
            return Vec::new();
        }

        let features: Vec<M::Features> = candidates
            .iter()
            .map(|c| self.metric.extract(c.as_ref()))
            .collect();

        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..n)
            .map(|i| {
                let references = self.references_for(i, n, &mut rng);
                let total: f64 = references
                    .iter()
                    .map(|&j| self.metric.compare(&features[i], &features[j]))
                    .sum();
                total / references.len() as f64
            })
            .collect()
    }

    /// Pick the consensus candidate.
    ///
    /// An empty slice is a caller bug and fails with
    /// `MbrError::InvalidInput`; a single candidate is returned
    /// without scoring.
    pub fn select<S: AsRef<str>>(&self, candidates: &[S]) -> CoreResult<MbrResult> {
        match candidates {
            [] => Err(MbrError::invalid_input("MBR selection needs at least one candidate")),
            [only] => Ok(MbrResult::sole(only.as_ref())),
            _ => {
                let scores = self.expected_utilities(candidates);
                let (index, score) = first_max(&scores);
                tracing::debug!(
                    "MBR picked candidate {}/{} (score {:.2})",
                    index,
                    candidates.len(),
                    score
                );
                Ok(MbrResult {
                    text:  candidates[index].as_ref().to_string(),
                    index,
                    score: Some(score),
                    scores,
                })
            }
        }
    }

    /// Indices compared against candidate `i`, never `i` itself
    fn references_for(&self, i: usize, n: usize, rng: &mut StdRng) -> Vec<usize> {
        let others = n - 1;
        match self.reference_limit {
            Some(limit) if limit < others => index::sample(rng, others, limit)
                .into_iter()
                .map(|k| if k < i { k } else { k + 1 })
                .collect(),
            _ => (0..n).filter(|&j| j != i).collect(),
        }
    }
}

/// Linear scan; ties keep the earliest index
fn first_max(scores: &[f64]) -> (usize, f64) {
    let mut best = (0, scores[0]);
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > best.1 {
            best = (i, s);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every (hyp, ref) pair it is asked to compare
    #[derive(Default)]
    struct RecordingMetric {
        calls: RefCell<Vec<(String, String)>>,
    }

    impl SimilarityMetric for RecordingMetric {
        type Features = String;

        fn extract(&self, text: &str) -> String {
            text.to_string()
        }

        fn compare(&self, hypothesis: &String, reference: &String) -> f64 {
            self.calls.borrow_mut().push((hypothesis.clone(), reference.clone()));
            if hypothesis == reference { 1.0 } else { 0.0 }
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_candidate_returned_as_is() {
        let result = MbrSelector::new().select(&["sawubona mhlaba"]).unwrap();
        assert_eq!(result.text, "sawubona mhlaba");
        assert_eq!(result.index, 0);
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_identical_candidates_pick_first() {
        let result = MbrSelector::new().select(&["same", "same", "same", "same"]).unwrap();
        assert_eq!(result.text, "same");
        assert_eq!(result.index, 0);
        assert!((result.score.unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let cands    = strings(&["the cat sat", "a cat sat", "the cat sits", "one dog ran"]);
        let selector = MbrSelector::new();
        let first    = selector.select(&cands).unwrap();
        for _ in 0..5 {
            assert_eq!(selector.select(&cands).unwrap(), first);
        }
    }

    #[test]
    fn test_empty_set_is_invalid_input() {
        let empty: Vec<String> = Vec::new();
        let err = MbrSelector::new().select(&empty).unwrap_err();
        assert!(matches!(err, MbrError::InvalidInput(_)));
    }

    #[test]
    fn test_consensus_beats_outlier() {
        let cands  = ["the cat sat", "the cat sat", "the cat sat", "a dog ran"];
        let result = MbrSelector::new().select(&cands).unwrap();
        assert_eq!(result.text, "the cat sat");
        assert_eq!(result.index, 0);
        assert!(result.scores[3] < result.scores[0]);
    }

    #[test]
    fn test_never_compares_candidate_with_itself() {
        let selector = MbrSelector::with_metric(RecordingMetric::default());
        let cands    = ["a", "b", "c"];
        selector.select(&cands).unwrap();

        let calls = selector.metric().calls.borrow();
        assert_eq!(calls.len(), 6);
        assert!(calls.iter().all(|(h, r)| h != r));
        assert!(calls.contains(&("a".into(), "b".into())));
        assert!(calls.contains(&("b".into(), "a".into())));
    }

    #[test]
    fn test_both_directions_are_scored() {
        let chrf  = ChrF::default();
        let cands = ["the cat", "the cat sat", "a cat sat down"];
        let result = MbrSelector::new().select(&cands).unwrap();

        // directed means, as the selector must compute them
        for i in 0..3 {
            let expected: f64 = (0..3)
                .filter(|&j| j != i)
                .map(|j| chrf.score(cands[i], cands[j]))
                .sum::<f64>() / 2.0;
            assert!((result.scores[i] - expected).abs() < 1e-9);
        }

        // a symmetric shortcut would reuse score(0, 1) for (1, 0)
        let shortcut_1 = (chrf.score(cands[0], cands[1]) + chrf.score(cands[1], cands[2])) / 2.0;
        assert!((result.scores[1] - shortcut_1).abs() > 1e-6);
    }

    #[test]
    fn test_reference_limit_is_deterministic_and_excludes_self() {
        let selector = MbrSelector::with_metric(RecordingMetric::default())
            .with_reference_limit(2);
        let cands = ["a", "b", "c", "d", "e"];
        selector.select(&cands).unwrap();
        {
            let calls = selector.metric().calls.borrow();
            assert_eq!(calls.len(), 10);
            assert!(calls.iter().all(|(h, r)| h != r));
        }

        let cands = ["the cat sat", "the cat sat", "the cat sat", "a dog ran", "the cat sat"];
        let limited = MbrSelector::new().with_reference_limit(2);
        let first   = limited.select(&cands).unwrap();
        assert_eq!(first.text, "the cat sat");
        assert_eq!(limited.select(&cands).unwrap(), first);
    }

    #[test]
    fn test_limit_above_set_size_is_exact() {
        let cands = ["the cat", "the cat sat", "a cat sat down"];
        let exact   = MbrSelector::new().select(&cands).unwrap();
        let limited = MbrSelector::new().with_reference_limit(10).select(&cands).unwrap();
        assert_eq!(exact, limited);
    }

    #[test]
    fn test_configured_selector_uses_limit_and_seed() {
        let cands = strings(&["the cat sat", "a cat sat", "the cat sits", "one dog ran", "the dog sat"]);

        let exact = MbrSelector::configured(None, Some(99)).select(&cands).unwrap();
        assert_eq!(exact, MbrSelector::new().select(&cands).unwrap());

        let seeded = MbrSelector::configured(Some(2), Some(99));
        let again  = MbrSelector::new().with_reference_limit(2).with_seed(99);
        assert_eq!(seeded.select(&cands).unwrap(), again.select(&cands).unwrap());

        let default_seed = MbrSelector::configured(Some(2), None);
        let explicit     = MbrSelector::new().with_reference_limit(2).with_seed(DEFAULT_SUBSET_SEED);
        assert_eq!(default_seed.select(&cands).unwrap(), explicit.select(&cands).unwrap());
    }

    #[test]
    fn test_first_max_prefers_earliest() {
        assert_eq!(first_max(&[1.0, 3.0, 3.0, 2.0]), (1, 3.0));
    }
}
