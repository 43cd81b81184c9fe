// ============================================================
// Layer 5 - MBR Decoding Core
// ============================================================
//   generator.rs - one engine call → N candidates per request
//   chrf.rs      - chrF++ similarity between two strings
//   mbr.rs       - expected-utility argmax over the candidates
//
// Reference: Popović (2017) chrF++: words helping character n-grams

/// Candidate generation over an injected engine
pub mod generator;

/// Character / word n-gram F-score
pub mod chrf;

/// Minimum-Bayes-risk selection
pub mod mbr;
