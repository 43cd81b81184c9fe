// ============================================================
// polyglot-mbr
// ============================================================
// Sentence translation with minimum-Bayes-risk selection:
// an engine proposes N candidates, chrF++ consensus picks one.
//
//   Layer 1 - cli          argument parsing and output
//   Layer 2 - application  TranslateUseCase, translate_mbr
//   Layer 3 - domain       requests, candidates, errors, traits
//   Layer 4 - data         prompt codec, candidate preprocessing
//   Layer 5 - ml           chrF++, MBR selector, generator
//   Layer 6 - infra        tokenizer, config, languages, engines

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;

pub use application::translate_use_case::translate_mbr;
pub use domain::error::MbrError;
