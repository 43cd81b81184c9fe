// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain structs, enums and traits describing the translation
// core. No file I/O, no HTTP, no tokenizer here.

pub mod error;

pub mod language;

// Requests, decoding parameters and batches
pub mod request;

// Candidate sets and the MBR result
pub mod candidates;

// Engine and similarity abstractions
pub mod traits;
