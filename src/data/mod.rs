// ============================================================
// Layer 4 - Text Pipeline
// ============================================================
// Everything between raw strings and token ids:
//
//   TranslationRequest
//       │
//       ▼
//   PromptCodec   → "{src} {text}</s>" → token ids + forced tag
//       │
//       ▼
//   (engine)      → token ids per candidate
//       │
//       ▼
//   PromptCodec   → candidate text, special tokens dropped
//
//   Preprocessor  → hand-supplied candidate lines for `rescore`,
//                   each a single whitespace-normalised line

/// Prompt encoding and output decoding over the HF tokenizer
pub mod codec;

/// Whitespace normalisation of candidate lists
pub mod preprocessor;
