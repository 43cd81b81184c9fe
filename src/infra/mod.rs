// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Files on disk and the inference primitive:
//
//   tokenizer_store.rs - model tokenizer.json loading
//   language_map.rs    - languages.json (code → display name)
//   config_store.rs    - translator config as JSON
//   http_engine.rs     - remote model server (`/generate`)
//   echo_engine.rs     - offline identity engine

/// Tokenizer loading from the model directory
pub mod tokenizer_store;

/// Caller-owned language list
pub mod language_map;

/// Translator config persistence
pub mod config_store;

/// Seq2SeqEngine over HTTP
pub mod http_engine;

/// Seq2SeqEngine that echoes its prompt
pub mod echo_engine;
