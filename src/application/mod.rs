// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only: no metric math (Layer 5), no
// argument parsing or printing (Layer 1), no file formats
// (Layer 6).

// Generate-then-select translation service
pub mod translate_use_case;

// MBR over externally supplied candidates
pub mod rescore_use_case;
