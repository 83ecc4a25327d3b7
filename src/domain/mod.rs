// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums, and traits describing the data this
// tool prepares. No file I/O and no Burn types live here.

// Typed `train-<n>` identifiers for queries and corpus passages
pub mod ids;

// Row, TrainingPair, PromptSample
pub mod row;

// queries / corpus / relevant_docs mappings
pub mod retrieval;

// PrepareError taxonomy
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
