// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the data and infra layers for one goal each.
// No parsing, splitting, or file formats are implemented here;
// only the order of steps and the configuration they run with.

// Hyperparameter plans for the external trainers
pub mod plan;

// Query/corpus/qrels + positive pairs for embedding fine-tuning
pub mod embedding_use_case;

// Instruction prompts for causal LM fine-tuning
pub mod causal_lm_use_case;

// Read-only dataset inspection
pub mod stats_use_case;
