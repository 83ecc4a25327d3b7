// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw CSV and the structures handed to
// an external trainer.
//
//   data/train.csv
//       │
//       ▼
//   CsvLoader         → ordered Vec<Row>
//       │
//       ├──────────────────────────────┐
//       ▼                              ▼
//   index()           → queries,   PromptTemplate → prompts
//                       corpus,        │
//                       relevant_docs  ▼
//       │                          split_eval_train()
//       ▼                              │
//   split()           → eval / train   ▼
//       │                          PromptDataset
//       ▼
//   materialize()     → (anchor, positive) pairs
//       │
//       ▼
//   PairDataset       → implements Burn's Dataset trait
//
// Each step is a plain function or small struct so it can be
// tested on its own.

/// Reads (question, context) rows from CSV
pub mod loader;

/// Builds queries / corpus / relevant_docs from rows
pub mod indexer;

/// Seeded train/eval splits
pub mod splitter;

/// Expands a relevance mapping into positive pairs
pub mod pairs;

/// Causal LM prompt formatting
pub mod prompt;

/// Burn Dataset implementations
pub mod dataset;
