// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the use cases:
//
//   export.rs  — Artifact writer
//                Writes queries / corpus / relevance mappings,
//                positive pairs, prompts, and the training plan
//                as JSON and JSONL files.
//
//   secrets.rs — Platform credentials
//                W&B and Hugging Face tokens, read once from the
//                environment at startup and redacted in Debug.
//
//   stats.rs   — Dataset statistics
//                Row / query / corpus counts, dedup ratio, and
//                split sizes; logged and saved as stats.json.

/// JSON / JSONL artifact writer
pub mod export;

/// Environment-provided API credentials
pub mod secrets;

/// Dataset summary counts
pub mod stats;
