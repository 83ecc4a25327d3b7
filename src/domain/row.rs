// ============================================================
// Layer 3 — Row and TrainingPair Domain Types
// ============================================================
// A Row is one record of the source CSV: a legal question and
// the passage that answers it.
//
// A TrainingPair is what a contrastive ranking loss consumes:
// the question as the anchor, its relevant passage as the
// positive. Every other passage in the same batch acts as an
// implicit negative, so no explicit negatives are stored.

use serde::{Deserialize, Serialize};

/// One (question, context) record from the input file.
/// Rows carry no uniqueness constraint — the same question or
/// the same context may appear on many rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// The natural language question
    pub question: String,

    /// The legal passage that answers it
    pub context: String,
}

impl Row {
    pub fn new(question: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context:  context.into(),
        }
    }
}

/// A positive (anchor, positive) pair for contrastive training.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrainingPair {
    /// Question text
    pub anchor: String,

    /// Context text relevant to the anchor
    pub positive: String,
}

impl TrainingPair {
    pub fn new(anchor: impl Into<String>, positive: impl Into<String>) -> Self {
        Self {
            anchor:   anchor.into(),
            positive: positive.into(),
        }
    }
}

/// One instruction-formatted prompt for causal LM fine-tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSample {
    /// 0-based index of the source row, kept for traceability
    pub row: usize,

    /// The fully formatted prompt text
    pub text: String,
}
