// ============================================================
// Layer 4 — Causal LM Prompt Builder
// ============================================================
// Formats each row into an instruction-style prompt for causal
// language model fine-tuning. The default template is:
//
//   ### Câu hỏi: {question}
//    ### Trả lời: {context}
//
// ("Câu hỏi" = question, "Trả lời" = answer.) The leading space
// on the second line is part of the format.

use serde::{Deserialize, Serialize};

use crate::domain::error::{PrepareError, PrepareResult};
use crate::domain::row::{PromptSample, Row};

pub const QUESTION_PLACEHOLDER: &str = "{question}";
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

pub const DEFAULT_TEMPLATE: &str = "### Câu hỏi: {question}\n ### Trả lời: {context}";

/// A prompt template with `{question}` and `{context}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Build a template, rejecting one that drops either placeholder.
    pub fn new(template: impl Into<String>) -> PrepareResult<Self> {
        let template = template.into();

        for placeholder in [QUESTION_PLACEHOLDER, CONTEXT_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(PrepareError::invalid_plan(format!(
                    "prompt template is missing the {placeholder} placeholder"
                )));
            }
        }

        Ok(Self { template })
    }

    /// Substitute the row's question and context.
    ///
    /// Single pass over the template: placeholder-like text inside
    /// the substituted values is never expanded again.
    pub fn format(&self, row: &Row) -> String {
        let mut out = String::with_capacity(
            self.template.len() + row.question.len() + row.context.len(),
        );
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];

            if let Some(after) = tail.strip_prefix(QUESTION_PLACEHOLDER) {
                out.push_str(&row.question);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(CONTEXT_PLACEHOLDER) {
                out.push_str(&row.context);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }

        out.push_str(rest);
        out
    }

    /// Format every row, keeping its index for traceability.
    pub fn format_all<'a>(
        &self,
        rows: impl IntoIterator<Item = (usize, &'a Row)>,
    ) -> Vec<PromptSample> {
        rows.into_iter()
            .map(|(row, r)| PromptSample { row, text: self.format(r) })
            .collect()
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self { template: DEFAULT_TEMPLATE.to_string() }
    }
}
