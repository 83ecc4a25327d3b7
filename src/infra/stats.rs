// ============================================================
// Layer 6 — Dataset Statistics
// ============================================================
// Summary counts for one prepared dataset, logged at info level
// and saved as stats.json next to the other artifacts.
//
// Example stats.json:
//   {
//     "rows": 2000,
//     "queries": 2000,
//     "corpus_entries": 1212,
//     "duplicate_contexts": 788,
//     "repeated_questions": 14,
//     "eval_items": 200,
//     "train_items": 1800
//   }
//
// How to read it:
//   - queries always equals rows (one query id per row)
//   - duplicate_contexts = rows - corpus_entries
//   - repeated_questions > 0 means the same question text holds
//     several query ids, each with its own relevant passage
//   - eval_items / train_items count whatever the split ran over:
//     query ids for the embedding dataset, whole rows (one prompt
//     each) for the causal LM dataset. Both are 0 for `stats`.

use serde::{Deserialize, Serialize};

use crate::data::indexer::repeated_questions;
use crate::domain::retrieval::RetrievalIndex;
use crate::domain::row::Row;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub rows:               usize,
    pub queries:            usize,
    pub corpus_entries:     usize,
    pub duplicate_contexts: usize,
    pub repeated_questions: usize,
    pub eval_items:         usize,
    pub train_items:        usize,
}

impl DatasetStats {
    /// Counts derived from the rows and their retrieval index.
    pub fn from_index(rows: &[Row], index: &RetrievalIndex) -> Self {
        Self {
            rows:               rows.len(),
            queries:            index.query_count(),
            corpus_entries:     index.corpus_count(),
            duplicate_contexts: rows.len().saturating_sub(index.corpus_count()),
            repeated_questions: repeated_questions(rows),
            eval_items:         0,
            train_items:        0,
        }
    }

    /// Record the sizes of a train/eval split.
    pub fn with_split(mut self, eval: usize, train: usize) -> Self {
        self.eval_items  = eval;
        self.train_items = train;
        self
    }

    /// Fraction of rows whose context was already in the corpus.
    pub fn dedup_ratio(&self) -> f64 {
        if self.rows == 0 {
            return 0.0;
        }
        self.duplicate_contexts as f64 / self.rows as f64
    }

    pub fn log(&self) {
        tracing::info!(
            "Rows: {} | Queries: {} | Corpus entries: {} ({:.1}% duplicate contexts)",
            self.rows,
            self.queries,
            self.corpus_entries,
            self.dedup_ratio() * 100.0,
        );

        if self.eval_items + self.train_items > 0 {
            tracing::info!(
                "Split: {} eval, {} train",
                self.eval_items,
                self.train_items,
            );
        }

        if self.repeated_questions > 0 {
            tracing::warn!(
                "{} rows repeat an earlier question; each keeps its own query id",
                self.repeated_questions
            );
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::indexer::index;

    #[test]
    fn test_counts_from_index() {
        let rows = vec![
            Row::new("Q1", "C1"),
            Row::new("Q2", "C1"),
            Row::new("Q1", "C2"),
        ];
        let stats = DatasetStats::from_index(&rows, &index(&rows)).with_split(1, 2);

        assert_eq!(stats.rows, 3);
        assert_eq!(stats.queries, 3);
        assert_eq!(stats.corpus_entries, 2);
        assert_eq!(stats.duplicate_contexts, 1);
        assert_eq!(stats.repeated_questions, 1);
        assert_eq!((stats.eval_items, stats.train_items), (1, 2));
    }

    #[test]
    fn test_dedup_ratio() {
        let stats = DatasetStats { rows: 4, duplicate_contexts: 1, ..Default::default() };
        assert!((stats.dedup_ratio() - 0.25).abs() < 1e-12);
        assert_eq!(DatasetStats::default().dedup_ratio(), 0.0);
    }
}
