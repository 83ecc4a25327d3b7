// ============================================================
// Layer 4 — Retrieval Indexer
// ============================================================
// Turns a flat list of rows into the queries / corpus /
// relevant_docs structures an IR evaluator expects.
//
//   rows:   [("Q1","C1"), ("Q2","C1"), ("Q3","C2")]
//
//   queries:       train-0 → Q1, train-1 → Q2, train-2 → Q3
//   corpus:        train-0 → C1, train-1 → C2
//   relevant_docs: train-0 → {train-0}
//                  train-1 → {train-0}
//                  train-2 → {train-1}
//
// Contexts are content-addressed by exact string equality.
// Questions are NOT: every row mints a fresh query id even when
// the question text repeats, so query ids always equal row
// numbers. `repeated_questions` reports how often that happens.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::ids::{CorpusId, QueryId};
use crate::domain::retrieval::RetrievalIndex;
use crate::domain::row::Row;

/// Build the retrieval index. Pure and deterministic: the same
/// rows always give the same ids.
pub fn index(rows: &[Row]) -> RetrievalIndex {
    let mut out = RetrievalIndex::default();

    // context text → corpus id already minted for it
    let mut seen_contexts: HashMap<&str, CorpusId> = HashMap::new();

    for (i, row) in rows.iter().enumerate() {
        let query_id = QueryId(i);

        let next_corpus_id = CorpusId(seen_contexts.len());
        let corpus_id = *seen_contexts
            .entry(row.context.as_str())
            .or_insert(next_corpus_id);

        if corpus_id == next_corpus_id {
            out.corpus.insert(corpus_id, row.context.clone());
        }

        out.queries.insert(query_id, row.question.clone());
        out.relevant_docs
            .entry(query_id)
            .or_insert_with(BTreeSet::new)
            .insert(corpus_id);
    }

    tracing::debug!(
        "Indexed {} rows into {} queries and {} corpus entries",
        rows.len(),
        out.queries.len(),
        out.corpus.len()
    );

    out
}

/// Number of rows whose question text already appeared on an
/// earlier row (and therefore got a second query id).
pub fn repeated_questions(rows: &[Row]) -> usize {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|r| !seen.insert(r.question.as_str()))
        .count()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<Row> {
        vec![Row::new("Q1", "C1"), Row::new("Q2", "C1"), Row::new("Q3", "C2")]
    }

    #[test]
    fn test_shared_context_gets_one_corpus_id() {
        let idx = index(&sample_rows());

        assert_eq!(idx.query_count(), 3);
        assert_eq!(idx.corpus_count(), 2);
        assert_eq!(idx.corpus[&CorpusId(0)], "C1");
        assert_eq!(idx.corpus[&CorpusId(1)], "C2");

        let expected = [
            (QueryId(0), CorpusId(0)),
            (QueryId(1), CorpusId(0)),
            (QueryId(2), CorpusId(1)),
        ];
        for (q, c) in expected {
            assert_eq!(idx.relevant_docs[&q], BTreeSet::from([c]));
        }
    }

    #[test]
    fn test_repeated_question_gets_fresh_query_id() {
        let rows = vec![Row::new("Q", "C1"), Row::new("Q", "C2")];
        let idx  = index(&rows);

        assert_eq!(idx.query_count(), 2);
        assert_eq!(idx.queries[&QueryId(0)], "Q");
        assert_eq!(idx.queries[&QueryId(1)], "Q");
        assert_eq!(repeated_questions(&rows), 1);
    }

    #[test]
    fn test_counts_bound_by_rows() {
        let rows: Vec<Row> = (0..50)
            .map(|i| Row::new(format!("q{i}"), format!("c{}", i % 7)))
            .collect();
        let idx = index(&rows);

        assert_eq!(idx.query_count(), rows.len());
        assert_eq!(idx.corpus_count(), 7);
        assert!(idx.relevant_docs.values().all(|s| s.len() == 1));
    }

    #[test]
    fn test_all_distinct_contexts_give_one_entry_per_row() {
        let rows: Vec<Row> = (0..10)
            .map(|i| Row::new("same question", format!("c{i}")))
            .collect();
        assert_eq!(index(&rows).corpus_count(), rows.len());
    }

    #[test]
    fn test_index_is_deterministic() {
        let rows = sample_rows();
        assert_eq!(index(&rows), index(&rows));
    }

    #[test]
    fn test_contexts_compared_exactly() {
        // Whitespace and case differences are distinct passages
        let rows = vec![Row::new("a", "C1"), Row::new("b", "C1 "), Row::new("c", "c1")];
        assert_eq!(index(&rows).corpus_count(), 3);
    }
}
