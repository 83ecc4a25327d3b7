// ============================================================
// Layer 3 — Retrieval Structures
// ============================================================
// The three mappings an information-retrieval evaluator expects:
//
//   queries       : QueryId  → question text
//   corpus        : CorpusId → context text
//   relevant_docs : QueryId  → { CorpusId }
//
// BTreeMap / BTreeSet keep iteration order numeric, so anything
// derived from these structures (pairs, JSON files) is stable
// from run to run.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::ids::{CorpusId, QueryId};

pub type Queries = BTreeMap<QueryId, String>;
pub type Corpus = BTreeMap<CorpusId, String>;

/// Ground-truth association from each query to the passages that
/// answer it. Always a set, even though each CSV row contributes
/// a single edge, so evaluators that expect several relevant
/// passages per query can consume it unchanged.
pub type RelevanceMapping = BTreeMap<QueryId, BTreeSet<CorpusId>>;

/// Everything `index` produces from a sequence of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalIndex {
    pub queries:       Queries,
    pub corpus:        Corpus,
    pub relevant_docs: RelevanceMapping,
}

impl RetrievalIndex {
    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    pub fn corpus_count(&self) -> usize {
        self.corpus.len()
    }
}
