// ============================================================
// Layer 4 — Positive Pair Materializer
// ============================================================
// Expands a relevance mapping into flat (anchor, positive) pairs:
//
//   for each query id (numeric order)
//     for each relevant corpus id (numeric order)
//       emit (queries[q], corpus[c])
//
// No shuffling happens here; the trainer's batch sampler owns
// that. Same input, same order.

use crate::domain::error::{PrepareError, PrepareResult};
use crate::domain::retrieval::{Corpus, Queries, RelevanceMapping};
use crate::domain::row::TrainingPair;

/// Emit one positive pair per query → passage edge in `mapping`.
///
/// # Errors
/// `UnknownId` if the mapping references a query or passage that
/// is not present in `queries` / `corpus`.
pub fn materialize(
    queries: &Queries,
    corpus:  &Corpus,
    mapping: &RelevanceMapping,
) -> PrepareResult<Vec<TrainingPair>> {
    let mut pairs = Vec::with_capacity(mapping.len());

    for (query_id, corpus_ids) in mapping {
        let question = queries
            .get(query_id)
            .ok_or_else(|| PrepareError::UnknownId { id: query_id.to_string() })?;

        for corpus_id in corpus_ids {
            let context = corpus
                .get(corpus_id)
                .ok_or_else(|| PrepareError::UnknownId { id: corpus_id.to_string() })?;

            pairs.push(TrainingPair::new(question.as_str(), context.as_str()));
        }
    }

    Ok(pairs)
}
