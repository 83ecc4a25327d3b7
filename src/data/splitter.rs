// ============================================================
// Layer 4 — Train/Eval Splitter
// ============================================================
// Shuffles items with a seeded RNG and holds out a fraction of
// them for evaluation:
//   - Eval set:     scored by the IR evaluator during training
//   - Training set: turned into positive pairs for the loss
//
// Split policy:
//   eval_count = ceil(n * eval_fraction)
//   the first eval_count items of the shuffled order → eval
//   the rest                                        → train
//
// The RNG is StdRng::seed_from_u64(seed), so the same seed and
// the same input always give the same partition.
// Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::collections::HashSet;

use crate::domain::error::{PrepareError, PrepareResult};
use crate::domain::retrieval::RelevanceMapping;

pub const DEFAULT_EVAL_FRACTION: f64 = 0.1;
pub const DEFAULT_SEED: u64 = 42;

/// Shuffle `items` and split them into (eval, train).
///
/// # Errors
/// `InvalidFraction` if `eval_fraction` is not strictly inside
/// (0, 1), or if the training side would end up empty.
pub fn split_eval_train<T>(
    mut items:     Vec<T>,
    eval_fraction: f64,
    seed:          u64,
) -> PrepareResult<(Vec<T>, Vec<T>)> {
    let total      = items.len();
    let eval_count = eval_count(total, eval_fraction)?;

    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    // split_off(n) leaves [0..n) in `items` and returns [n..total)
    let train = items.split_off(eval_count);
    let eval  = items;

    tracing::debug!(
        "Dataset split: {} eval, {} train (seed {})",
        eval.len(),
        train.len(),
        seed
    );

    Ok((eval, train))
}

/// Partition a relevance mapping by query into (eval, train).
/// Each side keeps the full relevance set of each of its queries.
pub fn split(
    relevant_docs: &RelevanceMapping,
    eval_fraction: f64,
    seed:          u64,
) -> PrepareResult<(RelevanceMapping, RelevanceMapping)> {
    let query_ids: Vec<_> = relevant_docs.keys().copied().collect();
    let (eval_ids, _)     = split_eval_train(query_ids, eval_fraction, seed)?;
    let eval_ids: HashSet<_> = eval_ids.into_iter().collect();

    let (eval, train): (RelevanceMapping, RelevanceMapping) = relevant_docs
        .iter()
        .map(|(q, docs)| (*q, docs.clone()))
        .partition(|(q, _)| eval_ids.contains(q));

    Ok((eval, train))
}

/// How many items go to eval, after validating the fraction.
fn eval_count(total: usize, eval_fraction: f64) -> PrepareResult<usize> {
    // Written as a negated range check so NaN is rejected too
    if !(eval_fraction > 0.0 && eval_fraction < 1.0) {
        return Err(PrepareError::invalid_fraction(
            eval_fraction,
            "must lie strictly between 0 and 1",
        ));
    }

    let eval_count = ((total as f64) * eval_fraction).ceil() as usize;
    let eval_count = eval_count.min(total);

    if eval_count >= total {
        return Err(PrepareError::invalid_fraction(
            eval_fraction,
            format!("leaves no training items out of {total}"),
        ));
    }

    Ok(eval_count)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{CorpusId, QueryId};
    use std::collections::BTreeSet;

    fn mapping(n: usize) -> RelevanceMapping {
        (0..n)
            .map(|i| (QueryId(i), BTreeSet::from([CorpusId(i / 2)])))
            .collect()
    }

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (eval, train)     = split_eval_train(items, 0.2, 7).unwrap();
        assert_eq!(eval.len(),  20);
        assert_eq!(train.len(), 80);
    }

    #[test]
    fn test_eval_count_rounds_up() {
        // 15 * 0.1 = 1.5 → 2 eval items
        let items: Vec<usize> = (0..15).collect();
        let (eval, train)     = split_eval_train(items, 0.1, 7).unwrap();
        assert_eq!(eval.len(),  2);
        assert_eq!(train.len(), 13);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (eval, train)     = split_eval_train(items, 0.3, 1).unwrap();

        let mut all: Vec<usize> = eval.into_iter().chain(train).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split(&mapping(40), 0.25, 99).unwrap();
        let b = split(&mapping(40), 0.25, 99).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mapping_partition_is_complete_and_disjoint() {
        let full          = mapping(37);
        let (eval, train) = split(&full, 0.1, 3).unwrap();

        let eval_keys: BTreeSet<_>  = eval.keys().copied().collect();
        let train_keys: BTreeSet<_> = train.keys().copied().collect();
        assert!(eval_keys.is_disjoint(&train_keys));

        let union: BTreeSet<_> = eval_keys.union(&train_keys).copied().collect();
        let input: BTreeSet<_> = full.keys().copied().collect();
        assert_eq!(union, input);

        // Relevance sets travel unchanged with their query
        for (q, docs) in eval.iter().chain(train.iter()) {
            assert_eq!(&full[q], docs);
        }
    }

    #[test]
    fn test_fraction_out_of_range() {
        for f in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            let err = split(&mapping(10), f, 0).unwrap_err();
            assert!(matches!(err, PrepareError::InvalidFraction { .. }), "fraction {f}");
        }
    }

    #[test]
    fn test_fraction_leaving_no_training_queries() {
        // ceil(1 * 0.5) = 1 → the only query would go to eval
        let err = split(&mapping(1), 0.5, 0).unwrap_err();
        assert!(matches!(err, PrepareError::InvalidFraction { .. }));

        // ceil(3 * 0.9) = 3
        let err = split(&mapping(3), 0.9, 0).unwrap_err();
        assert!(matches!(err, PrepareError::InvalidFraction { .. }));
    }

    #[test]
    fn test_empty_mapping_is_degenerate() {
        let err = split(&RelevanceMapping::new(), 0.1, 0).unwrap_err();
        assert!(matches!(err, PrepareError::InvalidFraction { .. }));
    }
}
