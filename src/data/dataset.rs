use burn::data::dataset::Dataset;

use crate::domain::row::{PromptSample, TrainingPair};

/// Positive pairs for a contrastive ranking loss, in materialized order.
pub struct PairDataset {
    pairs: Vec<TrainingPair>,
}

impl PairDataset {
    pub fn new(pairs: Vec<TrainingPair>) -> Self { Self { pairs } }

    pub fn pairs(&self) -> &[TrainingPair] { &self.pairs }
}

impl Dataset<TrainingPair> for PairDataset {
    fn get(&self, index: usize) -> Option<TrainingPair> {
        self.pairs.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Formatted causal LM prompts.
pub struct PromptDataset {
    samples: Vec<PromptSample>,
}

impl PromptDataset {
    pub fn new(samples: Vec<PromptSample>) -> Self { Self { samples } }

    pub fn samples(&self) -> &[PromptSample] { &self.samples }
}

impl Dataset<PromptSample> for PromptDataset {
    fn get(&self, index: usize) -> Option<PromptSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_dataset_indexing() {
        let ds = PairDataset::new(vec![TrainingPair::new("q", "c")]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.get(0), Some(TrainingPair::new("q", "c")));
        assert_eq!(ds.get(1), None);
    }

    #[test]
    fn test_prompt_dataset_iterates_in_order() {
        let ds = PromptDataset::new(vec![
            PromptSample { row: 3, text: "a".into() },
            PromptSample { row: 1, text: "b".into() },
        ]);
        let rows: Vec<usize> = ds.iter().map(|s| s.row).collect();
        assert_eq!(rows, vec![3, 1]);
    }
}
