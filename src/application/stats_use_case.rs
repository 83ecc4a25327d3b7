// ============================================================
// Layer 2 — StatsUseCase
// ============================================================
// Loads and indexes a CSV without splitting or writing anything,
// so a dataset can be inspected before a real preparation run.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::{indexer::index, loader::CsvLoader};
use crate::domain::traits::RowSource;
use crate::infra::stats::DatasetStats;

pub struct StatsUseCase {
    csv_path: PathBuf,
}

impl StatsUseCase {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self { csv_path: csv_path.into() }
    }

    pub fn execute(&self) -> Result<DatasetStats> {
        let loader = CsvLoader::new(&self.csv_path);
        self.inspect(&loader)
    }

    pub fn inspect(&self, source: &impl RowSource) -> Result<DatasetStats> {
        let rows = source
            .load_rows()
            .with_context(|| format!("Cannot load rows from '{}'", self.csv_path.display()))?;

        let stats = DatasetStats::from_index(&rows, &index(&rows));
        stats.log();
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::row::Row;

    #[test]
    fn test_inspect_counts_duplicates() {
        let rows  = vec![Row::new("Q1", "C1"), Row::new("Q2", "C1"), Row::new("Q3", "C2")];
        let stats = StatsUseCase::new("unused.csv").inspect(&rows).unwrap();

        assert_eq!(stats.queries, 3);
        assert_eq!(stats.corpus_entries, 2);
        assert_eq!(stats.duplicate_contexts, 1);
        assert_eq!(stats.train_items + stats.eval_items, 0);
    }
}
