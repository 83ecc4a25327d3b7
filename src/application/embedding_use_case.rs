// ============================================================
// Layer 2 — EmbeddingUseCase
// ============================================================
// Prepares everything a sentence-embedding fine-tune needs:
//
//   Step 1: Validate the training plan      (Layer 2 - plan)
//   Step 2: Load rows from CSV              (Layer 4 - data)
//   Step 3: Index queries / corpus / qrels  (Layer 4 - data)
//   Step 4: Split queries into eval/train   (Layer 4 - data)
//   Step 5: Materialize positive pairs      (Layer 4 - data)
//   Step 6: Compute statistics              (Layer 6 - infra)
//   Step 7: Write artifacts                 (Layer 6 - infra)
//
// Steps 1–6 happen in memory; nothing touches the output
// directory until all of them have succeeded.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::plan::EmbeddingTrainingPlan;
use crate::data::{
    dataset::PairDataset,
    indexer::index,
    loader::CsvLoader,
    pairs::materialize,
    splitter::{split, DEFAULT_EVAL_FRACTION, DEFAULT_SEED},
};
use crate::domain::{
    retrieval::{RelevanceMapping, RetrievalIndex},
    traits::{ArtifactSink, RowSource},
};
use crate::infra::{export::ArtifactWriter, secrets::Secrets, stats::DatasetStats};

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub csv_path:      PathBuf,
    pub out_dir:       PathBuf,
    pub eval_fraction: f64,
    pub seed:          u64,
    pub plan:          EmbeddingTrainingPlan,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            csv_path:      PathBuf::from("data/train.csv"),
            out_dir:       PathBuf::from("prepared/embedding"),
            eval_fraction: DEFAULT_EVAL_FRACTION,
            seed:          DEFAULT_SEED,
            plan:          EmbeddingTrainingPlan::default(),
        }
    }
}

// ─── Result of a preparation run ─────────────────────────────────────────────
pub struct PreparedEmbedding {
    pub index:       RetrievalIndex,
    pub eval_docs:   RelevanceMapping,
    pub train_docs:  RelevanceMapping,
    pub train_pairs: PairDataset,
    pub eval_pairs:  PairDataset,
    pub plan:        serde_json::Value,
    pub stats:       DatasetStats,
}

impl PreparedEmbedding {
    /// Write every artifact into `sink`.
    pub fn write(&self, sink: &impl ArtifactSink) -> Result<()> {
        sink.write_json("queries.json", &self.index.queries)?;
        sink.write_json("corpus.json", &self.index.corpus)?;
        sink.write_json("relevant_docs.json", &self.index.relevant_docs)?;
        sink.write_json("relevant_docs.eval.json", &self.eval_docs)?;
        sink.write_json("relevant_docs.train.json", &self.train_docs)?;
        sink.write_jsonl("train_pairs.jsonl", self.train_pairs.pairs())?;
        sink.write_jsonl("eval_pairs.jsonl", self.eval_pairs.pairs())?;
        sink.write_json("training_plan.json", &self.plan)?;
        sink.write_json("stats.json", &self.stats)?;
        Ok(())
    }
}

// ─── EmbeddingUseCase ────────────────────────────────────────────────────────
pub struct EmbeddingUseCase {
    config: EmbeddingConfig,
}

impl EmbeddingUseCase {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }

    /// Load from the configured CSV and write to the configured directory.
    pub fn execute(&self, secrets: &Secrets, started_at: NaiveDateTime) -> Result<PreparedEmbedding> {
        let cfg = &self.config;

        let loader   = CsvLoader::new(&cfg.csv_path);
        let prepared = self.prepare(&loader, secrets, started_at)?;

        let writer = ArtifactWriter::new(&cfg.out_dir)
            .with_context(|| format!("Cannot create output directory '{}'", cfg.out_dir.display()))?;
        prepared.write(&writer)?;

        tracing::info!("Wrote embedding artifacts to '{}'", cfg.out_dir.display());
        Ok(prepared)
    }

    /// Steps 1–6: build everything in memory.
    pub fn prepare(
        &self,
        source:     &impl RowSource,
        secrets:    &Secrets,
        started_at: NaiveDateTime,
    ) -> Result<PreparedEmbedding> {
        let cfg = &self.config;

        // ── Step 1: Validate the plan ─────────────────────────────────────────
        let plan = cfg.plan.to_document(started_at, secrets)?;

        // ── Step 2: Load rows ─────────────────────────────────────────────────
        let rows = source
            .load_rows()
            .with_context(|| format!("Cannot load rows from '{}'", cfg.csv_path.display()))?;

        // ── Step 3: Index ─────────────────────────────────────────────────────
        let idx = index(&rows);

        // ── Step 4: Split by query ────────────────────────────────────────────
        let (eval_docs, train_docs) = split(&idx.relevant_docs, cfg.eval_fraction, cfg.seed)?;

        // ── Step 5: Positive pairs ────────────────────────────────────────────
        let train_pairs = materialize(&idx.queries, &idx.corpus, &train_docs)?;
        let eval_pairs  = materialize(&idx.queries, &idx.corpus, &eval_docs)?;

        // ── Step 6: Statistics ────────────────────────────────────────────────
        let stats = DatasetStats::from_index(&rows, &idx)
            .with_split(eval_docs.len(), train_docs.len());
        stats.log();

        Ok(PreparedEmbedding {
            index:       idx,
            eval_docs,
            train_docs,
            train_pairs: PairDataset::new(train_pairs),
            eval_pairs:  PairDataset::new(eval_pairs),
            plan,
            stats,
        })
    }
}
