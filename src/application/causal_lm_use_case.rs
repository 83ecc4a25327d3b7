// ============================================================
// Layer 2 — CausalLmUseCase
// ============================================================
// Prepares instruction prompts for causal LM fine-tuning:
//
//   Step 1: Check credentials (optional)   (Layer 6 - infra)
//   Step 2: Validate plan and template     (Layer 2 - plan)
//   Step 3: Load rows from CSV             (Layer 4 - data)
//   Step 4: Split rows into eval/train     (Layer 4 - data)
//   Step 5: Format prompts                 (Layer 4 - data)
//   Step 6: Write artifacts                (Layer 6 - infra)
//
// Unlike the embedding path, the split is over whole rows:
// a causal LM sees each (question, context) once as one prompt.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::plan::CausalLmTrainingPlan;
use crate::data::{
    dataset::PromptDataset,
    indexer::index,
    loader::CsvLoader,
    prompt::PromptTemplate,
    splitter::{split_eval_train, DEFAULT_EVAL_FRACTION, DEFAULT_SEED},
};
use crate::domain::traits::{ArtifactSink, RowSource};
use crate::infra::{export::ArtifactWriter, secrets::Secrets, stats::DatasetStats};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CausalLmConfig {
    pub csv_path:         PathBuf,
    pub out_dir:          PathBuf,
    pub eval_fraction:    f64,
    pub seed:             u64,
    /// Fail before loading anything if HF_API_TOKEN is unset
    pub require_hf_token: bool,
    pub plan:             CausalLmTrainingPlan,
}

impl Default for CausalLmConfig {
    fn default() -> Self {
        Self {
            csv_path:         PathBuf::from("data/train.csv"),
            out_dir:          PathBuf::from("prepared/causal-lm"),
            eval_fraction:    DEFAULT_EVAL_FRACTION,
            seed:             DEFAULT_SEED,
            require_hf_token: false,
            plan:             CausalLmTrainingPlan::default(),
        }
    }
}

pub struct PreparedCausalLm {
    pub train: PromptDataset,
    pub eval:  PromptDataset,
    pub plan:  serde_json::Value,
    pub stats: DatasetStats,
}

impl PreparedCausalLm {
    pub fn write(&self, sink: &impl ArtifactSink) -> Result<()> {
        sink.write_jsonl("train_prompts.jsonl", self.train.samples())?;
        sink.write_jsonl("eval_prompts.jsonl", self.eval.samples())?;
        sink.write_json("training_plan.json", &self.plan)?;
        sink.write_json("stats.json", &self.stats)?;
        Ok(())
    }
}

pub struct CausalLmUseCase {
    config: CausalLmConfig,
}

impl CausalLmUseCase {
    pub fn new(config: CausalLmConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, secrets: &Secrets, started_at: NaiveDateTime) -> Result<PreparedCausalLm> {
        let cfg = &self.config;

        let loader   = CsvLoader::new(&cfg.csv_path);
        let prepared = self.prepare(&loader, secrets, started_at)?;

        let writer = ArtifactWriter::new(&cfg.out_dir)
            .with_context(|| format!("Cannot create output directory '{}'", cfg.out_dir.display()))?;
        prepared.write(&writer)?;

        tracing::info!("Wrote causal LM artifacts to '{}'", cfg.out_dir.display());
        Ok(prepared)
    }

    pub fn prepare(
        &self,
        source:     &impl RowSource,
        secrets:    &Secrets,
        started_at: NaiveDateTime,
    ) -> Result<PreparedCausalLm> {
        let cfg = &self.config;

        // ── Step 1: Credentials ───────────────────────────────────────────────
        if cfg.require_hf_token {
            secrets
                .require_hf_token()
                .context("A Hugging Face token is needed to pull the base model")?;
        }

        // ── Step 2: Plan and template ─────────────────────────────────────────
        let plan     = cfg.plan.to_document(started_at, secrets)?;
        let template = PromptTemplate::new(cfg.plan.prompt_template.as_str())?;

        // ── Step 3: Load rows ─────────────────────────────────────────────────
        let rows = source
            .load_rows()
            .with_context(|| format!("Cannot load rows from '{}'", cfg.csv_path.display()))?;

        // ── Step 4: Split whole rows ──────────────────────────────────────────
        let numbered: Vec<_> = rows.iter().enumerate().collect();
        let (eval, train)    = split_eval_train(numbered, cfg.eval_fraction, cfg.seed)?;

        // ── Step 5: Prompts ───────────────────────────────────────────────────
        let train = template.format_all(train);
        let eval  = template.format_all(eval);

        // Corpus counts still describe the rows; the split is over prompts
        let stats = DatasetStats::from_index(&rows, &index(&rows))
            .with_split(eval.len(), train.len());
        stats.log();

        Ok(PreparedCausalLm {
            train: PromptDataset::new(train),
            eval:  PromptDataset::new(eval),
            plan,
            stats,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{error::PrepareError, row::Row};
    use burn::data::dataset::Dataset;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn started_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 3).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| Row::new(format!("q{i}"), format!("c{i}"))).collect()
    }

    #[test]
    fn test_every_row_becomes_one_prompt() {
        let use_case = CausalLmUseCase::new(CausalLmConfig::default());
        let prepared = use_case.prepare(&rows(30), &Secrets::default(), started_at()).unwrap();

        assert_eq!(prepared.eval.len(), 3);
        assert_eq!(prepared.train.len(), 27);
        assert_eq!((prepared.stats.eval_items, prepared.stats.train_items), (3, 27));

        let seen: BTreeSet<usize> = prepared
            .train
            .iter()
            .chain(prepared.eval.iter())
            .map(|s| s.row)
            .collect();
        assert_eq!(seen, (0..30).collect());
    }

    #[test]
    fn test_prompt_matches_its_row() {
        let use_case = CausalLmUseCase::new(CausalLmConfig::default());
        let prepared = use_case.prepare(&rows(10), &Secrets::default(), started_at()).unwrap();

        for sample in prepared.train.iter() {
            let expected = format!("### Câu hỏi: q{0}\n ### Trả lời: c{0}", sample.row);
            assert_eq!(sample.text, expected);
        }
    }

    #[test]
    fn test_required_token_checked_first() {
        let config   = CausalLmConfig { require_hf_token: true, ..Default::default() };
        let use_case = CausalLmUseCase::new(config);

        let err = use_case.prepare(&rows(10), &Secrets::default(), started_at()).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<PrepareError>(),
            Some(PrepareError::MissingSecret { .. })
        ));

        let secrets = Secrets::new(None, Some("hf_x".into()));
        assert!(use_case.prepare(&rows(10), &secrets, started_at()).is_ok());
    }

    #[test]
    fn test_bad_template_rejected() {
        let mut config = CausalLmConfig::default();
        config.plan.prompt_template = "no placeholders".into();

        let err = CausalLmUseCase::new(config)
            .prepare(&rows(10), &Secrets::default(), started_at())
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<PrepareError>(),
            Some(PrepareError::InvalidPlan { .. })
        ));
    }

    #[test]
    fn test_execute_writes_prompts() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let csv = tmp.path().join("train.csv");
        std::fs::write(&csv, "question,context\nq0,c0\nq1,c1\nq2,c2\n")?;

        let config = CausalLmConfig {
            csv_path:      csv,
            out_dir:       tmp.path().join("out"),
            eval_fraction: 0.3,
            ..Default::default()
        };
        CausalLmUseCase::new(config).execute(&Secrets::default(), started_at())?;

        let out   = tmp.path().join("out");
        let train = std::fs::read_to_string(out.join("train_prompts.jsonl"))?;
        let eval  = std::fs::read_to_string(out.join("eval_prompts.jsonl"))?;
        assert_eq!(train.lines().count(), 2);
        assert_eq!(eval.lines().count(), 1);
        assert!(out.join("training_plan.json").exists());
        Ok(())
    }
}
