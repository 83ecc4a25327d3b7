// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
// Secrets and the run start time are resolved by main() and
// passed in, so the use cases never read global state.

pub mod commands;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Parser;
use commands::{CausalLmArgs, Commands, EmbeddingArgs, StatsArgs};

use crate::infra::secrets::Secrets;

#[derive(Parser, Debug)]
#[command(
    name = "finetune-prep",
    version,
    about = "Prepare legal Q&A data and training plans for embedding and causal LM fine-tuning."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self, secrets: &Secrets, started_at: NaiveDateTime) -> Result<()> {
        match self.command {
            Commands::Embedding(args) => run_embedding(args, secrets, started_at),
            Commands::CausalLm(args)  => run_causal_lm(args, secrets, started_at),
            Commands::Stats(args)     => run_stats(args),
        }
    }
}

fn run_embedding(args: EmbeddingArgs, secrets: &Secrets, started_at: NaiveDateTime) -> Result<()> {
    use crate::application::embedding_use_case::EmbeddingUseCase;

    tracing::info!("Preparing embedding dataset from '{}'", args.split.csv.display());

    let use_case = EmbeddingUseCase::new(args.into());
    let prepared = use_case.execute(secrets, started_at)?;

    println!(
        "Prepared {} train pairs and {} eval queries over {} corpus entries.",
        prepared.train_pairs.pairs().len(),
        prepared.eval_docs.len(),
        prepared.index.corpus_count(),
    );
    Ok(())
}

fn run_causal_lm(args: CausalLmArgs, secrets: &Secrets, started_at: NaiveDateTime) -> Result<()> {
    use crate::application::causal_lm_use_case::CausalLmUseCase;

    tracing::info!("Preparing causal LM prompts from '{}'", args.split.csv.display());

    let use_case = CausalLmUseCase::new(args.into());
    let prepared = use_case.execute(secrets, started_at)?;

    println!(
        "Prepared {} train prompts and {} eval prompts.",
        prepared.train.samples().len(),
        prepared.eval.samples().len(),
    );
    Ok(())
}

fn run_stats(args: StatsArgs) -> Result<()> {
    use crate::application::stats_use_case::StatsUseCase;

    let stats = StatsUseCase::new(args.csv).execute()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
