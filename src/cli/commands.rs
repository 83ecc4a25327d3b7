// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands:
//   embedding — query/corpus/qrels + positive pairs + plan
//   causal-lm — instruction prompts + plan
//   stats     — counts only, writes nothing
//
// Every flag has a default matching the reference training runs,
// so `finetune-prep embedding` alone reproduces them.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{
    causal_lm_use_case::CausalLmConfig,
    embedding_use_case::EmbeddingConfig,
    plan::{CausalLmTrainingPlan, EmbeddingTrainingPlan},
};
use crate::data::splitter::{DEFAULT_EVAL_FRACTION, DEFAULT_SEED};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prepare retrieval data and positive pairs for embedding fine-tuning
    Embedding(EmbeddingArgs),

    /// Prepare instruction prompts for causal LM fine-tuning
    CausalLm(CausalLmArgs),

    /// Print dataset statistics without writing anything
    Stats(StatsArgs),
}

/// Input and split flags shared by both preparation commands.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// CSV file with `question` and `context` columns
    #[arg(long, default_value = "data/train.csv")]
    pub csv: PathBuf,

    /// Fraction held out for evaluation, strictly between 0 and 1
    #[arg(long, default_value_t = DEFAULT_EVAL_FRACTION)]
    pub eval_fraction: f64,

    /// Seed for the train/eval shuffle
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

#[derive(Args, Debug)]
pub struct EmbeddingArgs {
    #[command(flatten)]
    pub split: SplitArgs,

    /// Directory to write artifacts into
    #[arg(long, default_value = "prepared/embedding")]
    pub out_dir: PathBuf,

    /// Sentence-transformer checkpoint to fine-tune
    #[arg(long)]
    pub base_model: Option<String>,

    /// Short model name used in the run name
    #[arg(long)]
    pub model_alias: Option<String>,

    #[arg(long)]
    pub epochs: Option<usize>,

    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Embedding size the IR evaluator truncates to
    #[arg(long)]
    pub truncate_dim: Option<usize>,

    /// Continue from a saved trainer checkpoint
    #[arg(long)]
    pub resume_from_checkpoint: Option<String>,
}

/// The application layer never sees clap types.
impl From<EmbeddingArgs> for EmbeddingConfig {
    fn from(a: EmbeddingArgs) -> Self {
        let mut plan = EmbeddingTrainingPlan::default();

        if let Some(v) = a.base_model    { plan.base_model = v; }
        if let Some(v) = a.model_alias   { plan.model_alias = v; }
        if let Some(v) = a.epochs        { plan.num_train_epochs = v; }
        if let Some(v) = a.learning_rate { plan.learning_rate = v; }
        if let Some(v) = a.truncate_dim  { plan.truncate_dim = v; }
        plan.resume_from_checkpoint = a.resume_from_checkpoint;

        EmbeddingConfig {
            csv_path:      a.split.csv,
            out_dir:       a.out_dir,
            eval_fraction: a.split.eval_fraction,
            seed:          a.split.seed,
            plan,
        }
    }
}

#[derive(Args, Debug)]
pub struct CausalLmArgs {
    #[command(flatten)]
    pub split: SplitArgs,

    /// Directory to write artifacts into
    #[arg(long, default_value = "prepared/causal-lm")]
    pub out_dir: PathBuf,

    /// Causal LM checkpoint to fine-tune
    #[arg(long)]
    pub base_model: Option<String>,

    #[arg(long)]
    pub model_alias: Option<String>,

    #[arg(long)]
    pub max_steps: Option<usize>,

    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Prompt template with {question} and {context} placeholders
    #[arg(long)]
    pub prompt_template: Option<String>,

    /// Abort unless HF_API_TOKEN is set
    #[arg(long)]
    pub require_hf_token: bool,
}

impl From<CausalLmArgs> for CausalLmConfig {
    fn from(a: CausalLmArgs) -> Self {
        let mut plan = CausalLmTrainingPlan::default();

        if let Some(v) = a.base_model      { plan.base_model = v; }
        if let Some(v) = a.model_alias     { plan.model_alias = v; }
        if let Some(v) = a.max_steps       { plan.max_steps = v; }
        if let Some(v) = a.learning_rate   { plan.learning_rate = v; }
        if let Some(v) = a.prompt_template { plan.prompt_template = v; }

        CausalLmConfig {
            csv_path:         a.split.csv,
            out_dir:          a.out_dir,
            eval_fraction:    a.split.eval_fraction,
            seed:             a.split.seed,
            require_hf_token: a.require_hf_token,
            plan,
        }
    }
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// CSV file with `question` and `context` columns
    #[arg(long, default_value = "data/train.csv")]
    pub csv: PathBuf,
}
