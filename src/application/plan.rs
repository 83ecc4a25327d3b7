// ============================================================
// Layer 2 — Training Plans
// ============================================================
// Hyperparameters handed to the external trainer, saved as
// training_plan.json next to the prepared data. This crate never
// runs training itself; the plan records exactly how the trainer
// should be configured so a run can be reproduced.
//
// Two plans:
//   EmbeddingTrainingPlan — sentence-embedding fine-tune with a
//                           Matryoshka-wrapped ranking loss and an
//                           IR evaluator on the eval queries
//   CausalLmTrainingPlan  — 4-bit LoRA fine-tune of a causal LM
//                           on instruction prompts
//
// Derived names:
//   run_name = <model_alias>-<project>
//   run_id   = <run_name>-YYYY-MM-DD-HH-MM   (start time)
//   output   = ./<run_name>

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::error::{PrepareError, PrepareResult};
use crate::infra::secrets::Secrets;

const RUN_ID_FORMAT: &str = "%Y-%m-%d-%H-%M";

fn run_name(model_alias: &str, project: &str) -> String {
    format!("{model_alias}-{project}")
}

fn run_id(run_name: &str, started_at: NaiveDateTime) -> String {
    format!("{run_name}-{}", started_at.format(RUN_ID_FORMAT))
}

fn report_to(secrets: &Secrets) -> &'static str {
    if secrets.has_wandb() { "wandb" } else { "none" }
}

fn ensure(condition: bool, reason: impl FnOnce() -> String) -> PrepareResult<()> {
    if condition { Ok(()) } else { Err(PrepareError::invalid_plan(reason())) }
}

/// Names computed from a plan at the moment a run is prepared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_name:   String,
    pub run_id:     String,
    pub output_dir: String,
    pub report_to:  String,
}

impl RunInfo {
    fn new(model_alias: &str, project: &str, started_at: NaiveDateTime, secrets: &Secrets) -> Self {
        let run_name = run_name(model_alias, project);
        Self {
            run_id:     run_id(&run_name, started_at),
            output_dir: format!("./{run_name}"),
            report_to:  report_to(secrets).to_string(),
            run_name,
        }
    }
}

// ─── Embedding plan ──────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingTrainingPlan {
    pub base_model:                  String,
    pub model_alias:                 String,
    pub project:                     String,
    pub num_train_epochs:            usize,
    pub bf16:                        bool,
    pub per_device_train_batch_size: usize,
    pub per_device_eval_batch_size:  usize,
    pub gradient_accumulation_steps: usize,
    pub warmup_ratio:                f64,
    pub learning_rate:               f64,
    pub lr_scheduler_type:           String,
    pub optim:                       String,
    /// `no_duplicates` keeps two copies of one passage out of a
    /// batch, where they would count as each other's negatives
    pub batch_sampler:               String,
    pub eval_strategy:               String,
    pub inner_loss:                  String,
    pub matryoshka_dims:             Vec<usize>,
    /// Embedding size the IR evaluator truncates to
    pub truncate_dim:                usize,
    pub score_function:              String,
    pub load_best_model_at_end:      bool,
    pub logging_steps:               usize,
    pub save_steps:                  usize,
    pub save_total_limit:            usize,
    pub resume_from_checkpoint:      Option<String>,
}

impl Default for EmbeddingTrainingPlan {
    fn default() -> Self {
        Self {
            base_model:                  "hiieu/halong_embedding".to_string(),
            model_alias:                 "halong_embedding".to_string(),
            project:                     "legal-document-finetune".to_string(),
            num_train_epochs:            5,
            bf16:                        true,
            per_device_train_batch_size: 4,
            per_device_eval_batch_size:  4,
            gradient_accumulation_steps: 4,
            warmup_ratio:                0.1,
            learning_rate:               3e-5,
            lr_scheduler_type:           "cosine".to_string(),
            optim:                       "adamw_torch_fused".to_string(),
            batch_sampler:               "no_duplicates".to_string(),
            eval_strategy:               "steps".to_string(),
            inner_loss:                  "MultipleNegativesRankingLoss".to_string(),
            matryoshka_dims:             vec![768, 512, 256, 128],
            truncate_dim:                128,
            score_function:              "cosine".to_string(),
            load_best_model_at_end:      true,
            logging_steps:               197 * 2,
            save_steps:                  394 * 2,
            save_total_limit:            100,
            resume_from_checkpoint:      None,
        }
    }
}

impl EmbeddingTrainingPlan {
    /// IR evaluator name, e.g. `dim_128`
    pub fn evaluator_name(&self) -> String {
        format!("dim_{}", self.truncate_dim)
    }

    /// Checkpoint selection metric, e.g. `eval_dim_128_cosine_accuracy@3`
    pub fn metric_for_best_model(&self) -> String {
        format!("eval_{}_{}_accuracy@3", self.evaluator_name(), self.score_function)
    }

    pub fn validate(&self) -> PrepareResult<()> {
        ensure(!self.base_model.trim().is_empty(), || "base_model is empty".into())?;
        ensure(self.num_train_epochs > 0, || "num_train_epochs must be > 0".into())?;
        ensure(
            self.per_device_train_batch_size > 0 && self.per_device_eval_batch_size > 0,
            || "batch sizes must be > 0".into(),
        )?;
        ensure(self.gradient_accumulation_steps > 0, || {
            "gradient_accumulation_steps must be > 0".into()
        })?;
        ensure(self.learning_rate > 0.0 && self.learning_rate.is_finite(), || {
            format!("learning_rate must be positive, got {}", self.learning_rate)
        })?;
        ensure((0.0..1.0).contains(&self.warmup_ratio), || {
            format!("warmup_ratio must be in [0, 1), got {}", self.warmup_ratio)
        })?;
        ensure(!self.matryoshka_dims.is_empty(), || "matryoshka_dims is empty".into())?;
        ensure(self.matryoshka_dims.iter().all(|&d| d > 0), || {
            "matryoshka_dims must all be > 0".into()
        })?;
        ensure(self.matryoshka_dims.contains(&self.truncate_dim), || {
            format!(
                "truncate_dim {} is not one of the matryoshka_dims {:?}",
                self.truncate_dim, self.matryoshka_dims
            )
        })?;
        ensure(self.logging_steps > 0 && self.save_steps > 0, || {
            "logging_steps and save_steps must be > 0".into()
        })?;
        Ok(())
    }

    /// The JSON document written as training_plan.json.
    pub fn to_document(
        &self,
        started_at: NaiveDateTime,
        secrets:    &Secrets,
    ) -> PrepareResult<serde_json::Value> {
        self.validate()?;

        let doc = EmbeddingPlanDocument {
            run:                   RunInfo::new(&self.model_alias, &self.project, started_at, secrets),
            evaluator_name:        self.evaluator_name(),
            metric_for_best_model: self.metric_for_best_model(),
            plan:                  self,
        };
        Ok(serde_json::to_value(doc)?)
    }
}

#[derive(Serialize)]
struct EmbeddingPlanDocument<'a> {
    #[serde(flatten)]
    run:                   RunInfo,
    evaluator_name:        String,
    metric_for_best_model: String,
    #[serde(flatten)]
    plan:                  &'a EmbeddingTrainingPlan,
}

// ─── Causal LM plan ──────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoraSettings {
    pub r:               usize,
    pub lora_alpha:      usize,
    pub lora_dropout:    f64,
    pub bias:            String,
    pub target_modules:  Vec<String>,
    pub modules_to_save: Vec<String>,
}

impl Default for LoraSettings {
    fn default() -> Self {
        fn names(xs: &[&str]) -> Vec<String> {
            xs.iter().map(|s| s.to_string()).collect()
        }

        Self {
            r:               8,
            lora_alpha:      32,
            lora_dropout:    0.05,
            bias:            "none".to_string(),
            target_modules:  names(&[
                "q_proj", "v_proj", "k_proj", "o_proj", "gate_proj", "down_proj", "up_proj",
            ]),
            modules_to_save: names(&["embed_tokens", "lm_head"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizationSettings {
    pub load_in_4bit:  bool,
    pub double_quant:  bool,
    pub quant_type:    String,
    pub compute_dtype: String,
}

impl Default for QuantizationSettings {
    fn default() -> Self {
        Self {
            load_in_4bit:  true,
            double_quant:  true,
            quant_type:    "nf4".to_string(),
            compute_dtype: "bfloat16".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizerSettings {
    pub padding_side:       String,
    pub add_bos_token:      bool,
    pub add_eos_token:      bool,
    /// The base model ships without a pad token; reuse EOS
    pub pad_with_eos_token: bool,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            padding_side:       "left".to_string(),
            add_bos_token:      true,
            add_eos_token:      true,
            pad_with_eos_token: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalLmTrainingPlan {
    pub base_model:                  String,
    pub model_alias:                 String,
    pub project:                     String,
    pub warmup_steps:                usize,
    pub per_device_train_batch_size: usize,
    pub gradient_accumulation_steps: usize,
    pub gradient_checkpointing:      bool,
    pub max_steps:                   usize,
    pub learning_rate:               f64,
    pub bf16:                        bool,
    pub optim:                       String,
    pub logging_dir:                 String,
    pub save_strategy:               String,
    pub save_steps:                  usize,
    pub eval_strategy:               String,
    pub eval_steps:                  usize,
    pub do_eval:                     bool,
    /// KV cache is incompatible with gradient checkpointing
    pub use_cache:                   bool,
    /// Masked-LM collation; off means plain next-token prediction
    pub mlm:                         bool,
    pub prompt_template:             String,
    pub tokenizer:                   TokenizerSettings,
    pub lora:                        LoraSettings,
    pub quantization:                QuantizationSettings,
}

impl Default for CausalLmTrainingPlan {
    fn default() -> Self {
        Self {
            base_model:                  "bkai-foundation-models/vietnamese-llama2-7b-120GB".to_string(),
            model_alias:                 "llama2-7b".to_string(),
            project:                     "law-finetune".to_string(),
            warmup_steps:                1,
            per_device_train_batch_size: 2,
            gradient_accumulation_steps: 1,
            gradient_checkpointing:      true,
            max_steps:                   500,
            learning_rate:               2.5e-5,
            bf16:                        true,
            optim:                       "paged_adamw_8bit".to_string(),
            logging_dir:                 "./logs".to_string(),
            save_strategy:               "steps".to_string(),
            save_steps:                  50,
            eval_strategy:               "steps".to_string(),
            eval_steps:                  50,
            do_eval:                     true,
            use_cache:                   false,
            mlm:                         false,
            prompt_template:             crate::data::prompt::DEFAULT_TEMPLATE.to_string(),
            tokenizer:                   TokenizerSettings::default(),
            lora:                        LoraSettings::default(),
            quantization:                QuantizationSettings::default(),
        }
    }
}

impl CausalLmTrainingPlan {
    pub fn validate(&self) -> PrepareResult<()> {
        ensure(!self.base_model.trim().is_empty(), || "base_model is empty".into())?;
        ensure(self.max_steps > 0, || "max_steps must be > 0".into())?;
        ensure(self.per_device_train_batch_size > 0, || "batch size must be > 0".into())?;
        ensure(self.gradient_accumulation_steps > 0, || {
            "gradient_accumulation_steps must be > 0".into()
        })?;
        ensure(self.learning_rate > 0.0 && self.learning_rate.is_finite(), || {
            format!("learning_rate must be positive, got {}", self.learning_rate)
        })?;
        ensure(self.save_steps > 0 && self.eval_steps > 0, || {
            "save_steps and eval_steps must be > 0".into()
        })?;
        ensure(!self.do_eval || self.eval_strategy != "no", || {
            "do_eval needs an eval_strategy other than \"no\"".into()
        })?;
        ensure(!(self.use_cache && self.gradient_checkpointing), || {
            "use_cache cannot be combined with gradient_checkpointing".into()
        })?;
        ensure(self.lora.r > 0, || "lora.r must be > 0".into())?;
        ensure((0.0..1.0).contains(&self.lora.lora_dropout), || {
            format!("lora_dropout must be in [0, 1), got {}", self.lora.lora_dropout)
        })?;
        Ok(())
    }

    pub fn to_document(
        &self,
        started_at: NaiveDateTime,
        secrets:    &Secrets,
    ) -> PrepareResult<serde_json::Value> {
        self.validate()?;

        let doc = CausalLmPlanDocument {
            run:  RunInfo::new(&self.model_alias, &self.project, started_at, secrets),
            plan: self,
        };
        Ok(serde_json::to_value(doc)?)
    }
}

#[derive(Serialize)]
struct CausalLmPlanDocument<'a> {
    #[serde(flatten)]
    run:  RunInfo,
    #[serde(flatten)]
    plan: &'a CausalLmTrainingPlan,
}
