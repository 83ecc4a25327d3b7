// ============================================================
// Layer 6 — Secrets
// ============================================================
// API credentials for the external training platforms:
//
//   WANDB_API_KEY → experiment tracking (Weights & Biases)
//   HF_API_TOKEN  → Hugging Face Hub (gated base models, pushes)
//
// Read from the process environment exactly once, in main(), and
// passed by reference to whichever use case needs them. Nothing
// below this layer calls std::env::var.
//
// Values never reach logs or artifacts: Debug prints only
// whether each secret is set.

use std::fmt;

use crate::domain::error::{PrepareError, PrepareResult};

pub const WANDB_API_KEY: &str = "WANDB_API_KEY";
pub const HF_API_TOKEN: &str = "HF_API_TOKEN";

#[derive(Clone, Default)]
pub struct Secrets {
    wandb_api_key: Option<String>,
    hf_api_token:  Option<String>,
}

impl Secrets {
    pub fn new(wandb_api_key: Option<String>, hf_api_token: Option<String>) -> Self {
        // An empty variable counts as unset
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            wandb_api_key: non_empty(wandb_api_key),
            hf_api_token:  non_empty(hf_api_token),
        }
    }

    /// Read both secrets from the process environment.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(WANDB_API_KEY).ok(),
            std::env::var(HF_API_TOKEN).ok(),
        )
    }

    pub fn has_wandb(&self) -> bool {
        self.wandb_api_key.is_some()
    }

    /// The Hugging Face token, or `MissingSecret` if it was not set.
    pub fn require_hf_token(&self) -> PrepareResult<&str> {
        self.hf_api_token
            .as_deref()
            .ok_or(PrepareError::MissingSecret { name: HF_API_TOKEN })
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = |v: &Option<String>| if v.is_some() { "<redacted>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("wandb_api_key", &state(&self.wandb_api_key))
            .field("hf_api_token",  &state(&self.hf_api_token))
            .finish()
    }
}
