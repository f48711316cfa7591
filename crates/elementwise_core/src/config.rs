//! Settings for the random source shared by the random fill.

use serde::{Deserialize, Serialize};

/// Seed used when neither a seed nor entropy is requested.
pub const DEFAULT_SEED: u64 = 0x5EED_5EED_5EED_5EED;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSettings {
    pub seed: Option<u64>,
    /// Seed from the OS instead; takes precedence over `seed`.
    pub from_entropy: bool,
}

impl RandomSettings {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            from_entropy: false,
        }
    }

    pub fn entropy() -> Self {
        Self {
            seed: None,
            from_entropy: true,
        }
    }

    /// Seed a source built from these settings will use, or `None` for entropy.
    pub fn effective_seed(&self) -> Option<u64> {
        if self.from_entropy {
            None
        } else {
            Some(self.seed.unwrap_or(DEFAULT_SEED))
        }
    }
}
