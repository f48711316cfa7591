//! Lab run settings.

use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use elementwise_core::{RandomSettings, Scalar};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabSettings {
    /// Random pair cases per generated set.
    pub count: usize,
    /// Seed for case generation.
    pub seed: u64,
    /// Largest accepted |sigma1 - sigma2| inside `sigmoid_limit`.
    pub tolerance: Scalar,
    /// Inputs with |x| below this must keep the sigmoid forms within `tolerance`.
    pub sigmoid_limit: Scalar,
    /// Grid points in the generated sigmoid sweep.
    pub sweep_steps: usize,
    /// Length of the random-draw check.
    pub draws: usize,
    pub random: RandomSettings,
}

impl Default for LabSettings {
    fn default() -> Self {
        Self {
            count: 128,
            seed: 0xA11CE,
            tolerance: 1e-6,
            sigmoid_limit: 20.0,
            sweep_steps: 401,
            draws: 1000,
            random: RandomSettings::default(),
        }
    }
}

impl LabSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings {}", path.as_ref().display()))?;
        let settings: Self = serde_json::from_str(&text)
            .with_context(|| format!("invalid settings JSON {}", path.as_ref().display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.tolerance.is_finite() && self.tolerance >= 0.0,
            "tolerance must be a non-negative finite number, got {}",
            self.tolerance
        );
        ensure!(
            self.sigmoid_limit.is_finite() && self.sigmoid_limit > 0.0,
            "sigmoid_limit must be positive and finite, got {}",
            self.sigmoid_limit
        );
        Ok(())
    }
}
