//! Editor configuration.
//!
//! Options are a plain struct with documented defaults. Deserializing a
//! partial JSON object fills every missing field from [`EditorConfig::default`].

use crate::error::{Result, TransferFunctionError};
use crate::stops::{EndpointPolicy, StopRules, DEFAULT_MIN_STOP_GAP};
use serde::{Deserialize, Serialize};

/// Default number of entries in the RGBA lookup table.
pub const DEFAULT_LUT_SIZE: usize = 256;

/// Configuration for a [`TransferFunctionEditor`](crate::TransferFunctionEditor).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether the first and last stops are fixed at 0 and 1.
    pub endpoints: EndpointPolicy,
    /// Smallest distance a dragged stop keeps from its neighbours.
    pub min_stop_gap: f64,
    /// Entries produced by [`TransferFunctionEditor::lut`](crate::TransferFunctionEditor::lut).
    pub lut_size: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointPolicy::Pinned,
            min_stop_gap: DEFAULT_MIN_STOP_GAP,
            lut_size: DEFAULT_LUT_SIZE,
        }
    }
}

impl EditorConfig {
    /// Parse options, taking defaults for anything omitted.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_stop_gap > 0.0 && self.min_stop_gap < 0.5) {
            return Err(TransferFunctionError::InvalidConfig(format!(
                "min_stop_gap must be in (0, 0.5), got {}",
                self.min_stop_gap
            )));
        }
        Ok(())
    }

    pub fn stop_rules(&self) -> StopRules {
        StopRules {
            endpoints: self.endpoints,
            min_gap: self.min_stop_gap,
        }
    }
}
