use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;

use crate::error::Error;

pub const DEFAULT_ADVANCE_INTERVAL_MS: u64 = 4000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Images shown by the carousel, in page order.
    pub images: Vec<PathBuf>,
    /// Time between automatic advances, in ms.
    pub advance_interval_ms: u64,
    /// Page shown when the carousel is created.
    pub initial_index: usize,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate invariants that serde defaults cannot express.
    pub fn validated(self) -> Result<Self> {
        ensure!(!self.images.is_empty(), Error::NoImages);
        ensure!(self.advance_interval_ms > 0, Error::ZeroInterval);
        ensure!(
            self.initial_index < self.images.len(),
            Error::InitialIndexOutOfRange {
                index: self.initial_index,
                count: self.images.len(),
            }
        );
        Ok(self)
    }

    pub fn item_count(&self) -> usize {
        self.images.len()
    }

    pub fn advance_interval(&self) -> Duration {
        Duration::from_millis(self.advance_interval_ms)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            advance_interval_ms: DEFAULT_ADVANCE_INTERVAL_MS,
            initial_index: 0,
        }
    }
}
