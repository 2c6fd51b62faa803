use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::error::TempDirError;

/// Name prefix for every directory the provisioner allocates, so leftover
/// test artifacts are easy to spot in the temp root.
pub const DEFAULT_PREFIX: &str = "tutil";

/// Owner and group get full access, everyone else nothing.
pub const DEFAULT_MODE: u32 = 0o770;

/// Settings for a [`Provisioner`](crate::Provisioner).
///
/// Every field is optional in TOML:
///
/// ```toml
/// prefix = "itest"
/// root = "/var/tmp/ci"
/// mode = 0o750
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionerConfig {
    pub prefix: String,
    /// Directory to allocate under. `None` means the OS temp dir.
    pub root: Option<Utf8PathBuf>,
    /// Unix permission bits for created directories. Ignored elsewhere.
    pub mode: u32,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            root: None,
            mode: DEFAULT_MODE,
        }
    }
}

impl ProvisionerConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Load settings from a TOML file.
    pub fn load_from_path(path: &Utf8Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
        Self::from_toml_str(&raw).with_context(|| format!("parsing config {}", path))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the prefix is usable as the leading part of a file name
    /// and that the mode only carries permission bits.
    pub fn validate(&self) -> Result<(), TempDirError> {
        if self.mode > 0o7777 {
            return Err(TempDirError::InvalidMode { mode: self.mode });
        }

        let reason = if self.prefix.is_empty() {
            Some("prefix must not be empty")
        } else if self.prefix.contains(['/', '\\']) {
            Some("prefix must not contain path separators")
        } else if self.prefix == "." || self.prefix == ".." {
            Some("prefix must not be a relative path component")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(TempDirError::InvalidPrefix {
                prefix: self.prefix.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
