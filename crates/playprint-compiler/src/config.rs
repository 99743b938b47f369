//! Run configuration.
//!
//! One `Config` value is threaded through scanning, emission and assembly.
//! Nothing reads process-wide state.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use playprint_core::{ByteOrder, ScalarEncoding};
use serde::{Deserialize, Serialize};

/// What to do with an entity whose symbols or assets cannot be resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Drop the entity, log a warning and keep going.
    Skip,
}

impl MissingPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "abort" => Some(Self::Abort),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

/// Configuration for one compilation or assembly run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory that relative output paths are placed under
    pub(crate) output_dir: Option<PathBuf>,
    /// Byte order of every multi-byte field
    pub(crate) byte_order: ByteOrder,
    /// Encoding of every scalar value
    pub(crate) scalar: ScalarEncoding,
    /// Log per-chunk progress
    pub(crate) verbose: bool,
    /// Handling of unresolved symbols and assets
    pub(crate) on_missing: MissingPolicy,
    /// Fixed header timestamp, for reproducible output
    pub(crate) timestamp: Option<u32>,
    /// Directory that embedded media paths are resolved against
    pub(crate) asset_root: Option<PathBuf>,
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory override.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the byte order.
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Set the scalar encoding.
    pub fn scalar(mut self, scalar: ScalarEncoding) -> Self {
        self.scalar = scalar;
        self
    }

    /// Set whether to log per-chunk progress.
    pub fn verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Set the missing-symbol policy.
    pub fn on_missing(mut self, policy: MissingPolicy) -> Self {
        self.on_missing = policy;
        self
    }

    /// Pin the header timestamp.
    pub fn timestamp(mut self, seconds: u32) -> Self {
        self.timestamp = Some(seconds);
        self
    }

    /// Set the directory embedded media are read from.
    pub fn asset_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_root = Some(dir.into());
        self
    }

    /// Overlay the fields `other` sets on top of `self`.
    ///
    /// Used to apply command-line flags over a manifest's configuration.
    pub fn merge(mut self, other: ConfigOverrides) -> Self {
        if let Some(dir) = other.output_dir {
            self.output_dir = Some(dir);
        }
        if let Some(order) = other.byte_order {
            self.byte_order = order;
        }
        if let Some(scalar) = other.scalar {
            self.scalar = scalar;
        }
        if let Some(policy) = other.on_missing {
            self.on_missing = policy;
        }
        if let Some(ts) = other.timestamp {
            self.timestamp = Some(ts);
        }
        if let Some(root) = other.asset_root {
            self.asset_root = Some(root);
        }
        self.verbose |= other.verbose;
        self
    }

    /// Place `path` under the output directory when it is relative.
    pub fn resolve_output(&self, path: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Resolve an embedded media path against the asset root.
    pub fn resolve_asset(&self, path: &Path) -> PathBuf {
        match &self.asset_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Header timestamp: the pinned value, or the current time.
    pub fn header_timestamp(&self) -> u32 {
        self.timestamp.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as u32)
                .unwrap_or(0)
        })
    }
}

/// Optional per-field overrides, as collected from command-line flags.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    pub output_dir: Option<PathBuf>,
    pub byte_order: Option<ByteOrder>,
    pub scalar: Option<ScalarEncoding>,
    pub verbose: bool,
    pub on_missing: Option<MissingPolicy>,
    pub timestamp: Option<u32>,
    pub asset_root: Option<PathBuf>,
}
