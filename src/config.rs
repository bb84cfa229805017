// ABOUTME: Configuration module for the pptx2png application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::convert::ConvertOptions;
use crate::dimensions::{DimensionRequest, SizePolicy, DEFAULT_WIDTH};
use crate::errors::{ConvertError, Result};
use log::warn;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_WIDTH_VAR: &str = "PPTX2PNG_DEFAULT_WIDTH";
pub const SIZE_POLICY_VAR: &str = "PPTX2PNG_SIZE_POLICY";

/// Global configuration for the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub default_width: u32,
    pub size_policy: PolicyKind,
}

/// Named default size policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Scale,
    Native,
}

impl PolicyKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "scale" => Ok(PolicyKind::Scale),
            "native" => Ok(PolicyKind::Native),
            other => Err(ConvertError::ConfigError(format!(
                "Unknown size policy '{}', expected 'scale' or 'native'",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_WIDTH,
            size_policy: PolicyKind::Scale,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var(DEFAULT_WIDTH_VAR).ok().as_deref(),
            env::var(SIZE_POLICY_VAR).ok().as_deref(),
        )
    }

    /// Build a configuration from raw variable values, falling back to defaults
    pub fn from_vars(default_width: Option<&str>, size_policy: Option<&str>) -> Self {
        let defaults = Self::default();

        let default_width = default_width
            .and_then(|s| match s.trim().parse::<u32>() {
                Ok(width) if width > 0 => Some(width),
                _ => {
                    warn!("Ignoring invalid {}: '{}'", DEFAULT_WIDTH_VAR, s);
                    None
                }
            })
            .unwrap_or(defaults.default_width);

        let size_policy = size_policy
            .and_then(|s| match PolicyKind::parse(s) {
                Ok(kind) => Some(kind),
                Err(e) => {
                    warn!("Ignoring {}: {}", SIZE_POLICY_VAR, e);
                    None
                }
            })
            .unwrap_or(defaults.size_policy);

        Self {
            default_width,
            size_policy,
        }
    }

    /// The size policy applied when no dimensions are requested
    pub fn policy(&self) -> SizePolicy {
        match self.size_policy {
            PolicyKind::Scale => SizePolicy::ScaleToWidth(self.default_width),
            PolicyKind::Native => SizePolicy::Native,
        }
    }

    /// Get conversion options with defaults from this config
    pub fn get_convert_options(
        &self,
        source: PathBuf,
        destination: Option<PathBuf>,
        width: Option<i64>,
        height: Option<i64>,
        log_files: bool,
    ) -> Result<ConvertOptions> {
        Ok(ConvertOptions {
            source,
            destination,
            request: DimensionRequest::new(width, height)?,
            policy: self.policy(),
            log_files,
        })
    }
}
