//! Bus configuration with validation.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bus configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Library version sent in the handshake.
    pub version: String,
    /// Origins accepted in addition to the parent window's.
    pub valid_message_origins: Vec<String>,
    /// Frame context used when neither `initialize` nor the handshake
    /// response supplies one.
    pub default_frame_context: Option<String>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            valid_message_origins: Vec::new(),
            default_frame_context: None,
        }
    }
}

impl BusConfig {
    /// Load from `BRIDGE_VERSION`, `BRIDGE_VALID_ORIGINS` (comma separated)
    /// and `BRIDGE_FRAME_CONTEXT`, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            version: env::var("BRIDGE_VERSION").unwrap_or(defaults.version),
            valid_message_origins: env::var("BRIDGE_VALID_ORIGINS")
                .map(|v| parse_origin_list(&v))
                .unwrap_or_default(),
            default_frame_context: env::var("BRIDGE_FRAME_CONTEXT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// Builder-style allow-list setter.
    #[must_use]
    pub fn with_valid_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_message_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style default frame context setter.
    #[must_use]
    pub fn with_default_frame_context(mut self, frame_context: impl Into<String>) -> Self {
        self.default_frame_context = Some(frame_context.into());
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::EmptyVersion);
        }
        self.origin_patterns().map(|_| ())
    }

    /// Parse the allow-list.
    pub fn origin_patterns(&self) -> Result<Vec<OriginPattern>, ConfigError> {
        self.valid_message_origins
            .iter()
            .map(|origin| origin.parse())
            .collect()
    }
}

fn parse_origin_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// An allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPattern {
    /// `https://host.example.com`
    Exact(String),
    /// `https://*.example.com`: any single or nested subdomain.
    Wildcard {
        /// Scheme without `://`.
        scheme: String,
        /// Host suffix including the leading dot, lowercase.
        suffix: String,
    },
}

impl OriginPattern {
    /// True if `origin` is covered by this pattern.
    #[must_use]
    pub fn matches(&self, origin: &str) -> bool {
        match self {
            Self::Exact(expected) => expected.eq_ignore_ascii_case(origin),
            Self::Wildcard { scheme, suffix } => {
                let Some((origin_scheme, host)) = origin.split_once("://") else {
                    return false;
                };
                let host = host.to_ascii_lowercase();
                origin_scheme.eq_ignore_ascii_case(scheme)
                    && host.len() > suffix.len()
                    && host.ends_with(suffix.as_str())
                    && !host.contains('/')
            }
        }
    }
}

impl FromStr for OriginPattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidOrigin(s.to_string());
        let (scheme, host) = s.split_once("://").ok_or_else(invalid)?;
        if scheme.is_empty() || host.is_empty() || host.contains('/') {
            return Err(invalid());
        }

        match host.strip_prefix("*.") {
            Some(rest) if !rest.is_empty() && !rest.contains('*') => Ok(Self::Wildcard {
                scheme: scheme.to_ascii_lowercase(),
                suffix: format!(".{}", rest.to_ascii_lowercase()),
            }),
            Some(_) => Err(invalid()),
            None if host.contains('*') => Err(invalid()),
            None => Ok(Self::Exact(s.to_string())),
        }
    }
}

impl fmt::Display for OriginPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(origin) => f.write_str(origin),
            Self::Wildcard { scheme, suffix } => write!(f, "{scheme}://*{suffix}"),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("version must not be empty")]
    EmptyVersion,

    #[error("invalid origin pattern: {0}")]
    InvalidOrigin(String),
}
