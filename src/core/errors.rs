//! PDS-prefixed error types with structured error codes.

#![allow(missing_docs)]

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Top-level error type for the PPE Drift Sentinel.
#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("[PDS-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[PDS-1002] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[PDS-2001] unknown feature: {name}")]
    UnknownFeature { name: String },

    #[error("[PDS-2002] insufficient data for recalibration: {details}")]
    InsufficientData { details: String },

    #[error("[PDS-2003] insufficient sample size for {feature}: got {got}, need at least {need}")]
    InsufficientSampleSize {
        feature: &'static str,
        got: usize,
        need: usize,
    },

    #[error("[PDS-2004] cannot attribute drift from an empty report")]
    EmptyReport,

    #[error("[PDS-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[PDS-3001] IO failure: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

impl SentinelError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "PDS-1001",
            Self::ConfigParse { .. } => "PDS-1002",
            Self::UnknownFeature { .. } => "PDS-2001",
            Self::InsufficientData { .. } => "PDS-2002",
            Self::InsufficientSampleSize { .. } => "PDS-2003",
            Self::EmptyReport => "PDS-2004",
            Self::Serialization { .. } => "PDS-2101",
            Self::Io { .. } => "PDS-3001",
        }
    }

    /// Whether the orchestrator boundary can absorb this failure and keep
    /// serving (engine state is left untouched by all of these).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownFeature { .. }
                | Self::InsufficientData { .. }
                | Self::InsufficientSampleSize { .. }
                | Self::EmptyReport
        )
    }
}

impl From<serde_json::Error> for SentinelError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SentinelError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<std::io::Error> for SentinelError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}
