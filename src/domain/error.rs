//! Domain error types.
//!
//! The per-bar decision path never fails; these errors cover loading
//! configuration and market data on the host side.

/// Top-level error type for bandtrader.
#[derive(Debug, thiserror::Error)]
pub enum BandtraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("market data error: {reason}")]
    Data { reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BandtraderError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        BandtraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        BandtraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&BandtraderError> for std::process::ExitCode {
    fn from(err: &BandtraderError) -> Self {
        let code: u8 = match err {
            BandtraderError::Io(_) => 1,
            BandtraderError::ConfigParse { .. }
            | BandtraderError::ConfigMissing { .. }
            | BandtraderError::ConfigInvalid { .. } => 2,
            BandtraderError::Data { .. } => 3,
            BandtraderError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
