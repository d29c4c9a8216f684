//! Domain error types.

/// Top-level error type for engulfbt.
///
/// Data and configuration problems are fatal: they abort the run before
/// (or at the start of) the simulation fold. Nothing inside the fold is
/// recoverable.
#[derive(Debug, thiserror::Error)]
pub enum EngulfError {
    #[error("invalid price data: {reason}")]
    Data { reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngulfError {
    pub fn data(reason: impl Into<String>) -> Self {
        EngulfError::Data {
            reason: reason.into(),
        }
    }
}

impl From<&EngulfError> for std::process::ExitCode {
    fn from(err: &EngulfError) -> Self {
        let code: u8 = match err {
            EngulfError::Io(_) => 1,
            EngulfError::ConfigParse { .. }
            | EngulfError::ConfigMissing { .. }
            | EngulfError::ConfigInvalid { .. } => 2,
            EngulfError::Data { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_error_display() {
        let err = EngulfError::data("duplicate date 2024-01-15");
        assert_eq!(
            err.to_string(),
            "invalid price data: duplicate date 2024-01-15"
        );
    }

    #[test]
    fn config_invalid_display() {
        let err = EngulfError::ConfigInvalid {
            section: "backtest".into(),
            key: "allocation_fraction".into(),
            reason: "must be in (0, 1]".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [backtest] allocation_fraction: must be in (0, 1]"
        );
    }

    #[test]
    fn config_missing_display() {
        let err = EngulfError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        };
        assert_eq!(err.to_string(), "missing config key [data] path");
    }

    #[test]
    fn io_error_wraps() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EngulfError = io.into();
        assert!(matches!(err, EngulfError::Io(_)));
    }
}
