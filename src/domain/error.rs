//! Domain error types.

/// Top-level error type for bandview.
#[derive(Debug, thiserror::Error)]
pub enum BandviewError {
    #[error("failed to fetch data for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("no historical data for {symbol} in the requested range")]
    EmptyDataset { symbol: String },

    #[error(
        "fetched data is missing required fields [{}] (actual fields: [{}])",
        missing.join(", "),
        actual.join(", ")
    )]
    SchemaMismatch {
        missing: Vec<String>,
        actual: Vec<String>,
    },

    #[error("cannot render chart: {reason}")]
    Render { reason: String },

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

impl From<&BandviewError> for std::process::ExitCode {
    fn from(err: &BandviewError) -> Self {
        let code: u8 = match err {
            BandviewError::Io(_) => 1,
            BandviewError::ConfigParse { .. }
            | BandviewError::ConfigMissing { .. }
            | BandviewError::ConfigInvalid { .. } => 2,
            BandviewError::Fetch { .. } => 3,
            BandviewError::Render { .. } => 4,
            BandviewError::EmptyDataset { .. } | BandviewError::SchemaMismatch { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_names_fields() {
        let err = BandviewError::SchemaMismatch {
            missing: vec!["volume".into()],
            actual: vec!["open".into(), "close".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("[volume]"));
        assert!(msg.contains("open, close"));
    }

    #[test]
    fn empty_dataset_names_symbol() {
        let err = BandviewError::EmptyDataset {
            symbol: "NVDA".into(),
        };
        assert!(err.to_string().contains("NVDA"));
    }
}
