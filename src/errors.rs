use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FraudLensError>;

#[derive(Debug, Error)]
pub enum FraudLensError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {path} is not valid JSON: {details}")]
    ArtifactParse { path: PathBuf, details: String },

    #[error("artifact {path} is malformed: {details}")]
    ArtifactShape { path: PathBuf, details: String },

    #[error("dataset {path} could not be loaded: {details}")]
    Dataset { path: PathBuf, details: String },

    #[error("chart {chart} failed: {details}")]
    Chart { chart: &'static str, details: String },

    #[error("history export failed: {details}")]
    Export { details: String },
}

impl FraudLensError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn export(details: impl ToString) -> Self {
        Self::Export {
            details: details.to_string(),
        }
    }

    pub fn chart(chart: &'static str, details: impl ToString) -> Self {
        Self::Chart {
            chart,
            details: details.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_failures_name_the_export() {
        let err = FraudLensError::export("disk full");
        assert_eq!(err.to_string(), "history export failed: disk full");
    }
}
