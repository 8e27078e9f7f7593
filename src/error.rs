//! Error taxonomy for the analysis pipeline.
//!
//! Every stage failure short-circuits the current upload cycle and surfaces a
//! single human-readable message; nothing is retried automatically. Parse
//! failures keep the raw model reply so it can be logged for diagnostics
//! without being shown to an end user.

use thiserror::Error;

/// Failure modes of one upload cycle.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The file extension is not mapped to any extraction strategy.
    #[error("unsupported file type: {extension:?}")]
    UnsupportedFormat { extension: Option<String> },

    /// Reading the source bytes from disk failed.
    #[error("failed to read {name}: {source}")]
    FileRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The delimited-table payload could not be parsed.
    #[error("failed to parse delimited table: {0}")]
    Table(#[from] csv::Error),

    /// The workbook payload could not be opened or read.
    #[error("failed to read workbook: {message}")]
    Workbook { message: String },

    /// A document extraction backend failed.
    #[error("document extraction failed: {message}")]
    Document { message: String },

    /// The completion endpoint could not be reached or refused the request.
    #[error("completion request failed: {message}")]
    RemoteCall {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The model reply contained no balanced JSON object.
    #[error("no JSON object found in model reply")]
    MalformedResponse { raw_reply: String },

    /// A JSON object was found but did not decode into an analysis result.
    #[error("model reply contained invalid JSON: {source}")]
    JsonDecode {
        raw_reply: String,
        #[source]
        source: serde_json::Error,
    },

    /// A new upload was started while one was still loading.
    #[error("an analysis is already in progress")]
    AnalysisInProgress,
}

impl AnalyzerError {
    /// Raw model reply attached to parse failures, for logging.
    pub fn raw_reply(&self) -> Option<&str> {
        match self {
            Self::MalformedResponse { raw_reply } | Self::JsonDecode { raw_reply, .. } => {
                Some(raw_reply)
            }
            _ => None,
        }
    }
}
