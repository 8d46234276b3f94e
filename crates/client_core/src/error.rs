//! Error types for the backend port and the analysis workflow.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error! status: {status}")]
    Status { status: u16, message: Option<String> },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Message supplied by the server in an `{error}` body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BackendError::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// User-input problems. The `Display` text is what the error banner shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please select a bill or upload a file before analyzing.")]
    NothingToAnalyze,
    #[error("Please select a file to upload.")]
    NoFileSelected,
    #[error("Please upload a PDF, DOC, DOCX, or TXT file.")]
    UnsupportedFileType { file_name: String },
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{message}")]
    BillDocument {
        message: String,
        #[source]
        source: BackendError,
    },
    #[error("Network response was not ok")]
    Rejected { status: u16 },
    #[error("{0}")]
    Transport(BackendError),
    #[error("{0}")]
    Application(String),
    #[error("analysis finished without a report url")]
    MissingReport,
}

impl AnalysisError {
    pub fn bill_document(source: BackendError) -> Self {
        let message = source
            .server_message()
            .map(str::to_owned)
            .unwrap_or_else(|| source.to_string());
        AnalysisError::BillDocument { message, source }
    }

    pub fn from_analyze(err: BackendError) -> Self {
        match err {
            BackendError::Status { status, .. } => AnalysisError::Rejected { status },
            other => AnalysisError::Transport(other),
        }
    }

    pub fn is_application(&self) -> bool {
        matches!(
            self,
            AnalysisError::Application(_) | AnalysisError::MissingReport
        )
    }
}
