use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    domain::{BillId, BillSummary},
    error::ApiError,
    protocol::{
        AnalyzeResponse, BillDocumentForm, ListBillsForm, ANALYZE_FILE_FIELD, ANALYZE_PATH,
        BILL_UPLOAD_FILENAME, GET_BILLS_PATH, GET_BILL_PDF_PATH,
    },
};
use tracing::{debug, info};
use url::Url;

pub mod blob;
pub mod controller;
pub mod error;
pub mod port;
pub mod token;
pub mod upload;
pub mod view;

pub use controller::{Bindings, Selection, UiController};
pub use error::{AnalysisError, BackendError, InputError};
pub use port::{Control, UiEvent, ViewPort};
pub use upload::UploadedFile;
pub use view::{BillOption, ErrorBanner, UiErrorCategory, ViewState};

const PDF_MIME: &str = "application/pdf";

/// Multipart payload for the analysis endpoint.
#[derive(Clone)]
pub struct AnalysisUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AnalysisUpload {
    pub fn from_file(file: &UploadedFile) -> Self {
        Self {
            file_name: file.name.clone(),
            mime_type: file.mime_type(),
            bytes: file.bytes.clone(),
        }
    }

    /// Wraps a fetched bill document under the fixed upload name.
    pub fn bill_document(bytes: Vec<u8>) -> Self {
        Self {
            file_name: BILL_UPLOAD_FILENAME.to_string(),
            mime_type: PDF_MIME.to_string(),
            bytes,
        }
    }
}

#[async_trait]
pub trait PolicyBackend: Send + Sync {
    async fn list_bills(&self, topic: &str, state: &str) -> Result<Vec<BillSummary>, BackendError>;
    async fn fetch_bill_document(&self, bill_id: &BillId) -> Result<Vec<u8>, BackendError>;
    async fn analyze(&self, upload: AnalysisUpload) -> Result<AnalyzeResponse, BackendError>;
}

pub struct HttpPolicyBackend {
    http: Client,
    base_url: Url,
}

impl HttpPolicyBackend {
    pub fn new(server_url: &str) -> Result<Self, BackendError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(server_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Resolves a report link the way a browser resolves it against the page.
    pub fn resolve_report_url(&self, pdf_url: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(pdf_url)?)
    }

    pub async fn download_report(&self, pdf_url: &str) -> Result<Vec<u8>, BackendError> {
        let url = self.resolve_report_url(pdf_url)?;
        let response = self.http.get(url.clone()).send().await?;
        let bytes = check_status(response).await?.bytes().await?;
        info!(url = %url, bytes = bytes.len(), "downloaded analysis report");
        Ok(bytes.to_vec())
    }
}

async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let message = ApiError::from_body(&body).and_then(|err| err.message().map(str::to_owned));
    debug!(status = status.as_u16(), ?message, "backend returned error status");
    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl PolicyBackend for HttpPolicyBackend {
    async fn list_bills(&self, topic: &str, state: &str) -> Result<Vec<BillSummary>, BackendError> {
        let response = self
            .http
            .post(self.endpoint(GET_BILLS_PATH)?)
            .form(&ListBillsForm {
                topic: topic.to_string(),
                state: state.to_string(),
            })
            .send()
            .await?;
        let body = check_status(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_bill_document(&self, bill_id: &BillId) -> Result<Vec<u8>, BackendError> {
        let response = self
            .http
            .post(self.endpoint(GET_BILL_PDF_PATH)?)
            .form(&BillDocumentForm {
                bill_id: bill_id.clone(),
            })
            .send()
            .await?;
        let bytes = check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn analyze(&self, upload: AnalysisUpload) -> Result<AnalyzeResponse, BackendError> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        let form = Form::new().part(ANALYZE_FILE_FIELD, part);
        let response = self
            .http
            .post(self.endpoint(ANALYZE_PATH)?)
            .multipart(form)
            .send()
            .await?;
        let body = check_status(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
