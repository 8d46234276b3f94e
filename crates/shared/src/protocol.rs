use serde::{Deserialize, Serialize};

use crate::domain::BillId;

pub const GET_BILLS_PATH: &str = "/get_bills";
pub const GET_BILL_PDF_PATH: &str = "/get_bill_pdf";
pub const ANALYZE_PATH: &str = "/analyze";

/// Multipart field carrying the document to analyse.
pub const ANALYZE_FILE_FIELD: &str = "file";
/// File name used when a listed bill is re-packaged for analysis.
pub const BILL_UPLOAD_FILENAME: &str = "bill.pdf";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBillsForm {
    pub topic: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillDocumentForm {
    pub bill_id: BillId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
