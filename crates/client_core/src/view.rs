//! View state and the pure transitions the controller applies to it.

use shared::domain::{AnalysisSource, BillSummary, Tab};

use crate::upload::truncate_label;

pub const BILL_PLACEHOLDER_LABEL: &str = "Select a bill";
pub const MAX_OPTION_LABEL_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Input,
    Transport,
    Application,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub category: UiErrorCategory,
    pub message: String,
}

impl ErrorBanner {
    pub fn new(category: UiErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(UiErrorCategory::Input, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(UiErrorCategory::Transport, message)
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::new(UiErrorCategory::Application, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillOption {
    pub value: String,
    pub label: String,
    pub tooltip: Option<String>,
}

impl BillOption {
    pub fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: BILL_PLACEHOLDER_LABEL.to_string(),
            tooltip: None,
        }
    }

    pub fn from_summary(bill: &BillSummary) -> Self {
        Self {
            value: bill.bill_id.as_str().to_string(),
            label: truncate_label(&bill.title, MAX_OPTION_LABEL_CHARS),
            tooltip: Some(bill.title.clone()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub active_tab: Tab,
    pub pdf_content_visible: bool,
    pub analysis_content_visible: bool,
    pub loading: bool,
    pub error: Option<ErrorBanner>,
    pub results_visible: bool,
    pub document_viewer_visible: bool,
    pub analysis_results_visible: bool,

    pub topic_value: String,
    pub state_value: String,
    pub bill_options: Vec<BillOption>,
    pub selected_bill_value: String,
    pub bills_dropdown_visible: bool,
    pub no_bills_message: Option<String>,
    pub uploaded_file_label: String,

    pub document_viewer_src: Option<String>,
    pub analysis_viewer_src: Option<String>,
    /// Input the next analysis would use, given the current selection.
    pub analysis_input: Option<AnalysisSource>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_tab: Tab::Pdf,
            pdf_content_visible: true,
            analysis_content_visible: false,
            loading: false,
            error: None,
            results_visible: false,
            document_viewer_visible: false,
            analysis_results_visible: false,
            topic_value: String::new(),
            state_value: String::new(),
            bill_options: vec![BillOption::placeholder()],
            selected_bill_value: String::new(),
            bills_dropdown_visible: false,
            no_bills_message: None,
            uploaded_file_label: String::new(),
            document_viewer_src: None,
            analysis_viewer_src: None,
            analysis_input: None,
        }
    }
}

impl ViewState {
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|banner| banner.message.as_str())
    }

    /// Replaces whatever the banner showed before; errors never stack.
    pub fn show_error(&mut self, banner: ErrorBanner) {
        self.error = Some(banner);
    }

    pub fn hide_error(&mut self) {
        self.error = None;
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.pdf_content_visible = tab == Tab::Pdf;
        self.analysis_content_visible = tab == Tab::Analysis;
    }

    pub fn bills_listed(&mut self, topic: &str, state: &str, bills: &[BillSummary]) {
        self.bill_options = std::iter::once(BillOption::placeholder())
            .chain(bills.iter().map(BillOption::from_summary))
            .collect();
        self.selected_bill_value.clear();

        if bills.is_empty() {
            self.bills_dropdown_visible = false;
            self.no_bills_message = Some(format!(
                "No bills found for {topic} in {state} for current year."
            ));
        } else {
            self.bills_dropdown_visible = true;
            self.no_bills_message = None;
        }
    }

    pub fn reset_bill_selection(&mut self) {
        self.topic_value.clear();
        self.state_value.clear();
        self.bill_options = vec![BillOption::placeholder()];
        self.selected_bill_value.clear();
        self.bills_dropdown_visible = false;
    }

    pub fn file_selected(&mut self, file_name: &str) {
        self.uploaded_file_label = format!("Selected file: {file_name}");
    }

    pub fn clear_file_upload(&mut self) {
        self.uploaded_file_label.clear();
    }

    pub fn document_loaded(&mut self, src: String) {
        self.document_viewer_src = Some(src);
        self.document_viewer_visible = true;
        self.switch_tab(Tab::Pdf);
        self.results_visible = true;
        self.analysis_results_visible = false;
    }

    /// A local file shown without a server round-trip; prior analysis output stays.
    pub fn local_document_loaded(&mut self, src: String) {
        self.document_viewer_src = Some(src);
        self.document_viewer_visible = true;
        self.results_visible = true;
        self.switch_tab(Tab::Pdf);
    }

    pub fn analysis_started(&mut self) {
        self.loading = true;
        self.analysis_content_visible = false;
        self.analysis_results_visible = false;
    }

    pub fn analysis_succeeded(&mut self, pdf_url: String) {
        self.loading = false;
        self.analysis_viewer_src = Some(pdf_url);
        self.analysis_results_visible = true;
        self.results_visible = true;
        self.switch_tab(Tab::Analysis);
    }

    pub fn analysis_failed(&mut self, banner: ErrorBanner) {
        self.loading = false;
        self.show_error(banner);
    }
}
