//! Routes view-port events into the listing, viewing and analysis workflows.

use std::{collections::HashSet, sync::Arc};

use shared::{
    domain::{AnalysisSource, BillId, Tab},
    protocol::AnalyzeResponse,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    blob::ObjectUrlStore,
    error::{AnalysisError, InputError},
    port::{Control, UiEvent, ViewPort},
    token::{RequestToken, RequestTokens, Workflow},
    upload::UploadedFile,
    view::{ErrorBanner, ViewState},
    AnalysisUpload, PolicyBackend,
};

const BILL_DOCUMENT_MIME: &str = "application/pdf";
const BILL_DOCUMENT_FALLBACK: &str = "An error occurred while fetching the PDF";
const ANALYSIS_FALLBACK: &str = "An error occurred";
const ANALYSIS_ERROR_PREFIX: &str = "An error occurred while analyzing the policy: ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub topic: Option<String>,
    pub state: Option<String>,
    pub selected_bill: Option<BillId>,
    pub uploaded_file: Option<UploadedFile>,
}

impl Selection {
    /// An uploaded file takes priority over a selected bill.
    pub fn analysis_source(&self) -> Option<AnalysisSource> {
        if self.uploaded_file.is_some() {
            Some(AnalysisSource::File)
        } else if self.selected_bill.is_some() {
            Some(AnalysisSource::Pdf)
        } else {
            None
        }
    }

    fn listing_query(&self) -> Option<(String, String)> {
        match (self.topic.as_deref(), self.state.as_deref()) {
            (Some(topic), Some(state)) if !topic.is_empty() && !state.is_empty() => {
                Some((topic.to_string(), state.to_string()))
            }
            _ => None,
        }
    }

    fn clear_bill(&mut self) {
        self.topic = None;
        self.state = None;
        self.selected_bill = None;
    }
}

/// Controls that were found on the view port at bind time.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    bound: HashSet<Control>,
}

impl Bindings {
    pub fn resolve(port: &dyn ViewPort) -> Self {
        let present: HashSet<Control> = Control::ALL
            .into_iter()
            .filter(|control| {
                let found = port.has_control(*control);
                if !found {
                    warn!(element = control.element_id(), "element not found");
                }
                found
            })
            .collect();

        let mut bound = HashSet::new();
        for control in [
            Control::FileInput,
            Control::BillSelect,
            Control::AnalyzeButton,
            Control::UploadButton,
        ] {
            if present.contains(&control) {
                bound.insert(control);
            } else {
                error!(
                    element = control.element_id(),
                    "control missing; event binding skipped"
                );
            }
        }
        // Selector and tab pairs only make sense together.
        for (a, b) in [
            (Control::TopicSelect, Control::StateSelect),
            (Control::PdfTab, Control::AnalysisTab),
        ] {
            if present.contains(&a) && present.contains(&b) {
                bound.insert(a);
                bound.insert(b);
            } else {
                warn!(
                    first = a.element_id(),
                    second = b.element_id(),
                    "control pair incomplete; event binding skipped"
                );
            }
        }

        Self { bound }
    }

    pub fn is_bound(&self, control: Control) -> bool {
        self.bound.contains(&control)
    }
}

#[derive(Default)]
struct ControllerState {
    view: ViewState,
    selection: Selection,
    tokens: RequestTokens,
    blobs: ObjectUrlStore,
}

impl ControllerState {
    fn sync_analysis_input(&mut self) {
        self.view.analysis_input = self.selection.analysis_source();
    }

    fn accept(&self, token: RequestToken) -> bool {
        let current = self.tokens.is_current(token);
        if !current {
            debug!(
                workflow = token.workflow.as_str(),
                seq = token.seq,
                "discarding superseded response"
            );
        }
        current
    }
}

enum PendingAnalysis {
    File(UploadedFile),
    Bill(BillId),
}

pub struct UiController {
    backend: Arc<dyn PolicyBackend>,
    port: Arc<dyn ViewPort>,
    bindings: Bindings,
    inner: Mutex<ControllerState>,
}

impl UiController {
    /// Looks up every control on `port`, logs the missing ones and renders the
    /// initial view.
    pub fn bind(backend: Arc<dyn PolicyBackend>, port: Arc<dyn ViewPort>) -> Arc<Self> {
        let bindings = Bindings::resolve(port.as_ref());
        let state = ControllerState::default();
        port.render(&state.view);
        info!("controller initialized");
        Arc::new(Self {
            backend,
            port,
            bindings,
            inner: Mutex::new(state),
        })
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub async fn view(&self) -> ViewState {
        self.inner.lock().await.view.clone()
    }

    pub async fn selection(&self) -> Selection {
        self.inner.lock().await.selection.clone()
    }

    /// Bytes behind the document viewer when it shows a fetched bill.
    pub async fn displayed_document(&self) -> Option<Vec<u8>> {
        let inner = self.inner.lock().await;
        let src = inner.view.document_viewer_src.as_deref()?;
        inner.blobs.resolve(src).map(|(_, bytes)| bytes.to_vec())
    }

    pub async fn dispatch(&self, event: UiEvent) {
        let control = event.control();
        if !self.bindings.is_bound(control) {
            warn!(
                event = event.name(),
                element = control.element_id(),
                "ignoring event from unbound control"
            );
            return;
        }

        match event {
            UiEvent::TopicChanged(topic) => {
                {
                    let mut inner = self.inner.lock().await;
                    inner.view.topic_value = topic.clone();
                    inner.selection.topic = Some(topic);
                }
                self.refresh_bills().await;
            }
            UiEvent::StateChanged(state) => {
                {
                    let mut inner = self.inner.lock().await;
                    inner.view.state_value = state.clone();
                    inner.selection.state = Some(state);
                }
                self.refresh_bills().await;
            }
            UiEvent::BillChanged(value) => self.select_bill(value).await,
            UiEvent::FileSelected(file) => self.select_file(file).await,
            UiEvent::UploadClicked => self.show_uploaded_file().await,
            UiEvent::AnalyzeClicked => self.analyze().await,
            UiEvent::TabClicked(tab) => self.switch_tab(tab).await,
        }
    }

    fn render(&self, state: &ControllerState) {
        self.port.render(&state.view);
    }

    async fn switch_tab(&self, tab: Tab) {
        let mut inner = self.inner.lock().await;
        debug!(tab = tab.as_str(), "switching tab");
        inner.view.switch_tab(tab);
        self.render(&inner);
    }

    async fn refresh_bills(&self) {
        let (token, topic, state) = {
            let mut inner = self.inner.lock().await;
            let Some((topic, state)) = inner.selection.listing_query() else {
                // The selectors no longer describe any in-flight query.
                inner.tokens.invalidate(Workflow::Listing);
                self.render(&inner);
                return;
            };
            (inner.tokens.issue(Workflow::Listing), topic, state)
        };

        let result = self.backend.list_bills(&topic, &state).await;

        let mut inner = self.inner.lock().await;
        if !inner.accept(token) {
            return;
        }
        match result {
            Ok(bills) => {
                info!(%topic, %state, count = bills.len(), "bills listed");
                inner.view.bills_listed(&topic, &state, &bills);
                inner.view.hide_error();
                inner.selection.selected_bill = None;
                inner.sync_analysis_input();
            }
            Err(err) => {
                error!(%topic, %state, error = %err, "fetching bills failed");
                inner
                    .view
                    .show_error(ErrorBanner::transport(format!("Error fetching bills: {err}")));
            }
        }
        self.render(&inner);
    }

    async fn select_bill(&self, value: String) {
        let (token, bill_id) = {
            let mut inner = self.inner.lock().await;
            inner.view.selected_bill_value = value.clone();
            if value.is_empty() {
                inner.selection.selected_bill = None;
                inner.tokens.invalidate(Workflow::Viewing);
                inner.sync_analysis_input();
                self.render(&inner);
                return;
            }
            let bill_id = BillId::new(value);
            inner.selection.selected_bill = Some(bill_id.clone());
            if inner.selection.uploaded_file.take().is_some() {
                debug!("bill selected; clearing pending file upload");
            }
            inner.view.clear_file_upload();
            inner.sync_analysis_input();
            self.render(&inner);
            (inner.tokens.issue(Workflow::Viewing), bill_id)
        };

        let result = self.backend.fetch_bill_document(&bill_id).await;

        let mut inner = self.inner.lock().await;
        if !inner.accept(token) {
            return;
        }
        match result {
            Ok(bytes) => {
                info!(bill_id = %bill_id, bytes = bytes.len(), "bill document loaded");
                let url = inner.blobs.register(bytes, BILL_DOCUMENT_MIME);
                inner.view.document_loaded(url);
            }
            Err(err) => {
                error!(bill_id = %bill_id, error = %err, "fetching bill document failed");
                let message = err.server_message().unwrap_or(BILL_DOCUMENT_FALLBACK);
                let banner = ErrorBanner::transport(message);
                inner.view.show_error(banner);
            }
        }
        self.render(&inner);
    }

    async fn select_file(&self, file: Option<UploadedFile>) {
        let mut inner = self.inner.lock().await;
        match file {
            Some(file) => {
                info!(file = %file.name, bytes = file.bytes.len(), "file selected");
                inner.view.file_selected(&file.name);
                inner.selection.uploaded_file = Some(file);
                inner.selection.clear_bill();
                inner.view.reset_bill_selection();
                // Late listing or document responses would bring the bill back.
                inner.tokens.invalidate(Workflow::Listing);
                inner.tokens.invalidate(Workflow::Viewing);
            }
            None => {
                debug!("file selection cleared");
                inner.selection.uploaded_file = None;
                inner.view.clear_file_upload();
            }
        }
        inner.sync_analysis_input();
        self.render(&inner);
    }

    async fn show_uploaded_file(&self) {
        let mut inner = self.inner.lock().await;
        let checked = match inner.selection.uploaded_file.as_ref() {
            None => Err(InputError::NoFileSelected),
            Some(file) => file.validate().map(|()| file.to_data_url()),
        };
        match checked {
            Ok(data_url) => {
                info!("showing uploaded file locally");
                inner.view.local_document_loaded(data_url);
            }
            Err(err) => {
                warn!(error = ?err, "upload rejected");
                inner.view.show_error(ErrorBanner::input(err.to_string()));
            }
        }
        self.render(&inner);
    }

    async fn analyze(&self) {
        let (token, pending) = {
            let mut inner = self.inner.lock().await;
            inner.view.hide_error();
            let pending = match Self::resolve_analysis_input(&inner.selection) {
                Ok(pending) => pending,
                Err(err) => {
                    warn!(error = ?err, "analysis not started");
                    inner.view.show_error(ErrorBanner::input(err.to_string()));
                    self.render(&inner);
                    return;
                }
            };
            let source = match &pending {
                PendingAnalysis::File(_) => AnalysisSource::File,
                PendingAnalysis::Bill(_) => AnalysisSource::Pdf,
            };
            info!(source = source.as_str(), "submitting for analysis");
            inner.view.analysis_started();
            self.render(&inner);
            (inner.tokens.issue(Workflow::Analysis), pending)
        };

        let result = self.run_analysis(pending).await;

        let mut inner = self.inner.lock().await;
        if !inner.accept(token) {
            return;
        }
        match result {
            Ok(pdf_url) => {
                info!(%pdf_url, "analysis complete");
                inner.view.analysis_succeeded(pdf_url);
            }
            Err(err) => {
                error!(error = %err, "analysis failed");
                let message = format!("{ANALYSIS_ERROR_PREFIX}{err}");
                let banner = if err.is_application() {
                    ErrorBanner::application(message)
                } else {
                    ErrorBanner::transport(message)
                };
                inner.view.analysis_failed(banner);
            }
        }
        self.render(&inner);
    }

    fn resolve_analysis_input(selection: &Selection) -> Result<PendingAnalysis, InputError> {
        if let Some(file) = &selection.uploaded_file {
            file.validate()?;
            return Ok(PendingAnalysis::File(file.clone()));
        }
        if let Some(bill_id) = &selection.selected_bill {
            return Ok(PendingAnalysis::Bill(bill_id.clone()));
        }
        Err(InputError::NothingToAnalyze)
    }

    async fn run_analysis(&self, pending: PendingAnalysis) -> Result<String, AnalysisError> {
        let upload = match pending {
            PendingAnalysis::File(file) => AnalysisUpload::from_file(&file),
            PendingAnalysis::Bill(bill_id) => {
                let bytes = self
                    .backend
                    .fetch_bill_document(&bill_id)
                    .await
                    .map_err(AnalysisError::bill_document)?;
                AnalysisUpload::bill_document(bytes)
            }
        };

        let response: AnalyzeResponse = self
            .backend
            .analyze(upload)
            .await
            .map_err(AnalysisError::from_analyze)?;

        if !response.success {
            let message = response
                .error
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| ANALYSIS_FALLBACK.to_string());
            return Err(AnalysisError::Application(message));
        }
        response.pdf_url.ok_or(AnalysisError::MissingReport)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
