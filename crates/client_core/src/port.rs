//! View port: the boundary between the controller and whatever renders it.

use shared::domain::Tab;

use crate::{upload::UploadedFile, view::ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    FileInput,
    BillSelect,
    AnalyzeButton,
    UploadButton,
    TopicSelect,
    StateSelect,
    PdfTab,
    AnalysisTab,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Control::FileInput,
        Control::BillSelect,
        Control::AnalyzeButton,
        Control::UploadButton,
        Control::TopicSelect,
        Control::StateSelect,
        Control::PdfTab,
        Control::AnalysisTab,
    ];

    /// Element id the control is looked up by.
    pub fn element_id(self) -> &'static str {
        match self {
            Control::FileInput => "file-input",
            Control::BillSelect => "bills",
            Control::AnalyzeButton => "analyze-policy-btn",
            Control::UploadButton => "upload-file-btn",
            Control::TopicSelect => "topic",
            Control::StateSelect => "state",
            Control::PdfTab => "pdf-tab",
            Control::AnalysisTab => "analysis-tab",
        }
    }
}

pub trait ViewPort: Send + Sync {
    fn has_control(&self, control: Control) -> bool;
    fn render(&self, view: &ViewState);
}

/// User actions delivered by the view port.
#[derive(Debug, Clone)]
pub enum UiEvent {
    TopicChanged(String),
    StateChanged(String),
    BillChanged(String),
    FileSelected(Option<UploadedFile>),
    UploadClicked,
    AnalyzeClicked,
    TabClicked(Tab),
}

impl UiEvent {
    pub fn control(&self) -> Control {
        match self {
            UiEvent::TopicChanged(_) => Control::TopicSelect,
            UiEvent::StateChanged(_) => Control::StateSelect,
            UiEvent::BillChanged(_) => Control::BillSelect,
            UiEvent::FileSelected(_) => Control::FileInput,
            UiEvent::UploadClicked => Control::UploadButton,
            UiEvent::AnalyzeClicked => Control::AnalyzeButton,
            UiEvent::TabClicked(Tab::Pdf) => Control::PdfTab,
            UiEvent::TabClicked(Tab::Analysis) => Control::AnalysisTab,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::TopicChanged(_) => "topic_changed",
            UiEvent::StateChanged(_) => "state_changed",
            UiEvent::BillChanged(_) => "bill_changed",
            UiEvent::FileSelected(_) => "file_selected",
            UiEvent::UploadClicked => "upload_clicked",
            UiEvent::AnalyzeClicked => "analyze_clicked",
            UiEvent::TabClicked(_) => "tab_clicked",
        }
    }
}
