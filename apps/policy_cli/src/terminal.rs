//! Terminal rendering of the controller's view state.

use std::sync::Mutex;

use client_core::{Control, ViewPort, ViewState};

/// Prints transitions the user should see; everything else goes to the log.
#[derive(Default)]
pub struct TerminalPort {
    last: Mutex<Option<ViewState>>,
}

impl ViewPort for TerminalPort {
    fn has_control(&self, _control: Control) -> bool {
        true
    }

    fn render(&self, view: &ViewState) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        let previous = last.replace(view.clone());

        let was_loading = previous.as_ref().is_some_and(|p| p.loading);
        if view.loading && !was_loading {
            eprintln!("analyzing...");
        }
        if view.error != previous.as_ref().and_then(|p| p.error.clone()) {
            if let Some(banner) = &view.error {
                eprintln!("error: {}", banner.message);
            }
        }
        if !view.uploaded_file_label.is_empty()
            && previous.as_ref().map(|p| p.uploaded_file_label.as_str())
                != Some(view.uploaded_file_label.as_str())
        {
            eprintln!("{}", view.uploaded_file_label);
        }
        tracing::debug!(
            tab = view.active_tab.as_str(),
            loading = view.loading,
            results = view.results_visible,
            options = view.bill_options.len(),
            "view rendered"
        );
    }
}
