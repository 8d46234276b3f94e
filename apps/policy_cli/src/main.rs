use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpPolicyBackend, UiController, UiEvent, UploadedFile, ViewState};
use shared::catalog;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_settings, prepare_report_dir};
use terminal::TerminalPort;

#[derive(Parser, Debug)]
struct Cli {
    /// Backend base url; overrides settings file and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the topics offered by the topic selector.
    Topics,
    /// List the state codes offered by the state selector.
    States,
    /// List bills for a topic in a state.
    Bills {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        state: String,
    },
    /// Fetch a bill's document.
    View {
        #[arg(long)]
        bill_id: String,
        /// Where to write the document; defaults to `<report_dir>/<bill_id>.pdf`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Submit a local file or a listed bill for analysis.
    Analyze {
        #[arg(long, conflicts_with = "bill_id", required_unless_present = "bill_id")]
        file: Option<PathBuf>,
        #[arg(long)]
        bill_id: Option<String>,
        /// Download the generated report into the report directory.
        #[arg(long)]
        save_report: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Topics => {
            for topic in catalog::TOPICS {
                println!("{topic}");
            }
            return Ok(());
        }
        Command::States => {
            for state in catalog::US_STATES {
                println!("{state}");
            }
            return Ok(());
        }
        _ => {}
    }

    let backend = Arc::new(
        HttpPolicyBackend::new(&settings.server_url)
            .with_context(|| format!("invalid server url '{}'", settings.server_url))?,
    );
    let controller = UiController::bind(backend.clone(), Arc::new(TerminalPort::default()));
    info!(server_url = %backend.base_url(), "connected controller to backend");

    match cli.command {
        Command::Topics | Command::States => {}
        Command::Bills { topic, state } => {
            if !catalog::is_known_topic(&topic) {
                warn!(%topic, "topic is not one of the selector choices");
            }
            if !catalog::is_known_state(&state) {
                warn!(%state, "state is not one of the selector choices");
            }
            controller.dispatch(UiEvent::TopicChanged(topic)).await;
            controller.dispatch(UiEvent::StateChanged(state)).await;

            let view = ensure_no_error(controller.view().await)?;
            if let Some(message) = &view.no_bills_message {
                println!("{message}");
            }
            for option in view.bill_options.iter().filter(|o| !o.is_placeholder()) {
                println!("{}\t{}", option.value, option.label);
            }
        }
        Command::View { bill_id, out } => {
            controller.dispatch(UiEvent::BillChanged(bill_id.clone())).await;
            ensure_no_error(controller.view().await)?;

            let bytes = controller
                .displayed_document()
                .await
                .context("no document is displayed")?;
            let path = match out {
                Some(path) => path,
                None => prepare_report_dir(&settings.report_dir)?.join(format!(
                    "{}.pdf",
                    sanitize_file_stem(&bill_id)
                )),
            };
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("failed to write document to '{}'", path.display()))?;
            println!("saved {} bytes to {}", bytes.len(), path.display());
        }
        Command::Analyze {
            file,
            bill_id,
            save_report,
        } => {
            if let Some(path) = file {
                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("failed to read '{}'", path.display()))?;
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                controller
                    .dispatch(UiEvent::FileSelected(Some(UploadedFile::new(name, bytes))))
                    .await;
            } else if let Some(bill_id) = bill_id {
                controller.dispatch(UiEvent::BillChanged(bill_id)).await;
                ensure_no_error(controller.view().await)?;
            }

            let view = controller.view().await;
            if let Some(source) = view.analysis_input {
                println!("analysis input: {}", source.as_str());
            }
            controller.dispatch(UiEvent::AnalyzeClicked).await;

            let view = ensure_no_error(controller.view().await)?;
            let Some(pdf_url) = view.analysis_viewer_src else {
                bail!("analysis finished without a report");
            };
            println!("report: {}", backend.resolve_report_url(&pdf_url)?);

            if save_report {
                let report = backend.download_report(&pdf_url).await?;
                let path = prepare_report_dir(&settings.report_dir)?.join("analysis_report.pdf");
                tokio::fs::write(&path, &report)
                    .await
                    .with_context(|| format!("failed to write report to '{}'", path.display()))?;
                println!("saved report to {}", path.display());
            }
        }
    }

    Ok(())
}

fn ensure_no_error(view: ViewState) -> Result<ViewState> {
    if let Some(message) = view.error_message() {
        bail!("{message}");
    }
    Ok(view)
}

fn sanitize_file_stem(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
