//! Drives panels to a settled state and collects their output.

use chrono::{DateTime, Utc};
use ride_insights_cli_utils::{MultiProgress, PanelSpinner};
use ride_insights_panel::{
    PanelController, PanelFailure, PanelKind, PanelPipeline, PanelStatus, PanelViewState,
};
use ride_insights_source::RideSource;
use serde::Serialize;
use serde_json::Value;

use crate::OutputFormat;
use crate::render::{self, RenderView};

/// Settings shared by every panel in one invocation.
pub struct RunOptions<'a> {
    pub format: OutputFormat,
    pub retries: u32,
    pub multi: &'a MultiProgress,
}

/// A panel's printable result.
pub enum Rendered {
    Text(String),
    Json(Value),
}

pub struct PanelOutcome {
    /// The panel ended in the error state.
    pub failed: bool,
    pub rendered: Rendered,
}

/// JSON shape of a settled panel.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PanelReport<'a, T> {
    panel: PanelKind,
    title: &'static str,
    status: PanelStatus,
    updated_at: Option<DateTime<Utc>>,
    data: Option<&'a T>,
    error: Option<&'a PanelFailure>,
}

impl<'a, T> PanelReport<'a, T> {
    fn new(kind: PanelKind, state: &'a PanelViewState<T>) -> Self {
        Self {
            panel: kind,
            title: kind.title(),
            status: state.status(),
            updated_at: state.loaded().map(|loaded| loaded.updated_at),
            data: state.data(),
            error: state.failure(),
        }
    }
}

/// Mounts the panel, refreshing it up to `retries` more times while it
/// is in the error state. A spinner is shown until it settles.
pub async fn settle<P: PanelPipeline>(
    controller: &PanelController<P>,
    source: &dyn RideSource,
    retries: u32,
    multi: &MultiProgress,
) -> PanelViewState<P::View> {
    let kind = controller.kind();
    let spinner = PanelSpinner::start(multi, kind.title());

    controller.mount(source).await;

    let mut attempt = 0;
    while controller.status() == PanelStatus::Error && attempt < retries {
        attempt += 1;
        log::info!("[{kind}] Retrying ({attempt}/{retries})");
        spinner.retrying(attempt, retries);
        controller.refresh(source).await;
    }

    let state = controller.snapshot();
    match state.failure() {
        Some(failure) => spinner.failed(&failure.message),
        None => spinner.ready("ready"),
    }
    state
}

/// Settles one panel and renders it in the requested format.
///
/// # Errors
///
/// Returns an error if the panel state cannot be serialized.
pub async fn panel<P>(
    controller: &PanelController<P>,
    source: &dyn RideSource,
    options: &RunOptions<'_>,
) -> Result<PanelOutcome, serde_json::Error>
where
    P: PanelPipeline,
    P::View: RenderView + Serialize,
{
    let kind = controller.kind();
    let state = settle(controller, source, options.retries, options.multi).await;

    let rendered = match options.format {
        OutputFormat::Text => Rendered::Text(render::panel_text(kind, &state, options.retries)),
        OutputFormat::Json => Rendered::Json(serde_json::to_value(PanelReport::new(kind, &state))?),
        OutputFormat::Geojson => match state.data().and_then(RenderView::feature_collection) {
            Some(collection) => Rendered::Json(serde_json::to_value(collection)?),
            None => Rendered::Json(serde_json::to_value(PanelReport::new(kind, &state))?),
        },
    };

    Ok(PanelOutcome {
        failed: state.status() == PanelStatus::Error,
        rendered,
    })
}

/// Joins panel outputs into the text printed to stdout. Several JSON
/// outputs become one array.
///
/// # Errors
///
/// Returns an error if JSON output cannot be serialized.
pub fn document(outcomes: Vec<PanelOutcome>) -> Result<String, serde_json::Error> {
    let mut text = Vec::new();
    let mut json = Vec::new();
    for outcome in outcomes {
        match outcome.rendered {
            Rendered::Text(t) => text.push(t),
            Rendered::Json(v) => json.push(v),
        }
    }

    if json.is_empty() {
        return Ok(text.join("\n"));
    }
    let json = if json.len() == 1 {
        json.swap_remove(0)
    } else {
        Value::Array(json)
    };
    serde_json::to_string_pretty(&json)
}
