#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for ride insights.
//!
//! Provides [`PanelSpinner`], an `indicatif` spinner shown while a panel is
//! loading, plus [`init_logger`] which sets up `indicatif-log-bridge` so
//! that `log::info!` and friends are suspended while spinners redraw.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Spinner for one panel's in-flight fetch.
pub struct PanelSpinner {
    bar: ProgressBar,
    title: String,
}

impl PanelSpinner {
    /// Adds a spinner for `title` to `multi` and starts ticking.
    #[must_use]
    pub fn start(multi: &MultiProgress, title: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("{title}: loading"));

        Self {
            bar,
            title: title.to_string(),
        }
    }

    /// Shows that the panel is being fetched again after a failure.
    pub fn retrying(&self, attempt: u32, retries: u32) {
        self.bar
            .set_message(format!("{}: retrying ({attempt}/{retries})", self.title));
    }

    /// Stops the spinner with a success line.
    pub fn ready(&self, detail: &str) {
        self.finish_with_style("{msg:.green}", &format!("{}: {detail}", self.title));
    }

    /// Stops the spinner with a failure line.
    pub fn failed(&self, message: &str) {
        self.finish_with_style("{msg:.red}", &format!("{}: {message}", self.title));
    }

    /// Current spinner text.
    #[must_use]
    pub fn message(&self) -> String {
        self.bar.message()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }

    fn finish_with_style(&self, template: &str, message: &str) {
        if let Ok(style) = ProgressStyle::with_template(template) {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(message.to_string());
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while spinners redraw.
///
/// Returns the [`MultiProgress`] that all spinners must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // already set, e.g. in tests

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    fn hidden() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn spinner_reports_each_stage() {
        let multi = hidden();
        let spinner = PanelSpinner::start(&multi, "Ride Summary");
        assert_eq!(spinner.message(), "Ride Summary: loading");
        assert!(!spinner.is_finished());

        spinner.retrying(1, 3);
        assert_eq!(spinner.message(), "Ride Summary: retrying (1/3)");

        spinner.ready("ready");
        assert!(spinner.is_finished());
        assert_eq!(spinner.message(), "Ride Summary: ready");
    }

    #[test]
    fn failed_spinner_keeps_error_text() {
        let multi = hidden();
        let spinner = PanelSpinner::start(&multi, "Pickup Clusters");
        spinner.failed("HTTP 500");
        assert!(spinner.is_finished());
        assert_eq!(spinner.message(), "Pickup Clusters: HTTP 500");
    }
}
