use std::path::PathBuf;

use crate::data::loader::{self, SpectrumPreview};
use crate::data::model::SelectedFile;
use crate::data::options::OptionsForm;
use crate::error::ClientError;
use crate::render::Chart;
use crate::session::{self, Completion, Session};
use crate::worker::{WorkerRequest, WorkerResult};

// ---------------------------------------------------------------------------
// User notices (modal messages)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Uploaded dataset and request sequencing.
    pub session: Session,

    /// Files picked but not necessarily uploaded yet.
    pub selection: Vec<SelectedFile>,

    /// Local parse of each selected file (error text if it did not parse).
    pub previews: Vec<Result<SpectrumPreview, String>>,

    /// Processing option widgets.
    pub form: OptionsForm,

    /// Chart currently shown; replaced on every successful render.
    pub chart: Option<Chart>,

    /// Status line shown in the top bar.
    pub status: String,

    /// Blocking message, shown until dismissed.
    pub notice: Option<Notice>,

    /// Requests sent to the worker and not yet answered.
    pub pending: usize,

    /// Send single-series results to `/plot_spectrum` before drawing.
    pub confirm_plots: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: Session::new(),
            selection: Vec::new(),
            previews: Vec::new(),
            form: OptionsForm::default(),
            chart: None,
            status: "No data uploaded".into(),
            notice: None,
            pending: 0,
            confirm_plots: false,
        }
    }
}

impl AppState {
    /// Log a failure and show it to the user.
    pub fn report(&mut self, err: &ClientError) {
        log::error!("{err}");
        self.notice = Some(Notice {
            title: err.kind().title().to_string(),
            message: err.to_string(),
        });
    }

    /// Replace the file selection with the given paths.
    pub fn select_files(&mut self, paths: &[PathBuf]) {
        match loader::read_selection(paths) {
            Ok(files) => {
                self.previews = files
                    .iter()
                    .map(|f| loader::preview(&f.bytes).map_err(|e| format!("{e:#}")))
                    .collect();
                log::info!("Selected {} file(s)", files.len());
                self.selection = files;
            }
            Err(e) => self.report(&e),
        }
    }

    /// Validate and queue an upload. `None` when validation failed.
    pub fn start_upload(&mut self) -> Option<WorkerRequest> {
        log::info!("Upload requested");
        match self.session.prepare_upload(self.selection.clone()) {
            Ok(job) => {
                self.pending += 1;
                self.status = format!("Uploading {} file(s)…", job.files.len());
                Some(WorkerRequest::Upload(job))
            }
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Validate and queue a processing request.
    pub fn start_process(&mut self) -> Option<WorkerRequest> {
        log::info!("Processing requested");
        match self.session.prepare_process(&self.form) {
            Ok(job) => {
                self.pending += 1;
                self.status = "Processing…".into();
                Some(WorkerRequest::Process(job))
            }
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Apply a worker reply. May return a follow-up request to dispatch.
    pub fn handle(&mut self, result: WorkerResult) -> Option<WorkerRequest> {
        self.pending = self.pending.saturating_sub(1);

        match result {
            WorkerResult::Uploaded(job, response) => {
                match self.session.complete_upload(job.ticket, response) {
                    Ok(Completion::Applied(summary)) => self.status = summary.to_string(),
                    Ok(Completion::Superseded) => {}
                    Err(e) => {
                        self.status = "Upload failed".into();
                        self.report(&e);
                    }
                }
                None
            }
            WorkerResult::Processed(job, response) => {
                let result = match self.session.complete_process(&job, response) {
                    Ok(Completion::Applied(result)) => result,
                    Ok(Completion::Superseded) => return None,
                    Err(e) => {
                        self.status = "Processing failed".into();
                        self.report(&e);
                        return None;
                    }
                };

                if self.confirm_plots {
                    if let Some(plot_job) = self.session.prepare_plot(job.ticket, &result) {
                        self.pending += 1;
                        return Some(WorkerRequest::ConfirmPlot(plot_job));
                    }
                }
                self.show(session::plot_result(&result));
                None
            }
            WorkerResult::PlotConfirmed(job, response) => {
                match self.session.complete_plot(&job, response) {
                    Ok(Completion::Applied(chart)) => self.show(Ok(chart)),
                    Ok(Completion::Superseded) => {}
                    Err(e) => {
                        self.status = "Plotting failed".into();
                        self.report(&e);
                    }
                }
                None
            }
        }
    }

    fn show(&mut self, chart: crate::error::Result<Chart>) {
        match chart {
            Ok(chart) => {
                self.status = format!(
                    "Plotted {} spectra, {} with peaks",
                    chart.lines().count(),
                    chart.markers().count()
                );
                self.chart = Some(chart);
            }
            Err(e) => {
                self.status = "Plotting failed".into();
                self.report(&e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::HttpResponse;

    fn ok(body: serde_json::Value) -> crate::error::Result<HttpResponse> {
        Ok(HttpResponse {
            status: 200,
            status_text: "OK".into(),
            body: body.to_string(),
        })
    }

    fn uploaded_state() -> AppState {
        let mut state = AppState::default();
        state.selection = vec![SelectedFile { name: "a.txt".into(), bytes: vec![] }];
        let Some(WorkerRequest::Upload(job)) = state.start_upload() else {
            panic!("expected upload request");
        };
        state.handle(WorkerResult::Uploaded(
            job,
            ok(json!({ "files": ["a.txt"], "frequencies": [10, 20, 30], "amplitudes": [1, 2, 3] })),
        ));
        state
    }

    #[test]
    fn upload_without_selection_shows_validation_notice() {
        let mut state = AppState::default();
        assert!(state.start_upload().is_none());
        let notice = state.notice.unwrap();
        assert_eq!(notice.title, "Check your input");
        assert_eq!(state.pending, 0);
    }

    #[test]
    fn process_without_upload_shows_notice() {
        let mut state = AppState::default();
        assert!(state.start_process().is_none());
        assert!(state.notice.unwrap().message.contains("upload a file first"));
    }

    #[test]
    fn upload_then_process_draws_chart() {
        let mut state = uploaded_state();
        assert!(state.status.starts_with("Uploaded 1 file(s)"));
        assert_eq!(state.pending, 0);

        let Some(WorkerRequest::Process(job)) = state.start_process() else {
            panic!("expected process request");
        };
        let follow_up = state.handle(WorkerResult::Processed(
            job,
            ok(json!({ "processed_amplitudes": [1, 2, 3], "peaks": [[1]] })),
        ));
        assert!(follow_up.is_none());
        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.traces.len(), 2);
        assert!(state.notice.is_none());
    }

    #[test]
    fn out_of_range_peaks_notify_instead_of_plotting() {
        let mut state = uploaded_state();
        let Some(WorkerRequest::Process(job)) = state.start_process() else {
            panic!("expected process request");
        };
        state.handle(WorkerResult::Processed(
            job,
            ok(json!({ "processed_amplitudes": [1, 2, 3], "peaks": [7] })),
        ));
        assert!(state.chart.is_none());
        assert_eq!(state.notice.unwrap().title, "Plotting failed");
    }

    #[test]
    fn confirmation_round_trip_for_single_series() {
        let mut state = uploaded_state();
        state.confirm_plots = true;
        let Some(WorkerRequest::Process(job)) = state.start_process() else {
            panic!("expected process request");
        };
        let follow_up = state.handle(WorkerResult::Processed(
            job,
            ok(json!({ "processed_amplitudes": [1, 2, 3] })),
        ));
        let Some(WorkerRequest::ConfirmPlot(plot_job)) = follow_up else {
            panic!("expected plot confirmation");
        };
        assert!(state.chart.is_none());
        assert_eq!(state.pending, 1);

        state.handle(WorkerResult::PlotConfirmed(plot_job, ok(json!({ "ignored": true }))));
        assert_eq!(state.chart.as_ref().unwrap().title, "Spectrum");
        assert_eq!(state.pending, 0);
    }

    #[test]
    fn failed_confirmation_updates_status() {
        let mut state = uploaded_state();
        state.confirm_plots = true;
        let Some(WorkerRequest::Process(job)) = state.start_process() else {
            panic!("expected process request");
        };
        let Some(WorkerRequest::ConfirmPlot(plot_job)) = state.handle(WorkerResult::Processed(
            job,
            ok(json!({ "processed_amplitudes": [1, 2, 3] })),
        )) else {
            panic!("expected plot confirmation");
        };
        assert_eq!(state.status, "Processing…");

        let failed = Ok(HttpResponse {
            status: 500,
            status_text: "Internal Server Error".into(),
            body: String::new(),
        });
        state.handle(WorkerResult::PlotConfirmed(plot_job, failed));
        assert_eq!(state.status, "Plotting failed");
        assert!(state.chart.is_none());
        assert_eq!(state.notice.unwrap().title, "Server request failed");
        assert_eq!(state.pending, 0);
    }
}
