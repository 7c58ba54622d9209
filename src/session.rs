use std::sync::Arc;

use crate::api::wire::{self, PlotRequest, ProcessRequest};
use crate::api::{Backend, Endpoint, HttpResponse};
use crate::data::model::{Dataset, ProcessedResult, SelectedFile};
use crate::data::options::{OptionsForm, ProcessingOptions};
use crate::error::{ClientError, Result};
use crate::render::{self, Chart};

// ---------------------------------------------------------------------------
// Request sequencing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Process,
}

/// Identifies one request. Only the latest ticket per operation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub op: Operation,
    pub seq: u64,
}

/// Outcome of completing a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion<T> {
    Applied(T),
    /// A newer request of the same kind was issued; this reply was dropped.
    Superseded,
}

#[cfg(test)]
impl<T> Completion<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Completion::Applied(v) => Some(v),
            Completion::Superseded => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Jobs – everything a background thread needs to perform one request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct UploadJob {
    pub ticket: Ticket,
    pub files: Vec<SelectedFile>,
}

impl UploadJob {
    pub fn send(&self, backend: &dyn Backend) -> Result<HttpResponse> {
        backend.post_multipart(Endpoint::UploadFiles, &self.files)
    }
}

#[derive(Debug, Clone)]
pub struct ProcessJob {
    pub ticket: Ticket,
    /// Dataset the request was built from; replies are aligned against it.
    pub dataset: Arc<Dataset>,
    pub body: serde_json::Value,
}

impl ProcessJob {
    pub fn send(&self, backend: &dyn Backend) -> Result<HttpResponse> {
        backend.post_json(Endpoint::ProcessData, &self.body)
    }
}

/// Server-side plot confirmation for a single-series result.
#[derive(Debug, Clone)]
pub struct PlotJob {
    pub ticket: Ticket,
    pub frequencies: Vec<f64>,
    pub amplitudes: Vec<f64>,
    pub peaks: Vec<usize>,
}

impl PlotJob {
    pub fn send(&self, backend: &dyn Backend) -> Result<HttpResponse> {
        let body = serde_json::to_value(PlotRequest {
            frequencies: &self.frequencies,
            amplitudes: &self.amplitudes,
            peaks: &self.peaks,
        })?;
        backend.post_json(Endpoint::PlotSpectrum, &body)
    }
}

/// Result of a successful upload, for the status line.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSummary {
    pub files: usize,
    pub names: Vec<String>,
    pub points: usize,
}

impl std::fmt::Display for UploadSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Uploaded {} file(s): {} ({} points)",
            self.files,
            self.names.join(", "),
            self.points
        )
    }
}

fn http_error(endpoint: Endpoint, response: &HttpResponse, reason: Option<String>) -> ClientError {
    ClientError::Http {
        endpoint: endpoint.path(),
        status: response.status,
        reason: reason.unwrap_or_else(|| response.status_text.clone()),
    }
}

// ---------------------------------------------------------------------------
// Session – owns the cached dataset and the request sequence numbers
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Session {
    dataset: Option<Arc<Dataset>>,
    upload_seq: u64,
    process_seq: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset from the latest successful upload.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        let latest = match ticket.op {
            Operation::Upload => self.upload_seq,
            Operation::Process => self.process_seq,
        };
        ticket.seq == latest
    }

    fn next_ticket(&mut self, op: Operation) -> Ticket {
        let seq = match op {
            Operation::Upload => &mut self.upload_seq,
            Operation::Process => &mut self.process_seq,
        };
        *seq += 1;
        Ticket { op, seq: *seq }
    }

    // ---- Upload ----

    /// Validate the selection and issue a ticket. No network I/O.
    pub fn prepare_upload(&mut self, files: Vec<SelectedFile>) -> Result<UploadJob> {
        if files.is_empty() {
            return Err(ClientError::NoFilesSelected);
        }
        Ok(UploadJob {
            ticket: self.next_ticket(Operation::Upload),
            files,
        })
    }

    /// Apply an upload reply. The cached dataset changes only on full success.
    pub fn complete_upload(
        &mut self,
        ticket: Ticket,
        response: Result<HttpResponse>,
    ) -> Result<Completion<UploadSummary>> {
        if !self.is_current(ticket) {
            log::info!("Discarding superseded upload reply #{}", ticket.seq);
            return Ok(Completion::Superseded);
        }

        let response = response?;
        log::debug!("/upload_files replied {}: {}", response.status, response.body);
        if !response.is_success() {
            return Err(http_error(Endpoint::UploadFiles, &response, None));
        }

        let body = response
            .json()
            .ok_or_else(|| ClientError::Contract("upload response is not valid JSON".into()))?;
        let dataset = wire::parse_upload(&body)?;

        let summary = UploadSummary {
            files: dataset.uploaded_files,
            names: dataset.names(),
            points: dataset.total_points(),
        };
        log::info!("{summary}");
        self.dataset = Some(Arc::new(dataset));
        Ok(Completion::Applied(summary))
    }

    // ---- Process ----

    /// Normalize the options and build the request body. No network I/O.
    pub fn prepare_process(&mut self, form: &OptionsForm) -> Result<ProcessJob> {
        let dataset = match &self.dataset {
            Some(ds) if !ds.is_empty() => Arc::clone(ds),
            _ => return Err(ClientError::NoDataset),
        };
        let options = ProcessingOptions::from_form(form);
        log::info!("Processing {} spectra with {options:?}", dataset.len());
        let body = serde_json::to_value(ProcessRequest::new(&dataset, options))?;
        Ok(ProcessJob {
            ticket: self.next_ticket(Operation::Process),
            dataset,
            body,
        })
    }

    /// Decode a processing reply into a renderable result.
    pub fn complete_process(
        &mut self,
        job: &ProcessJob,
        response: Result<HttpResponse>,
    ) -> Result<Completion<ProcessedResult>> {
        if !self.is_current(job.ticket) {
            log::info!("Discarding superseded processing reply #{}", job.ticket.seq);
            return Ok(Completion::Superseded);
        }

        let response = response?;
        log::debug!("/process_data replied {}: {}", response.status, response.body);
        let body = response.json();

        if !response.is_success() {
            let reason = body.as_ref().and_then(wire::server_error);
            return Err(http_error(Endpoint::ProcessData, &response, reason));
        }

        let body = body.ok_or_else(|| {
            ClientError::Contract("processing response is not valid JSON".into())
        })?;
        let reply = wire::parse_process(&body)?;

        let frequencies = reply.frequencies.unwrap_or_else(|| {
            job.dataset
                .spectra
                .iter()
                .map(|sp| sp.frequencies.clone())
                .collect()
        });

        Ok(Completion::Applied(ProcessedResult {
            names: job.dataset.names(),
            frequencies,
            amplitudes: reply.processed_amplitudes,
            peaks: reply.peaks,
        }))
    }

    // ---- Single-series plot confirmation ----

    /// Confirmation job for a single-series result; `None` for multi-series.
    pub fn prepare_plot(&self, ticket: Ticket, result: &ProcessedResult) -> Option<PlotJob> {
        if !result.is_single() {
            return None;
        }
        Some(PlotJob {
            ticket,
            frequencies: result.frequencies.first().cloned().unwrap_or_default(),
            amplitudes: result.amplitudes[0].clone(),
            peaks: result.peaks.first().cloned().unwrap_or_default(),
        })
    }

    /// Check the confirmation reply, then draw locally. The reply body is
    /// only logged; it never changes what is drawn.
    pub fn complete_plot(&self, job: &PlotJob, response: Result<HttpResponse>) -> Result<Completion<Chart>> {
        if !self.is_current(job.ticket) {
            log::info!("Discarding superseded plot reply #{}", job.ticket.seq);
            return Ok(Completion::Superseded);
        }

        let response = response?;
        if !response.is_success() {
            return Err(http_error(Endpoint::PlotSpectrum, &response, None));
        }
        log::debug!("/plot_spectrum replied: {}", response.body);

        render::plot_spectrum(&job.frequencies, &job.amplitudes, &job.peaks).map(Completion::Applied)
    }
}

/// Combined chart for a processing result.
pub fn plot_result(result: &ProcessedResult) -> Result<Chart> {
    render::plot_combined_spectrum(&result.names, &result.frequencies, &result.amplitudes, &result.peaks)
}

// Synchronous prepare -> send -> complete, driven on the calling thread.
#[cfg(test)]
impl Session {
    pub fn upload_files(
        &mut self,
        backend: &dyn Backend,
        files: Vec<SelectedFile>,
    ) -> Result<Completion<UploadSummary>> {
        let job = self.prepare_upload(files)?;
        let response = job.send(backend);
        self.complete_upload(job.ticket, response)
    }

    pub fn process_and_plot(
        &mut self,
        backend: &dyn Backend,
        form: &OptionsForm,
    ) -> Result<Completion<Chart>> {
        let job = self.prepare_process(form)?;
        let response = job.send(backend);
        match self.complete_process(&job, response)? {
            Completion::Applied(result) => Ok(Completion::Applied(plot_result(&result)?)),
            Completion::Superseded => Ok(Completion::Superseded),
        }
    }

    /// Notify `/plot_spectrum`, then build the single-series chart.
    pub fn plot_spectrum(
        &mut self,
        backend: &dyn Backend,
        frequencies: Vec<f64>,
        amplitudes: Vec<f64>,
        peaks: Vec<usize>,
    ) -> Result<Completion<Chart>> {
        let job = PlotJob {
            ticket: self.next_ticket(Operation::Process),
            frequencies,
            amplitudes,
            peaks,
        };
        let response = job.send(backend);
        self.complete_plot(&job, response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::fake::{Call, FakeBackend};
    use crate::render::TraceMode;

    fn file(name: &str) -> SelectedFile {
        SelectedFile {
            name: name.into(),
            bytes: b"10 1\n20 2\n30 3\n".to_vec(),
        }
    }

    fn uploaded_session(body: serde_json::Value) -> Session {
        let backend = FakeBackend::new().reply(200, "OK", body);
        let mut session = Session::new();
        session.upload_files(&backend, vec![file("a.txt")]).unwrap();
        session
    }

    fn one_file_session() -> Session {
        uploaded_session(json!({
            "files": ["a.txt"],
            "frequencies": [10, 20, 30],
            "amplitudes": [1, 2, 3],
        }))
    }

    #[test]
    fn upload_sends_one_request_with_every_file() {
        let backend = FakeBackend::new().reply(
            200,
            "OK",
            json!({
                "files": ["a.txt", "b.txt", "c.txt"],
                "frequencies": [[1], [2], [3]],
                "amplitudes": [[4], [5], [6]],
            }),
        );
        let mut session = Session::new();
        let summary = session
            .upload_files(&backend, vec![file("a.txt"), file("b.txt"), file("c.txt")])
            .unwrap()
            .applied()
            .unwrap();

        assert_eq!(
            backend.calls(),
            vec![Call::Multipart {
                endpoint: Endpoint::UploadFiles,
                file_names: vec!["a.txt".into(), "b.txt".into(), "c.txt".into()],
            }]
        );
        assert_eq!(summary.files, 3);
        assert_eq!(summary.points, 3);
        assert_eq!(session.dataset().unwrap().len(), 3);
    }

    #[test]
    fn empty_selection_makes_no_request() {
        let backend = FakeBackend::new();
        let mut session = Session::new();
        let err = session.upload_files(&backend, Vec::new()).unwrap_err();
        assert!(matches!(err, ClientError::NoFilesSelected));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn failed_upload_keeps_previous_dataset() {
        let mut session = one_file_session();
        let before = session.dataset().cloned();

        let backend = FakeBackend::new().reply(500, "Internal Server Error", json!({ "error": "disk full" }));
        let err = session.upload_files(&backend, vec![file("b.txt")]).unwrap_err();
        assert!(err.to_string().contains("Internal Server Error"));
        assert_eq!(session.dataset().cloned(), before);

        let backend = FakeBackend::new().reply(200, "OK", json!({ "message": "ok" }));
        let err = session.upload_files(&backend, vec![file("b.txt")]).unwrap_err();
        assert!(matches!(err, ClientError::Contract(_)));
        assert_eq!(session.dataset().cloned(), before);
    }

    #[test]
    fn process_without_dataset_makes_no_request() {
        let backend = FakeBackend::new();
        let mut session = Session::new();
        let err = session
            .process_and_plot(&backend, &OptionsForm::default())
            .unwrap_err();
        assert!(matches!(err, ClientError::NoDataset));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn process_sends_dataset_and_normalized_options() {
        let mut session = one_file_session();
        let backend = FakeBackend::new().reply(
            200,
            "OK",
            json!({ "processed_amplitudes": [1, 2, 3], "peaks": [[1]] }),
        );
        let form = OptionsForm {
            find_peaks: true,
            lam: String::new(),
            window_length: "eleven".into(),
            ..OptionsForm::default()
        };
        let chart = session
            .process_and_plot(&backend, &form)
            .unwrap()
            .applied()
            .unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let Call::Json { endpoint, body } = &calls[0] else {
            panic!("expected a JSON call");
        };
        assert_eq!(*endpoint, Endpoint::ProcessData);
        assert_eq!(body["frequencies"], json!([10.0, 20.0, 30.0]));
        assert_eq!(body["lam"], json!(1000.0));
        assert_eq!(body["window_length"], json!(25));
        assert_eq!(body["find_peaks"], json!(true));

        let markers: Vec<_> = chart.markers().collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].x, vec![20.0]);
        assert_eq!(markers[0].y, vec![2.0]);
        let line = chart.lines().next().unwrap();
        assert_eq!(line.x, vec![10.0, 20.0, 30.0]);
        assert_eq!(line.y, vec![1.0, 2.0, 3.0]);
        assert_eq!(line.name, "a.txt");
    }

    #[test]
    fn missing_processed_amplitudes_never_renders() {
        let mut session = one_file_session();
        let backend = FakeBackend::new().reply(200, "OK", json!({ "error": "polyorder must be less than window_length" }));
        let err = session
            .process_and_plot(&backend, &OptionsForm::default())
            .unwrap_err();
        assert!(matches!(err, ClientError::Server(_)));
        assert!(err.to_string().contains("polyorder must be less than window_length"));
    }

    #[test]
    fn http_failure_prefers_server_error_text() {
        let mut session = one_file_session();
        let backend = FakeBackend::new().reply(400, "Bad Request", json!({ "error": "bad lam" }));
        let err = session.process_and_plot(&backend, &OptionsForm::default()).unwrap_err();
        assert!(matches!(&err, ClientError::Http { status: 400, reason, .. } if reason == "bad lam"));

        let backend = FakeBackend::new().reply_raw(502, "Bad Gateway", "<html>oops</html>");
        let err = session.process_and_plot(&backend, &OptionsForm::default()).unwrap_err();
        assert!(matches!(&err, ClientError::Http { reason, .. } if reason == "Bad Gateway"));
    }

    #[test]
    fn two_files_produce_two_lines_and_two_marker_traces() {
        let mut session = uploaded_session(json!({
            "files": ["a.txt", "b.txt"],
            "frequencies": [[1, 2, 3], [4, 5]],
            "amplitudes": [[1, 1, 1], [1, 1]],
        }));
        let backend = FakeBackend::new().reply(
            200,
            "OK",
            json!({ "processed_amplitudes": [[0.1, 0.9, 0.2], [0.3, 0.8]], "peaks": [[0, 2], [1]] }),
        );
        let chart = session
            .process_and_plot(&backend, &OptionsForm::default())
            .unwrap()
            .applied()
            .unwrap();

        assert_eq!(chart.lines().count(), 2);
        assert_eq!(chart.markers().count(), 2);
        for pair in chart.traces.chunks(2) {
            assert_eq!(pair[0].mode, TraceMode::Lines);
            assert_eq!(pair[1].mode, TraceMode::Markers);
            assert_eq!(pair[0].color, pair[1].color);
        }
    }

    #[test]
    fn server_supplied_frequencies_replace_request_frequencies() {
        let mut session = one_file_session();
        let backend = FakeBackend::new().reply(
            200,
            "OK",
            json!({ "processed_amplitudes": [5, 6], "frequencies": [20, 30] }),
        );
        let chart = session
            .process_and_plot(&backend, &OptionsForm::default())
            .unwrap()
            .applied()
            .unwrap();
        assert_eq!(chart.traces[0].x, vec![20.0, 30.0]);
    }

    #[test]
    fn superseded_upload_is_discarded() {
        let mut session = Session::new();
        let first = session.prepare_upload(vec![file("old.txt")]).unwrap();
        let second = session.prepare_upload(vec![file("new.txt")]).unwrap();

        let reply = |name: &str| -> Result<HttpResponse> {
            Ok(HttpResponse {
                status: 200,
                status_text: "OK".into(),
                body: json!({ "files": [name], "frequencies": [1], "amplitudes": [2] }).to_string(),
            })
        };

        let applied = session.complete_upload(second.ticket, reply("new.txt")).unwrap();
        assert!(matches!(applied, Completion::Applied(_)));

        // The older reply arrives last and must not overwrite the newer dataset.
        let late = session.complete_upload(first.ticket, reply("old.txt")).unwrap();
        assert_eq!(late, Completion::Superseded);
        assert_eq!(session.dataset().unwrap().names(), vec!["new.txt"]);
    }

    #[test]
    fn superseded_process_is_discarded() {
        let mut session = one_file_session();
        let first = session.prepare_process(&OptionsForm::default()).unwrap();
        let _second = session.prepare_process(&OptionsForm::default()).unwrap();

        let response: Result<HttpResponse> = Ok(HttpResponse {
            status: 200,
            status_text: "OK".into(),
            body: json!({ "processed_amplitudes": [1, 2, 3] }).to_string(),
        });
        assert_eq!(session.complete_process(&first, response).unwrap(), Completion::Superseded);
    }

    #[test]
    fn plot_spectrum_posts_then_draws_regardless_of_body() {
        let mut session = Session::new();
        let backend = FakeBackend::new().reply(200, "OK", json!({ "anything": "goes" }));
        let chart = session
            .plot_spectrum(&backend, vec![10.0, 20.0], vec![1.0, 5.0], vec![1])
            .unwrap()
            .applied()
            .unwrap();

        let calls = backend.calls();
        assert_eq!(
            calls,
            vec![Call::Json {
                endpoint: Endpoint::PlotSpectrum,
                body: json!({ "frequencies": [10.0, 20.0], "amplitudes": [1.0, 5.0], "peaks": [1] }),
            }]
        );
        assert_eq!(chart.title, "Spectrum");
        assert_eq!(chart.markers().next().unwrap().y, vec![5.0]);
    }

    #[test]
    fn plot_spectrum_failure_status_is_reported() {
        let mut session = Session::new();
        let backend = FakeBackend::new().reply(500, "Internal Server Error", json!({}));
        let err = session
            .plot_spectrum(&backend, vec![1.0], vec![1.0], vec![])
            .unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 500, .. }));
    }

    #[test]
    fn plot_confirmation_only_for_single_series() {
        let session = Session::new();
        let ticket = Ticket { op: Operation::Process, seq: 0 };
        let single = ProcessedResult {
            names: vec!["a".into()],
            frequencies: vec![vec![1.0, 2.0]],
            amplitudes: vec![vec![3.0, 4.0]],
            peaks: vec![vec![]],
        };
        let job = session.prepare_plot(ticket, &single).unwrap();
        assert_eq!(job.amplitudes, vec![3.0, 4.0]);

        let double = ProcessedResult {
            amplitudes: vec![vec![1.0], vec![2.0]],
            ..single
        };
        assert!(session.prepare_plot(ticket, &double).is_none());
    }
}
