//! Background worker that performs server requests off the UI thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::api::{Backend, HttpResponse};
use crate::error::Result;
use crate::session::{PlotJob, ProcessJob, UploadJob};

/// Requests that can be sent to the background worker
pub enum WorkerRequest {
    Upload(UploadJob),
    Process(ProcessJob),
    ConfirmPlot(PlotJob),
}

/// Replies returned from the background worker, each paired with its job
pub enum WorkerResult {
    Uploaded(UploadJob, Result<HttpResponse>),
    Processed(ProcessJob, Result<HttpResponse>),
    PlotConfirmed(PlotJob, Result<HttpResponse>),
}

/// Single background thread executing requests in submission order.
///
/// Dropping the worker never waits: queued requests are abandoned and the
/// thread exits once its in-flight request (if any) returns.
pub struct BackgroundWorker {
    tx: Sender<WorkerRequest>,
    rx: Receiver<WorkerResult>,
    stop: Arc<AtomicBool>,
}

impl BackgroundWorker {
    /// Spawn a new background worker thread
    pub fn spawn(backend: Arc<dyn Backend>) -> Self {
        let (req_tx, req_rx) = channel::<WorkerRequest>();
        let (res_tx, res_rx) = channel::<WorkerResult>();
        let stop = Arc::new(AtomicBool::new(false));

        let worker_stop = Arc::clone(&stop);
        thread::spawn(move || {
            Self::worker_loop(backend.as_ref(), &worker_stop, req_rx, res_tx);
        });

        Self {
            tx: req_tx,
            rx: res_rx,
            stop,
        }
    }

    fn worker_loop(
        backend: &dyn Backend,
        stop: &AtomicBool,
        rx: Receiver<WorkerRequest>,
        tx: Sender<WorkerResult>,
    ) {
        while let Ok(request) = rx.recv() {
            if stop.load(Ordering::Acquire) {
                break;
            }
            let result = match request {
                WorkerRequest::Upload(job) => {
                    let response = job.send(backend);
                    WorkerResult::Uploaded(job, response)
                }
                WorkerRequest::Process(job) => {
                    let response = job.send(backend);
                    WorkerResult::Processed(job, response)
                }
                WorkerRequest::ConfirmPlot(job) => {
                    let response = job.send(backend);
                    WorkerResult::PlotConfirmed(job, response)
                }
            };

            if tx.send(result).is_err() {
                break;
            }
        }
        log::debug!("background worker stopped");
    }

    /// Send a request to the worker (non-blocking)
    pub fn request(&self, req: WorkerRequest) {
        if self.tx.send(req).is_err() {
            log::error!("background worker is gone; request dropped");
        }
    }

    /// Poll for completed work (non-blocking)
    pub fn poll(&self) -> Option<WorkerResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for BackgroundWorker {
    fn drop(&mut self) {
        // Request channel closes with `tx`; an idle thread wakes and exits.
        self.stop.store(true, Ordering::Release);
    }
}
