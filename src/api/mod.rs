/// Server boundary: endpoints, the transport seam, and wire shapes.
///
/// ```text
///   Session ──► Backend (trait) ──► HttpBackend (reqwest) ──► server
///                  ▲
///                  └── test fakes record calls instead
/// ```

pub mod http;
pub mod wire;

use crate::data::model::SelectedFile;
use crate::error::Result;

/// Multipart field name shared by every uploaded file.
pub const UPLOAD_FIELD: &str = "files";

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    UploadFiles,
    ProcessData,
    PlotSpectrum,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::UploadFiles => "/upload_files",
            Endpoint::ProcessData => "/process_data",
            Endpoint::PlotSpectrum => "/plot_spectrum",
        }
    }
}

// ---------------------------------------------------------------------------
// HttpResponse – transport-independent view of a reply
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase ("Bad Request", ...), empty if unknown.
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as JSON, `None` when it is not valid JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

// ---------------------------------------------------------------------------
// Backend – the only way the client talks to the server
// ---------------------------------------------------------------------------

/// Transport seam. Implementations perform exactly one request per call.
pub trait Backend: Send + Sync {
    /// POST `files` as one multipart body, each under [`UPLOAD_FIELD`].
    fn post_multipart(&self, endpoint: Endpoint, files: &[SelectedFile]) -> Result<HttpResponse>;

    /// POST `body` as JSON.
    fn post_json(&self, endpoint: Endpoint, body: &serde_json::Value) -> Result<HttpResponse>;
}

#[cfg(test)]
pub mod fake {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// One recorded request.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Multipart {
            endpoint: Endpoint,
            file_names: Vec<String>,
        },
        Json {
            endpoint: Endpoint,
            body: serde_json::Value,
        },
    }

    /// Backend that replays canned responses and records every call.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: Mutex<VecDeque<HttpResponse>>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, status_text: &str, body: serde_json::Value) -> Self {
            self.reply_raw(status, status_text, &body.to_string())
        }

        pub fn reply_raw(self, status: u16, status_text: &str, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(HttpResponse {
                status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            });
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn next(&self) -> Result<HttpResponse> {
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("FakeBackend ran out of responses"))
        }
    }

    impl Backend for FakeBackend {
        fn post_multipart(&self, endpoint: Endpoint, files: &[SelectedFile]) -> Result<HttpResponse> {
            self.calls.lock().unwrap().push(Call::Multipart {
                endpoint,
                file_names: files.iter().map(|f| f.name.clone()).collect(),
            });
            self.next()
        }

        fn post_json(&self, endpoint: Endpoint, body: &serde_json::Value) -> Result<HttpResponse> {
            self.calls.lock().unwrap().push(Call::Json {
                endpoint,
                body: body.clone(),
            });
            self.next()
        }
    }
}
