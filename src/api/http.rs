use reqwest::blocking::{multipart, Client, Response};

use super::{Backend, Endpoint, HttpResponse, UPLOAD_FIELD};
use crate::config::ClientConfig;
use crate::data::model::SelectedFile;
use crate::error::Result;

/// Blocking reqwest transport. Runs on the background worker, never on the UI thread.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

fn read_response(resp: Response) -> Result<HttpResponse> {
    let status = resp.status();
    let body = resp.text()?;
    Ok(HttpResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
        body,
    })
}

impl Backend for HttpBackend {
    fn post_multipart(&self, endpoint: Endpoint, files: &[SelectedFile]) -> Result<HttpResponse> {
        let form = files.iter().fold(multipart::Form::new(), |form, file| {
            let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone());
            form.part(UPLOAD_FIELD, part)
        });

        let url = self.url(endpoint);
        log::info!("POST {url} ({} file(s))", files.len());
        let resp = self.client.post(&url).multipart(form).send()?;
        read_response(resp)
    }

    fn post_json(&self, endpoint: Endpoint, body: &serde_json::Value) -> Result<HttpResponse> {
        let url = self.url(endpoint);
        log::info!("POST {url}");
        let resp = self.client.post(&url).json(body).send()?;
        read_response(resp)
    }
}
