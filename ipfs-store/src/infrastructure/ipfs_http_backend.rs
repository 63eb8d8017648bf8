//! Backend speaking to an IPFS node's HTTP RPC API (`/api/v0`).

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};

use crate::domain::ContentId;
use crate::infrastructure::config::IpfsConfig;
use crate::port::{BackendError, BackendResult, StorageBackend};

/// One line of the newline-delimited JSON returned by `add`.
#[derive(serde::Deserialize)]
struct AddEntry {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Error body returned by the node on non-2xx responses.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(rename = "Message")]
    message: String,
}

pub struct IpfsHttpBackend {
    api_url: String,
    pin_on_add: bool,
    cid_version: u8,
    http_client: Client,
}

impl IpfsHttpBackend {
    pub fn new(config: &IpfsConfig) -> BackendResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|err| {
            BackendError::Transport(format!("failed to create IPFS HTTP client: {err}"))
        })?;

        Ok(Self {
            api_url: config.api_url.clone(),
            pin_on_add: config.pin_on_add,
            cid_version: config.cid_version,
            http_client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/api/v0/{}", self.api_url.trim_end_matches('/'), command)
    }

    /// Send a prepared request and turn non-2xx answers into errors.
    async fn send(&self, request: RequestBuilder, command: &str) -> BackendResult<Response> {
        let resp = request.send().await.map_err(|err| {
            BackendError::Transport(format!("IPFS {command} request failed: {err}"))
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp
            .text()
            .await
            .unwrap_or_else(|err| unreadable_body(&err));
        Err(status_error(status.as_u16(), &body))
    }

    async fn post_with_arg(&self, command: &str, id: &ContentId) -> BackendResult<Response> {
        let request = self
            .http_client
            .post(self.endpoint(command))
            .query(&[("arg", id.as_str())]);
        self.send(request, command).await
    }
}

#[async_trait]
impl StorageBackend for IpfsHttpBackend {
    async fn add(&self, content: Vec<u8>) -> BackendResult<Vec<String>> {
        let form = Form::new().part("file", Part::bytes(content).file_name("content"));
        let request = self
            .http_client
            .post(self.endpoint("add"))
            .query(&[
                ("pin", self.pin_on_add.to_string()),
                ("cid-version", self.cid_version.to_string()),
            ])
            .multipart(form);

        let resp = self.send(request, "add").await?;
        let body = resp.text().await.map_err(|err| {
            BackendError::Transport(format!("failed to read IPFS add response: {err}"))
        })?;

        parse_add_response(&body)
    }

    async fn cat(&self, id: &ContentId) -> BackendResult<Vec<u8>> {
        let resp = self.post_with_arg("cat", id).await?;
        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|err| {
                BackendError::Transport(format!("failed to read IPFS cat response body: {err}"))
            })
    }

    async fn pin_add(&self, id: &ContentId) -> BackendResult<()> {
        self.post_with_arg("pin/add", id).await?;
        Ok(())
    }

    async fn pin_rm(&self, id: &ContentId) -> BackendResult<()> {
        self.post_with_arg("pin/rm", id).await?;
        Ok(())
    }
}

/// Collect the `Hash` of every entry, in the order the node emitted them.
fn parse_add_response(body: &str) -> BackendResult<Vec<String>> {
    let hashes = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str::<AddEntry>(line)
                .map(|entry| entry.hash)
                .map_err(|err| {
                    BackendError::Malformed(format!("unexpected IPFS add entry {line:?}: {err}"))
                })
        })
        .collect::<BackendResult<Vec<_>>>()?;

    if hashes.is_empty() {
        return Err(BackendError::Malformed("empty IPFS add response".into()));
    }
    Ok(hashes)
}

fn unreadable_body(err: &dyn std::fmt::Display) -> String {
    format!("<unreadable body: {err}>")
}

fn status_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.trim().to_string());
    BackendError::Status { status, message }
}
