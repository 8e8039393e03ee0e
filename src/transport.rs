use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Url;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// Failure to get any HTTP response at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let mut detail = e.to_string();
        let mut source = std::error::Error::source(&e);

        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }

        Self(detail)
    }
}

pub trait Transport: Send + Sync {
    /// Issues one POST with a JSON body. Any status code counts as a response.
    fn post_json(&self, url: &Url, payload: String) -> Result<Response, TransportError>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(verify_tls: bool, timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(!verify_tls);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn post_json(&self, url: &Url, payload: String) -> Result<Response, TransportError> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, payload.len().to_string())
            .body(payload)
            .send()?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();

        Ok(Response { status, body })
    }
}
