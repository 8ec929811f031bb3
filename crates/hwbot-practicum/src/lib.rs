//! Practicum homework API adapter (reqwest).
//!
//! Implements the `hwbot-core` HomeworkSource port over
//! `GET <endpoint>?from_date=<unix seconds>` with OAuth token auth.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

use hwbot_core::{
    config::Config,
    domain::{Cursor, HttpReply},
    errors::Error,
    ports::HomeworkSource,
    Result,
};

#[derive(Clone)]
pub struct PracticumClient {
    endpoint: String,
    token: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PracticumClient {
    /// Build a client. Without `timeout` a hung request blocks the caller.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            token: token.into(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.endpoint.clone(),
            cfg.practicum_token.clone(),
            cfg.request_timeout,
        )
    }

    fn auth_header(&self) -> String {
        format!("OAuth {}", self.token)
    }

    fn unreachable(&self, e: reqwest::Error) -> Error {
        Error::EndpointUnreachable {
            endpoint: self.endpoint.clone(),
            reason: e.without_url().to_string(),
        }
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self, from_date: Cursor) -> Result<HttpReply> {
        let resp = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, self.auth_header())
            .query(&[("from_date", from_date.0)])
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| self.unreachable(e))?;
        tracing::debug!(status, bytes = body.len(), "homework api replied");

        Ok(HttpReply { status, body })
    }
}
