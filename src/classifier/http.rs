//! HTTP classifier client.
//!
//! Talks to a model server exposing:
//! - `GET  {endpoint}/health`
//! - `POST {endpoint}/classify` with `{"model", "inputs", "max_length"}`,
//!   answered by `{"labels": [0|1, ...]}`

use super::{check_len, Classifier, ClassifierError, Label, ModelKind};
use crate::config::ClassifierConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    model: ModelKind,
    inputs: &'a [String],
    max_length: usize,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    labels: Vec<u8>,
}

/// Classifier backed by a remote model server.
///
/// Owns a tokio runtime from [`load`](Self::load) until
/// [`close`](Self::close); calls block the caller on that runtime, so the
/// engine's worker threads never need an async context.
pub struct HttpClassifier {
    http: Client,
    runtime: Option<Runtime>,
    config: ClassifierConfig,
}

impl HttpClassifier {
    /// Build the client and check that the server answers.
    pub fn load(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let http = Client::builder()
            .user_agent(concat!("smellcheck/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        let runtime = Runtime::new()
            .map_err(|e| ClassifierError::Unavailable(format!("runtime: {}", e)))?;

        let classifier = Self {
            http,
            runtime: Some(runtime),
            config: config.clone(),
        };
        classifier.health()?;
        tracing::info!(endpoint = %config.endpoint, "classifier loaded");
        Ok(classifier)
    }

    /// Release the runtime. Later calls fail with `Unavailable`.
    pub fn close(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(Duration::from_secs(1));
            tracing::debug!("classifier closed");
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn runtime(&self) -> Result<&Runtime, ClassifierError> {
        self.runtime
            .as_ref()
            .ok_or_else(|| ClassifierError::Unavailable("classifier is closed".into()))
    }

    fn health(&self) -> Result<(), ClassifierError> {
        let url = join_url(&self.config.endpoint, "health");
        let response = self
            .runtime()?
            .block_on(async { self.http.get(&url).send().await })
            .map_err(map_reqwest)?;
        if !response.status().is_success() {
            return Err(ClassifierError::Unavailable(format!(
                "health check returned HTTP {}",
                response.status().as_u16()
            )));
        }
        Ok(())
    }

    fn classify_chunk(
        &self,
        model: ModelKind,
        inputs: &[String],
    ) -> Result<Vec<Label>, ClassifierError> {
        let url = join_url(&self.config.endpoint, "classify");
        let body = ClassifyRequest {
            model,
            inputs,
            max_length: self.config.max_length,
        };

        let raw = self.runtime()?.block_on(async {
            let response = self
                .http
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest)?;
            let status = response.status();
            if !status.is_success() {
                return Err(ClassifierError::Status(status.as_u16()));
            }
            let text = response.text().await.map_err(map_reqwest)?;
            Ok(text)
        })?;

        parse_labels(&raw, inputs.len())
    }
}

impl Classifier for HttpClassifier {
    /// One file's batch, sent as requests of at most `batch_size` inputs.
    /// Each label depends only on its own input, so the split changes
    /// neither the labels nor their order.
    fn classify_batch(
        &self,
        model: ModelKind,
        inputs: &[String],
    ) -> Result<Vec<Label>, ClassifierError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let mut labels = Vec::with_capacity(inputs.len());
        for chunk in inputs.chunks(self.config.batch_size.max(1)) {
            labels.extend(self.classify_chunk(model, chunk)?);
        }
        check_len(inputs.len(), &labels)?;
        Ok(labels)
    }
}

impl Drop for HttpClassifier {
    fn drop(&mut self) {
        self.close();
    }
}

fn map_reqwest(e: reqwest::Error) -> ClassifierError {
    if e.is_timeout() {
        ClassifierError::Timeout
    } else {
        ClassifierError::Network(e)
    }
}

fn join_url(endpoint: &str, path: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), path)
}

fn parse_labels(body: &str, expected: usize) -> Result<Vec<Label>, ClassifierError> {
    let response: ClassifyResponse =
        serde_json::from_str(body).map_err(|e| ClassifierError::Malformed(e.to_string()))?;
    let labels = response
        .labels
        .into_iter()
        .map(|raw| {
            Label::from_raw(raw)
                .ok_or_else(|| ClassifierError::Malformed(format!("label {} is not 0 or 1", raw)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    check_len(expected, &labels)?;
    Ok(labels)
}
