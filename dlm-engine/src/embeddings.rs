//! HTTP client for the embedding backend behind the semantic oracle.

use dlm_core::EmbeddingSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{EngineError, EngineResult};

/// Talks to an Ollama-compatible `/api/embed` endpoint.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    endpoint: String,
    model: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

/// Current servers answer with `embeddings`, older ones with one `embedding`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbedResponse {
    Batch { embeddings: Vec<Vec<f32>> },
    Single { embedding: Vec<f32> },
}

impl EmbeddingClient {
    pub fn new(settings: &EmbeddingSettings) -> Self {
        Self {
            endpoint: format!("{}/api/embed", settings.url.trim_end_matches('/')),
            model: settings.model.clone(),
            http: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One vector per text, in input order.
    pub async fn embed(&self, texts: &[&str]) -> EngineResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let vectors = match response.json::<EmbedResponse>().await? {
            EmbedResponse::Batch { embeddings } => embeddings,
            EmbedResponse::Single { embedding } => vec![embedding],
        };
        if vectors.len() != texts.len() {
            return Err(EngineError::Embedding(format!(
                "asked {} for {} vectors, got {}",
                self.model,
                texts.len(),
                vectors.len()
            )));
        }

        debug!("embedded {} texts with {}", texts.len(), self.model);
        Ok(vectors)
    }
}
