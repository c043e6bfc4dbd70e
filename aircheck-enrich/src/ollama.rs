//! Client for a local Ollama server.
//!
//! Expects a running server (see <https://github.com/ollama/ollama>); the
//! binary probes it at startup so a missing server fails fast with an
//! actionable message instead of one timeout per utterance.

use std::time::Duration;

use serde_json::{Value as JsonValue, json};

use crate::EnrichError;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3:8b";

const CONNECTION_HINT: &str =
    "start it with `ollama serve` (install instructions: https://github.com/ollama/ollama)";

pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| EnrichError::Build(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check that the server answers at all.
    pub async fn probe(&self) -> Result<(), EnrichError> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = self.client.get(&url).send().await.map_err(|e| {
            EnrichError::Connect {
                base_url: self.base_url.clone(),
                message: format!("{e}; {CONNECTION_HINT}"),
            }
        })?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(EnrichError::Connect {
                base_url: self.base_url.clone(),
                message: format!("HTTP {}; {CONNECTION_HINT}", resp.status()),
            })
        }
    }

    /// One non-streaming completion. Temperature pinned to zero: the
    /// classifications should be as repeatable as the model allows.
    pub async fn generate(&self, prompt: &str) -> Result<String, EnrichError> {
        let url = format!("{}/api/generate", self.base_url);
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": 0.0 }
        });

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EnrichError::Connect {
                base_url: self.base_url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EnrichError::Api(status));
        }

        let val: JsonValue = resp
            .json()
            .await
            .map_err(|e| EnrichError::Decode(e.to_string()))?;

        Ok(val
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .to_string())
    }
}
