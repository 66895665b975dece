//! Ollama backend implementation
//!
//! Blocking HTTP client for the Ollama generate API.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};

use super::AdviceBackend;

#[derive(Clone, Debug)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> FinanceResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FinanceError::Advice(e.to_string()))?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

impl AdviceBackend for OllamaBackend {
    fn generate(&self, prompt: &str) -> FinanceResult<String> {
        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .map_err(|e| FinanceError::Advice(format!("could not reach {}: {}", self.base_url, e)))?;

        if !response.status().is_success() {
            return Err(FinanceError::Advice(format!(
                "Ollama returned {}",
                response.status()
            )));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .map_err(|e| FinanceError::Advice(e.to_string()))?;
        tracing::debug!(chars = ollama_response.response.len(), "ollama response received");

        Ok(ollama_response.response)
    }

    fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
