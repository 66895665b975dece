//! Financial advice from a language model
//!
//! - `AdviceBackend` trait: anything that turns a prompt into text
//! - `OllamaBackend`: a local Ollama server over HTTP
//! - `MockBackend`: canned answers for tests and offline use
//!
//! `AdviceClient` picks a backend from settings and environment, and
//! `get_financial_advice` runs the whole flow over stored records.

pub mod mock;
pub mod ollama;
pub mod prompt;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use prompt::{build_prompt, AdviceExpense, AdviceIncome, AdviceRequest};

use crate::config::settings::AdviceSettings;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Expense, Income};

/// Error text when the backend answers with nothing
pub const EMPTY_RESPONSE: &str = "assistant did not return a response";

/// A text generation backend
pub trait AdviceBackend: Send + Sync {
    /// Generate a completion for `prompt`
    fn generate(&self, prompt: &str) -> FinanceResult<String>;

    /// Check if the backend is reachable
    fn health_check(&self) -> bool;

    fn model(&self) -> &str;

    fn host(&self) -> &str;
}

/// Concrete advice client
#[derive(Clone)]
pub enum AdviceClient {
    Ollama(OllamaBackend),
    Mock(MockBackend),
}

impl AdviceClient {
    /// Build a client from settings; `OLLAMA_HOST` and `OLLAMA_MODEL`
    /// override the configured values, and `ADVICE_BACKEND=mock` selects
    /// the mock backend.
    pub fn from_settings(settings: &AdviceSettings) -> FinanceResult<Self> {
        let backend = std::env::var("ADVICE_BACKEND").unwrap_or_else(|_| "ollama".to_string());
        if backend.eq_ignore_ascii_case("mock") {
            return Ok(Self::Mock(MockBackend::new()));
        }

        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| settings.host.clone());
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| settings.model.clone());
        Ok(Self::Ollama(OllamaBackend::new(
            &host,
            &model,
            settings.timeout_secs,
        )?))
    }

    pub fn mock() -> Self {
        Self::Mock(MockBackend::new())
    }
}

impl AdviceBackend for AdviceClient {
    fn generate(&self, prompt: &str) -> FinanceResult<String> {
        match self {
            Self::Ollama(b) => b.generate(prompt),
            Self::Mock(b) => b.generate(prompt),
        }
    }

    fn health_check(&self) -> bool {
        match self {
            Self::Ollama(b) => b.health_check(),
            Self::Mock(b) => b.health_check(),
        }
    }

    fn model(&self) -> &str {
        match self {
            Self::Ollama(b) => b.model(),
            Self::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            Self::Ollama(b) => b.host(),
            Self::Mock(b) => b.host(),
        }
    }
}

/// Ask the backend for a markdown summary and recommendations
pub fn get_financial_advice(
    backend: &dyn AdviceBackend,
    incomes: &[Income],
    expenses: &[Expense],
) -> FinanceResult<String> {
    let request = AdviceRequest::from_records(incomes, expenses);
    let prompt = build_prompt(&request);
    tracing::debug!(
        model = backend.model(),
        incomes = request.incomes.len(),
        expenses = request.expenses.len(),
        "requesting financial advice"
    );

    let response = backend.generate(&prompt)?;
    if response.trim().is_empty() {
        return Err(FinanceError::Advice(EMPTY_RESPONSE.to_string()));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentMethod};
    use chrono::NaiveDate;

    #[test]
    fn test_mock_advice() {
        let incomes = vec![Income::new(
            "Sueldo",
            Money::from_units(2500),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            "Galicia",
        )];
        let advice = get_financial_advice(&AdviceClient::mock(), &incomes, &[]).unwrap();
        assert!(advice.contains("Resumen"));
    }

    #[test]
    fn test_empty_response_is_error() {
        let backend = MockBackend::with_response("   ");
        let expenses = vec![Expense::new(
            "Nafta",
            Money::from_units(40),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            PaymentMethod::Cash,
        )];

        let err = get_financial_advice(&backend, &[], &expenses).unwrap_err();
        assert!(err.to_string().contains(EMPTY_RESPONSE));
    }
}
