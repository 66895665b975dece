//! Mock backend for testing
//!
//! Returns a fixed markdown answer, or a configured one.

use crate::error::FinanceResult;

use super::AdviceBackend;

const DEFAULT_RESPONSE: &str = "## Resumen\n\nTus ingresos cubren tus gastos.\n\n\
## Recomendaciones\n\n- **Ahorra** una parte fija de cada ingreso.\n";

#[derive(Clone, Debug)]
pub struct MockBackend {
    response: String,
    pub healthy: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_response(DEFAULT_RESPONSE)
    }

    /// Mock that always answers `response`
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            healthy: true,
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AdviceBackend for MockBackend {
    fn generate(&self, _prompt: &str) -> FinanceResult<String> {
        Ok(self.response.clone())
    }

    fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
