//! AI advice command

use crate::advice::{get_financial_advice, AdviceBackend};
use crate::error::{FinanceError, FinanceResult};
use crate::storage::Storage;

/// Send every stored record to the backend and print its advice
pub fn handle_advice_command(storage: &Storage, backend: &dyn AdviceBackend) -> FinanceResult<()> {
    let store = storage.store();
    let incomes = store.list_incomes()?;
    let expenses = store.list_expenses()?;

    if incomes.is_empty() && expenses.is_empty() {
        println!("No hay movimientos registrados para analizar.");
        return Ok(());
    }

    if !backend.health_check() {
        tracing::warn!(host = backend.host(), "advice backend health check failed");
        return Err(FinanceError::Advice(format!(
            "assistant not reachable at {} (model {}); is Ollama running?",
            backend.host(),
            backend.model()
        )));
    }

    eprintln!("Consultando al asistente ({})...", backend.model());
    let advice = get_financial_advice(backend, &incomes, &expenses)?;
    println!("{}", advice.trim_end());

    Ok(())
}
