//! Advice request and prompt text

use serde::Serialize;

use crate::models::{Expense, Income};

/// An income as sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceIncome {
    pub description: String,
    pub amount: String,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub source: String,
}

/// An expense as sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceExpense {
    pub description: String,
    pub amount: String,
    pub date: String,
    pub payment_method: String,
    pub bank: Option<String>,
    pub is_saving: bool,
}

/// Everything the model gets to see
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdviceRequest {
    pub incomes: Vec<AdviceIncome>,
    pub expenses: Vec<AdviceExpense>,
}

impl AdviceRequest {
    pub fn from_records(incomes: &[Income], expenses: &[Expense]) -> Self {
        Self {
            incomes: incomes
                .iter()
                .map(|i| AdviceIncome {
                    description: i.description.clone(),
                    amount: i.amount.to_decimal_string(),
                    date: i.date.format("%Y-%m-%d").to_string(),
                    source: i.source.clone(),
                })
                .collect(),
            expenses: expenses
                .iter()
                .map(|e| AdviceExpense {
                    description: e.description.clone(),
                    amount: e.amount.to_decimal_string(),
                    date: e.date.format("%Y-%m-%d").to_string(),
                    payment_method: e.payment.label().to_string(),
                    bank: e.bank().map(str::to_string),
                    is_saving: e.is_saving,
                })
                .collect(),
        }
    }
}

const INTRO: &str = "Eres un asistente financiero experto. Tu tarea es analizar los datos de \
ingresos y gastos proporcionados por el usuario y ofrecer recomendaciones claras, accionables y \
personalizadas para mejorar su salud financiera.";

const INSTRUCTIONS: &str = "Basado en este análisis, proporciona un resumen y luego una lista de recomendaciones.
- Identifica los patrones de gasto más significativos.
- Compara los ingresos totales con los gastos totales.
- Evalúa la cantidad de dinero que se destina al ahorro.
- Ofrece sugerencias específicas para reducir gastos innecesarios.
- Propón estrategias de ahorro o inversión si es apropiado.
- Mantén un tono alentador y de apoyo.
- Formatea tu respuesta en markdown. Usa encabezados, listas con viñetas y negritas para que sea fácil de leer.";

/// Render the request into the prompt text
pub fn build_prompt(request: &AdviceRequest) -> String {
    let mut prompt = String::new();
    prompt.push_str(INTRO);
    prompt.push_str("\n\nAnaliza los siguientes datos:\nIngresos:\n");

    for income in &request.incomes {
        prompt.push_str(&format!(
            "- Descripción: {}, Monto: {}, Fecha: {}, Origen: {}\n",
            income.description, income.amount, income.date, income.source
        ));
    }

    prompt.push_str("\nGastos:\n");
    for expense in &request.expenses {
        prompt.push_str(&format!(
            "- Descripción: {}, Monto: {}, Fecha: {}, Método: {}",
            expense.description, expense.amount, expense.date, expense.payment_method
        ));
        if let Some(bank) = &expense.bank {
            prompt.push_str(&format!(", Banco: {}", bank));
        }
        if expense.is_saving {
            prompt.push_str(", (AHORRO)");
        }
        prompt.push('\n');
    }

    prompt.push('\n');
    prompt.push_str(INSTRUCTIONS);
    prompt.push('\n');
    prompt
}
