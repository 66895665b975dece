//! End-to-end tests driving the financeflow binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn financeflow(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("financeflow").unwrap();
    cmd.env("FINANCEFLOW_DATA_DIR", dir.path())
        .env_remove("RUST_LOG")
        .env("ADVICE_BACKEND", "mock");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    financeflow(&dir).arg("init").assert().success();
    dir
}

#[test]
fn test_init_creates_settings_and_savings_bank() {
    let dir = TempDir::new().unwrap();

    financeflow(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(dir.path().join("config.json").exists());

    financeflow(&dir)
        .args(["bank", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ahorros"))
        .stdout(predicate::str::contains("protegido"));
}

#[test]
fn test_income_and_expense_show_in_dashboard() {
    let dir = initialized();

    financeflow(&dir)
        .args(["bank", "add", "Galicia"])
        .assert()
        .success();

    financeflow(&dir)
        .args([
            "income", "add", "Sueldo", "2500", "--source", "Galicia", "--date", "2024-03-05",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ingreso registrado: Sueldo $2500.00"));

    financeflow(&dir)
        .args([
            "expense", "add", "Nafta", "150", "--method", "Efectivo", "--date", "2024-03-10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gasto registrado: Nafta $150.00"));

    financeflow(&dir)
        .args(["dashboard", "--period", "2024-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marzo 2024"))
        .stdout(predicate::str::contains("$2500.00"))
        .stdout(predicate::str::contains("$150.00"))
        .stdout(predicate::str::contains("$2350.00"));
}

#[test]
fn test_credit_expense_is_split_into_installments() {
    let dir = initialized();

    financeflow(&dir)
        .args([
            "expense",
            "add",
            "Heladera",
            "300",
            "--method",
            "Crédito",
            "--card",
            "Visa",
            "--installments",
            "3",
            "--date",
            "2024-01-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gasto registrado en 3 cuotas:"))
        .stdout(predicate::str::contains("Heladera (Cuota 3/3)"))
        .stderr(predicate::str::contains("no está registrada"));

    financeflow(&dir)
        .args(["expense", "list", "--period", "2024-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Heladera (Cuota 2/3)"));
}

#[test]
fn test_empty_month_dashboard() {
    let dir = initialized();

    financeflow(&dir)
        .args(["dashboard", "--period", "2020-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No hay movimientos en este período."));
}

#[test]
fn test_csv_export_without_data_writes_no_file() {
    let dir = initialized();
    let out = TempDir::new().unwrap();

    financeflow(&dir)
        .args(["export", "csv", "--from", "2024-01-01", "--to", "2024-01-31", "--output"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No hay datos para exportar"));

    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_csv_export_writes_file() {
    let dir = initialized();
    let out = TempDir::new().unwrap();

    financeflow(&dir)
        .args(["income", "add", "Sueldo", "2500", "--source", "Galicia", "--date", "2024-03-05"])
        .assert()
        .success();

    financeflow(&dir)
        .args(["export", "csv", "--from", "2024-03-01", "--to", "2024-03-31", "--output"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exportados 1 movimientos"));

    let file = std::fs::read_dir(out.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let content = std::fs::read_to_string(file).unwrap();
    assert!(content.starts_with("fecha,tipo,descripcion,monto,metodo_pago,origen_destino\n"));
    assert!(content.contains("\"2024-03-05\",\"Ingreso\",\"Sueldo\",\"2500.00\",\"\",\"Galicia\""));
}

#[test]
fn test_savings_bank_cannot_be_deleted() {
    let dir = initialized();

    financeflow(&dir)
        .args(["bank", "delete", "Ahorros", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no se puede eliminar"));

    financeflow(&dir)
        .args(["bank", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ahorros"));
}

#[test]
fn test_invalid_income_is_rejected() {
    let dir = initialized();

    financeflow(&dir)
        .args(["income", "add", "ab", "0", "--source", "Galicia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_savings_goal() {
    let dir = initialized();

    financeflow(&dir)
        .args(["savings", "set-goal", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30%"));

    financeflow(&dir)
        .args(["savings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30% de los ingresos"));

    financeflow(&dir)
        .args(["savings", "set-goal", "150"])
        .assert()
        .failure();
}

#[test]
fn test_sqlite_backend_flag() {
    let dir = TempDir::new().unwrap();

    financeflow(&dir)
        .args(["--backend", "sqlite", "income", "add", "Sueldo", "100", "--source", "Ualá"])
        .assert()
        .success();

    assert!(dir.path().join("data").join("financeflow.db").exists());
}

#[test]
fn test_advice_with_mock_backend() {
    let dir = initialized();

    financeflow(&dir)
        .args(["income", "add", "Sueldo", "2500", "--source", "Galicia"])
        .assert()
        .success();

    financeflow(&dir)
        .arg("advice")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resumen"));
}

#[test]
fn test_audit_lists_changes() {
    let dir = initialized();

    financeflow(&dir)
        .args(["wallet", "add", "Ualá"])
        .assert()
        .success();

    financeflow(&dir)
        .args(["audit", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ualá"));
}
