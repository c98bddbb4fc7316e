// Integration tests for `conciliar run` / `conciliar validate`.
// Run with: cargo test -p conciliacion-cli --test recon_cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn conciliar(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_conciliar"));
    cmd.current_dir(dir);
    cmd.env_remove("CONCILIAR_CONFIG");
    cmd.env_remove("CONCILIAR_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    conciliar(dir.path()).args(args).output().unwrap()
}

fn json_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be valid JSON: {e}\n{stdout}"))
}

const DEBO: &str = "Fecha;Cupón;Importe\n2024-03-01;A1;100\n2024-03-01;A2;50,50\n";
const MELI_OK: &str = "Referencia externa;Neto\nA1;100,00\nA2;50,5\n";
const MELI_DIFF: &str = "Referencia externa;Neto\nA1;90\nB7;12\n";

#[test]
fn reconciled_sources_exit_zero() {
    let dir = TempDir::new().unwrap();
    write(&dir, "DEBO.csv", DEBO);
    write(&dir, "meli.csv", MELI_OK);

    let output = run(&dir, &["run", "--ledger", "DEBO.csv", "--platform", "meli.csv", "--json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = json_stdout(&output);
    assert_eq!(json["meta"]["source_label"], "MELI");
    assert_eq!(json["summary"]["counts"]["ok"], 2);
    assert_eq!(json["summary"]["total_results"], 2);
    assert_eq!(json["results"][0]["status"], "OK");
    assert_eq!(json["results"][0]["source_label"], "MELI");
}

#[test]
fn discrepancies_exit_one_with_report() {
    let dir = TempDir::new().unwrap();
    write(&dir, "DEBO.csv", DEBO);
    write(&dir, "MELI.csv", MELI_DIFF);

    let output = run(&dir, &["run", "-l", "DEBO.csv", "-p", "MELI.csv", "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let json = json_stdout(&output);
    let statuses: Vec<&str> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, ["MISMATCH", "EXTRA_IN_PLATFORM", "MISSING_IN_PLATFORM"]);
    assert_eq!(json["results"][0]["difference"], 10.0);
    assert_eq!(json["results"][1]["difference"], -12.0);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 mismatch"), "stderr: {stderr}");
    assert!(stderr.contains("MISSING_IN_PLATFORM"), "stderr: {stderr}");
    assert!(!stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn label_flag_overrides_file_name() {
    let dir = TempDir::new().unwrap();
    write(&dir, "DEBO.csv", DEBO);
    write(&dir, "report.csv", MELI_OK);

    let output = run(
        &dir,
        &["run", "-l", "DEBO.csv", "-p", "report.csv", "--label", "CLOVER", "--json", "--quiet"],
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json_stdout(&output)["meta"]["source_label"], "CLOVER");
    assert!(output.stderr.is_empty());
}

#[test]
fn export_flag_writes_default_workbook() {
    let dir = TempDir::new().unwrap();
    write(&dir, "DEBO.csv", DEBO);
    write(&dir, "appypf.csv", "ID;Importe\nA1;100\nA2;50,5\n");

    let output = run(&dir, &["run", "-l", "DEBO.csv", "-p", "appypf.csv", "--export", "--quiet"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(dir.path().join("Conciliacion_APPYPF.xlsx").exists());
}

#[test]
fn output_csv_has_export_layout() {
    let dir = TempDir::new().unwrap();
    write(&dir, "DEBO.csv", DEBO);
    write(&dir, "MELI.csv", MELI_DIFF);

    let output = run(&dir, &["run", "-l", "DEBO.csv", "-p", "MELI.csv", "-o", "out.csv", "-q"]);
    assert_eq!(output.status.code(), Some(1));

    let content = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("coupon,platformName,deboAmount,platformAmount,diff,status,details")
    );
    assert!(lines.next().unwrap().starts_with("A1,MELI,100,90,10,MISMATCH,"));
}

#[test]
fn config_changes_columns_and_tolerance() {
    let dir = TempDir::new().unwrap();
    write(&dir, "DEBO.csv", "Comprobante;Total\nA1;100\n");
    write(&dir, "MELI.csv", MELI_DIFF);
    write(
        &dir,
        "recon.toml",
        r#"
label = "MERCADOLIBRE"
tolerance = 15.0

[ledger]
identifier = ["Comprobante"]
amount = ["Total"]
"#,
    );

    let output = run(
        &dir,
        &["run", "-l", "DEBO.csv", "-p", "MELI.csv", "-c", "recon.toml", "--json", "-q"],
    );
    let json = json_stdout(&output);
    assert_eq!(json["meta"]["source_label"], "MERCADOLIBRE");
    assert_eq!(json["results"][0]["status"], "OK");
    assert_eq!(json["results"][1]["status"], "EXTRA_IN_PLATFORM");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn unreadable_source_is_parse_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "DEBO.xlsx", "not really a workbook");
    write(&dir, "MELI.csv", MELI_OK);

    let output = run(&dir, &["run", "-l", "DEBO.xlsx", "-p", "MELI.csv"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: ledger file"), "stderr: {stderr}");
    assert!(stderr.contains("hint:"), "stderr: {stderr}");
}

#[test]
fn missing_source_is_parse_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "DEBO.csv", DEBO);

    let output = run(&dir, &["run", "-l", "DEBO.csv", "-p", "nope.csv"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn unsupported_export_extension() {
    let dir = TempDir::new().unwrap();
    write(&dir, "DEBO.csv", DEBO);
    write(&dir, "MELI.csv", MELI_OK);

    let output = run(&dir, &["run", "-l", "DEBO.csv", "-p", "MELI.csv", "-o", "out.json"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn validate_accepts_and_rejects() {
    let dir = TempDir::new().unwrap();
    write(&dir, "good.toml", "tolerance = 0.05\n");
    write(&dir, "bad.toml", "[platform]\nidentifier = []\namount = [\"Neto\"]\n");

    let ok = run(&dir, &["validate", "good.toml"]);
    assert_eq!(ok.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&ok.stderr).contains("config ok"));

    let bad = run(&dir, &["validate", "bad.toml"]);
    assert_eq!(bad.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&bad.stderr).contains("platform.identifier"));
}

#[test]
fn output_and_export_conflict() {
    let dir = TempDir::new().unwrap();
    let output = run(
        &dir,
        &["run", "-l", "a.csv", "-p", "b.csv", "--output", "x.xlsx", "--export"],
    );
    assert_eq!(output.status.code(), Some(2));
}
