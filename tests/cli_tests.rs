use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;

const REPORT: &str = "\
ISBN,Vente,Net,Facture
978-1,1,1,100
978-2,2,1,200
";

fn command(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("commission_ledger").expect("binary builds");
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(temp.child("config.json").path());
    cmd
}

#[test]
fn exports_balanced_journal_to_file() {
    let temp = TempDir::new().expect("temp dir");
    let report = temp.child("report.csv");
    report.write_str(REPORT).expect("write report");
    let output = temp.child("journal.csv");

    command(&temp)
        .args(["--header-row", "0", "--date", "2025-03-31"])
        .args(["--distribution-total", "10.00", "--diffusion-total", "5"])
        .arg("--report")
        .arg(report.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Ledger balanced"));

    output.assert(predicate::str::contains(
        "31/03/2025,VT,62280000,VENTES BLDD - Com. distribution ISBN,9781,3.33,0.00",
    ));
    output.assert(predicate::str::contains(
        "31/03/2025,VT,62280000,VENTES BLDD - Com. distribution ISBN,9782,6.67,0.00",
    ));
    output.assert(predicate::str::contains(
        "31/03/2025,VT,62280001,VENTES BLDD - Com. diffusion global,,0.00,5.00",
    ));
    temp.child("config.json").assert(predicate::path::missing());
}

#[test]
fn writes_journal_to_stdout_by_default() {
    let temp = TempDir::new().expect("temp dir");
    let report = temp.child("report.csv");
    report.write_str(REPORT).expect("write report");

    command(&temp)
        .args(["--header-row", "0", "--date", "01/02/2025", "--journal", "OD"])
        .arg("--report")
        .arg(report.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Date,Journal,Compte,Libelle,ISBN,Débit,Crédit",
        ))
        .stdout(predicate::str::contains("01/02/2025,OD,70110000,VENTES BLDD - CA global,,3.00,0.00"));
}

#[test]
fn degenerate_pool_fails_the_run() {
    let temp = TempDir::new().expect("temp dir");
    let report = temp.child("report.csv");
    report
        .write_str("ISBN,Vente,Net,Facture\nA,0,1,10\nB,0,1,10\n")
        .expect("write report");

    command(&temp)
        .args(["--header-row", "0", "--distribution-total", "10"])
        .arg("--report")
        .arg(report.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("distribution"))
        .stderr(predicate::str::contains("positive weight"));
}

#[test]
fn init_config_writes_defaults_once() {
    let temp = TempDir::new().expect("temp dir");

    command(&temp).arg("--init-config").assert().success();
    temp.child("config.json")
        .assert(predicate::str::contains("\"journal\": \"VT\""));

    command(&temp)
        .arg("--init-config")
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn missing_report_is_an_input_error() {
    let temp = TempDir::new().expect("temp dir");

    command(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--report is required"));
}
