//! Integration tests for the labexam binary.
//!
//! These tests verify end-to-end behavior including:
//! - Default profile seeding on first run
//! - Profile CRUD and favorites through the CLI
//! - Report rendering and PDF output
//! - Backup export/import

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary, pointed at a data dir
fn cli(data_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("labexam"));
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("labexam"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Laboratory exam manager"));
}

#[test]
fn test_first_run_seeds_default_profiles() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args(["profiles", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ROTINA"))
        .stdout(predicate::str::contains("SAÚDE DO HOMEM"))
        .stdout(predicate::str::contains("SAÚDE DA MULHER"))
        .stdout(predicate::str::contains("Checkup de rotina básico"));

    assert!(data_dir.path().join("profiles.json").exists());
}

#[test]
fn test_create_and_list_custom_profile() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args([
            "profiles",
            "create",
            "Meu Checkup",
            "--category",
            "GLICEMIA:Glicose,Insulina",
            "--description",
            "acompanhamento",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 exams in 1 categories"));

    cli(&data_dir)
        .args(["profiles", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Meu Checkup"))
        .stdout(predicate::str::contains("acompanhamento"));
}

#[test]
fn test_create_duplicate_name_fails() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args(["profiles", "create", "Meu Checkup", "--category", "GLICEMIA:Glicose"])
        .assert()
        .success();

    cli(&data_dir)
        .args(["profiles", "create", "Meu Checkup", "--category", "GLICEMIA:Glicose"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_create_with_unknown_exam_fails() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args(["profiles", "create", "Meu Checkup", "--category", "GLICEMIA:Ferritina"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_delete_default_profile_is_protected() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args(["profiles", "delete", "ROTINA"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be deleted"));

    cli(&data_dir)
        .args(["profiles", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ROTINA"));
}

#[test]
fn test_delete_custom_profile() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args(["profiles", "create", "Meu Checkup", "--category", "GLICEMIA:Glicose"])
        .assert()
        .success();

    cli(&data_dir)
        .args(["profiles", "delete", "Meu Checkup"])
        .assert()
        .success();

    cli(&data_dir)
        .args(["profiles", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Meu Checkup").not());
}

#[test]
fn test_favorite_toggle_persists_across_runs() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args(["profiles", "favorite", "ROTINA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marked as favorite"));

    cli(&data_dir)
        .args(["profiles", "favorite", "ROTINA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed from favorites"));
}

#[test]
fn test_report_text_output() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args([
            "report",
            "--profile",
            "ROTINA",
            "--date",
            "01/08/2026",
            "--value",
            "HEMOGRAMA/Hemoglobina=12.0",
            "--value",
            "GLICEMIA/Glicose=95,5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resultados de Exames - ROTINA"))
        .stdout(predicate::str::contains("Data: 01/08/2026"))
        .stdout(predicate::str::contains(
            "Hemoglobina: 12.0 g/dL (Ref: 13.5-17.5 g/dL) - BAIXO",
        ))
        .stdout(predicate::str::contains("Glicose: 95.5 mg/dL"))
        .stdout(predicate::str::contains("NORMAL"));
}

#[test]
fn test_report_table_output() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args([
            "report",
            "--profile",
            "ROTINA",
            "--date",
            "01/08/2026",
            "--table",
            "--value",
            "GLICEMIA/Glicose=95",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exame"))
        .stdout(predicate::str::contains("| Status"))
        .stdout(predicate::str::contains("NORMAL"));
}

#[test]
fn test_report_rejects_future_date() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args([
            "report",
            "--profile",
            "ROTINA",
            "--date",
            "01/01/2099",
            "--value",
            "GLICEMIA/Glicose=95",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("future"));
}

#[test]
fn test_report_rejects_negative_value() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args([
            "report",
            "--profile",
            "ROTINA",
            "--date",
            "01/08/2026",
            "--value",
            "GLICEMIA/Glicose=-5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("negative value"));
}

#[test]
fn test_report_requires_at_least_one_value() {
    let data_dir = setup_test_dir();

    cli(&data_dir)
        .args(["report", "--profile", "ROTINA", "--date", "01/08/2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one exam value"));
}

#[test]
fn test_report_writes_pdf() {
    let data_dir = setup_test_dir();
    let pdf_path = data_dir.path().join("exame.pdf");

    cli(&data_dir)
        .args([
            "report",
            "--profile",
            "ROTINA",
            "--date",
            "01/08/2026",
            "--value",
            "GLICEMIA/Glicose=95",
            "--orientation",
            "landscape",
        ])
        .arg("--pdf")
        .arg(&pdf_path)
        .assert()
        .success();

    let bytes = std::fs::read(&pdf_path).expect("PDF file should exist");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_report_rejects_bad_orientation() {
    let data_dir = setup_test_dir();
    let pdf_path = data_dir.path().join("exame.pdf");

    cli(&data_dir)
        .args([
            "report",
            "--profile",
            "ROTINA",
            "--date",
            "01/08/2026",
            "--value",
            "GLICEMIA/Glicose=95",
            "--orientation",
            "diagonal",
        ])
        .arg("--pdf")
        .arg(&pdf_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("portrait"));
}

#[test]
fn test_backup_export_and_import() {
    let data_dir = setup_test_dir();
    let backup_path = data_dir.path().join("backup.json");

    cli(&data_dir)
        .args(["profiles", "create", "Meu Checkup", "--category", "GLICEMIA:Glicose"])
        .assert()
        .success();

    cli(&data_dir)
        .arg("backup")
        .arg("export")
        .arg(&backup_path)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&backup_path).unwrap();
    let blob: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(blob.get("profiles").is_some());
    assert!(blob.get("favorite_profiles").is_some());
    assert!(blob.get("exported_at").is_some());

    // Import into a fresh data dir.
    let other_dir = setup_test_dir();
    cli(&other_dir)
        .arg("backup")
        .arg("import")
        .arg(&backup_path)
        .assert()
        .success();

    cli(&other_dir)
        .args(["profiles", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Meu Checkup"));
}

#[test]
fn test_backup_import_rejects_invalid_blob() {
    let data_dir = setup_test_dir();
    let backup_path = data_dir.path().join("bad.json");
    std::fs::write(&backup_path, r#"{"profiles": {}}"#).unwrap();

    cli(&data_dir)
        .arg("backup")
        .arg("import")
        .arg(&backup_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid backup data"));
}
