use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn milk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("milk").unwrap();
    cmd.env("MILK_LEDGER_DATA_DIR", dir.path()).env_remove("MILK_LOG");
    cmd
}

fn add(dir: &TempDir, quantity: &str, animals: &str, date: &str) {
    milk(dir)
        .args(["add", quantity, "-a", animals, "-d", date])
        .assert()
        .success();
}

#[test]
fn add_then_total() {
    let dir = TempDir::new().unwrap();

    milk(&dir)
        .args(["add", "10", "-a", "2", "-d", "2024-01-01T06:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded entry ent-"))
        .stdout(predicate::str::contains("Per animal: 5.00 kg"));

    milk(&dir)
        .arg("total")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total milk: 10.0 kg (1 entries)"));

    assert!(dir.path().join("milk-tracker-data.json").exists());
}

#[test]
fn invalid_quantity_is_rejected() {
    let dir = TempDir::new().unwrap();

    milk(&dir)
        .args(["add", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));

    milk(&dir)
        .args(["add", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));

    milk(&dir)
        .args(["add", "12", "-a", "zero"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Animal count"));

    milk(&dir)
        .arg("total")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total milk: 0.0 kg (0 entries)"));
}

#[test]
fn calc_previews_without_saving() {
    let dir = TempDir::new().unwrap();

    milk(&dir)
        .args(["calc", "30", "-a", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Per animal: 7.50 kg"));

    assert!(!dir.path().join("milk-tracker-data.json").exists());
}

#[test]
fn daily_report_groups_same_day() {
    let dir = TempDir::new().unwrap();
    add(&dir, "10", "2", "2024-01-01T06:00");
    add(&dir, "20", "2", "2024-01-01T18:00");

    milk(&dir)
        .args(["report", "-s", "2024-01-01", "-e", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Milk: 30.0 kg"))
        .stdout(predicate::str::contains("1/1/2024"))
        .stdout(predicate::str::contains("7.50"));
}

#[test]
fn report_start_after_end_fails() {
    let dir = TempDir::new().unwrap();
    add(&dir, "10", "1", "2024-02-15T06:00");

    milk(&dir)
        .args(["report", "-s", "2024-03-01", "-e", "2024-02-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date range"));
}

#[test]
fn report_with_no_entries_in_range() {
    let dir = TempDir::new().unwrap();
    add(&dir, "10", "1", "2024-02-15T06:00");

    milk(&dir)
        .args(["report", "-s", "2024-01-01", "-e", "2024-01-31", "-g", "weekly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries found between 1/1/2024 and 31/1/2024."));
}

#[test]
fn report_exports_files() {
    let dir = TempDir::new().unwrap();
    add(&dir, "10", "2", "2024-03-04T06:00");
    add(&dir, "14", "2", "2024-03-20T06:00");

    let csv_path = dir.path().join("report.csv");
    let html_path = dir.path().join("report.html");
    let text_path = dir.path().join("report.txt");

    milk(&dir)
        .args(["report", "-s", "2024-03-01", "-e", "2024-03-31", "-g", "monthly"])
        .arg("--csv")
        .arg(&csv_path)
        .arg("--html")
        .arg(&html_path)
        .arg("--text")
        .arg(&text_path)
        .assert()
        .success();

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.contains("March 2024,24.0,2,6.00,2"));
    assert!(fs::read_to_string(&html_path).unwrap().contains("<td>March 2024</td>"));
    assert!(fs::read_to_string(&text_path)
        .unwrap()
        .contains("March 2024: 24.0 kg, 2 animals, 6.00 kg per animal"));
}

#[test]
fn delete_requires_force() {
    let dir = TempDir::new().unwrap();
    add(&dir, "10", "1", "2024-01-01T06:00");

    let data = fs::read_to_string(dir.path().join("milk-tracker-data.json")).unwrap();
    let document: serde_json::Value = serde_json::from_str(&data).unwrap();
    let id = document["entries"][0]["id"].as_str().unwrap().to_string();

    milk(&dir)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    milk(&dir)
        .arg("total")
        .assert()
        .stdout(predicate::str::contains("(1 entries)"));

    milk(&dir)
        .args(["delete", &id[..8], "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted entry"));

    milk(&dir)
        .arg("total")
        .assert()
        .stdout(predicate::str::contains("(0 entries)"));

    milk(&dir)
        .args(["delete", &id, "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entry not found"));
}

#[test]
fn clear_requires_force() {
    let dir = TempDir::new().unwrap();
    add(&dir, "10", "1", "2024-01-01T06:00");
    add(&dir, "11", "1", "2024-01-02T06:00");

    milk(&dir)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("delete all 2 entries"));

    milk(&dir)
        .args(["clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 entries."));

    milk(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries recorded."));
}

#[test]
fn price_and_finance() {
    let dir = TempDir::new().unwrap();
    add(&dir, "10", "2", "2024-01-01T06:00");
    add(&dir, "20", "2", "2024-01-02T06:00");

    milk(&dir)
        .args(["price", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));

    milk(&dir)
        .args(["price", "0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Milk price set to $0.50 / kg"));

    milk(&dir)
        .arg("finance")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total revenue:       $15.00"))
        .stdout(predicate::str::contains("Avg daily revenue:   $7.50"))
        .stdout(predicate::str::contains("Average per animal:  7.50 kg"));
}

#[test]
fn backup_and_restore_latest() {
    let dir = TempDir::new().unwrap();
    add(&dir, "10", "2", "2024-01-01T06:00");

    milk(&dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("milk-tracker-backup-"));

    milk(&dir).args(["clear", "--force"]).assert().success();

    milk(&dir)
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    milk(&dir)
        .args(["backup", "restore", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 entries restored"));

    milk(&dir)
        .arg("total")
        .assert()
        .stdout(predicate::str::contains("Total milk: 10.0 kg (1 entries)"));
}

#[test]
fn restore_rejects_malformed_backup() {
    let dir = TempDir::new().unwrap();
    add(&dir, "10", "1", "2024-01-01T06:00");

    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"settings": {"milkPrice": 1}}"#).unwrap();

    milk(&dir)
        .args(["backup", "restore"])
        .arg(&bad)
        .arg("--force")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid backup format"));

    milk(&dir)
        .arg("total")
        .assert()
        .stdout(predicate::str::contains("(1 entries)"));
}

#[test]
fn cloud_backup_sets_flag() {
    let dir = TempDir::new().unwrap();

    milk(&dir)
        .args(["backup", "cloud", "--delay-ms", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloud backup completed"));

    milk(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloud backup:       true"));
}

#[test]
fn corrupt_data_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("milk-tracker-data.json"), "{ not json").unwrap();

    milk(&dir)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("saved data could not be loaded"))
        .stdout(predicate::str::contains("No entries recorded."));

    milk(&dir)
        .args(["add", "3", "-d", "2024-01-01T06:00"])
        .assert()
        .success()
        .stderr(predicate::str::contains("kept as"));

    let kept = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .any(|e| fs::read_to_string(e.path()).map(|t| t == "{ not json").unwrap_or(false));
    assert!(kept);
}

#[test]
fn export_entry_log() {
    let dir = TempDir::new().unwrap();
    add(&dir, "12.5", "1", "2024-02-03T06:30");
    add(&dir, "10", "1", "2024-02-01T06:30");

    let out = dir.path().join("log.txt");
    milk(&dir).arg("export").arg(&out).assert().success();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "Milk Input Report\n\n\
         Date: 2024-02-01 06:30, Milk: 10 kg\n\
         Date: 2024-02-03 06:30, Milk: 12.5 kg\n"
    );
}

#[test]
fn history_lists_changes() {
    let dir = TempDir::new().unwrap();
    add(&dir, "10", "1", "2024-01-01T06:00");

    milk(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Entry ent-"));
}

#[test]
fn unreadable_stored_row_does_not_wipe_ledger() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("milk-tracker-data.json");
    let original = r#"{
  "entries": [
    { "id": 1704175200000, "quantity": 8, "date": "2024-01-02T06:00:00.000Z", "animalCount": -2 },
    { "id": 1704088800000, "quantity": 12, "date": "2024-01-01T06:00:00.000Z", "animalCount": 3 }
  ],
  "settings": { "milkPrice": 0.5 }
}"#;
    fs::write(&data_file, original).unwrap();

    milk(&dir)
        .args(["add", "5", "-d", "2024-01-03T06:00"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 stored item(s) could not be read"))
        .stderr(predicate::str::contains("milk-tracker-data.json.corrupt-"));

    milk(&dir)
        .arg("total")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total milk: 17.0 kg (2 entries)"));

    milk(&dir)
        .arg("finance")
        .assert()
        .success()
        .stdout(predicate::str::contains("$0.50"));

    let copies: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
        .collect();
    assert_eq!(copies.len(), 1);
    assert_eq!(fs::read_to_string(copies[0].path()).unwrap(), original);
}
