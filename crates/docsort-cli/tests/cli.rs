use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command with the user config directory pointed into `home`.
fn docsort(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docsort").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path());
    cmd
}

#[test]
fn test_amount_european_and_us() {
    let home = TempDir::new().unwrap();
    docsort(&home)
        .args(["amount", "1.234,56"])
        .assert()
        .success()
        .stdout("1234.56\n");
    docsort(&home)
        .args(["amount", "4,070.00"])
        .assert()
        .success()
        .stdout("4070.00\n");
}

#[test]
fn test_amount_rejects_garbage() {
    let home = TempDir::new().unwrap();
    docsort(&home)
        .args(["amount", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid amount"));
}

#[test]
fn test_extract_text_document() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("invoice_63.txt");
    fs::write(&file, "INVOICE No 63 ... DFW PROFESSIONAL SRL ... TOTAL EUR €1.250,00").unwrap();

    docsort(&home)
        .arg("extract")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tab\": \"dfw\""))
        .stdout(predicate::str::contains("\"invoice_number\": \"63\""))
        .stdout(predicate::str::contains("1250.00"));
}

#[test]
fn test_extract_assigned_tab() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("rohel.txt");
    fs::write(&file, "FACTURA seria ROH nr 44 ... ROHEL TRANS ...").unwrap();

    docsort(&home)
        .arg("extract")
        .arg(&file)
        .args(["--assign", "contrast", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("contrast,44,"))
        .stdout(predicate::str::contains("RON"));
}

#[test]
fn test_extract_missing_file() {
    let home = TempDir::new().unwrap();
    docsort(&home)
        .args(["extract", "/nonexistent/invoice.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_dedup_hidden_and_summary() {
    let home = TempDir::new().unwrap();
    let docs = home.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("a.txt"), "INVOICE No 5 DFW PROFESSIONAL").unwrap();
    fs::write(docs.join("b.txt"), "INVOICE No 5 DFW PROFESSIONAL").unwrap();
    fs::write(docs.join("c.txt"), "JTAPE order Total: 100,00").unwrap();

    let overrides = home.path().join("overrides.json");
    fs::write(&overrides, r#"{"c.txt": {"hidden": true}}"#).unwrap();
    let summary = home.path().join("summary.csv");

    docsort(&home)
        .arg("batch")
        .arg(format!("{}/*.txt", docs.display()))
        .arg("--overrides")
        .arg(&overrides)
        .arg("--summary")
        .arg(&summary)
        .args(["-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"duplicates\": 1"))
        .stdout(predicate::str::contains("\"hidden\": 1"))
        .stdout(predicate::str::contains("\"source_filename\": \"a.txt\""))
        .stdout(predicate::str::contains("jtape").not());

    let csv = fs::read_to_string(&summary).unwrap();
    assert!(csv.starts_with("tab,documents,with_amount,eur_total,unconverted"));
    assert!(csv.contains("dfw,1,0,"));
}

#[test]
fn test_batch_no_matches() {
    let home = TempDir::new().unwrap();
    docsort(&home)
        .arg("batch")
        .arg(format!("{}/*.pdf", home.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_classify_sender() {
    let home = TempDir::new().unwrap();
    docsort(&home)
        .args(["classify", "--from", "Ana Pop <ana@jtape.com>", "--subject", "Order 4512"])
        .assert()
        .success()
        .stdout(predicate::str::contains("customers"))
        .stdout(predicate::str::contains("ana@jtape.com"));
}

#[test]
fn test_classify_override_file() {
    let home = TempDir::new().unwrap();
    let overrides = home.path().join("categories.json");
    fs::write(&overrides, r#"{"jtape.com": "legal"}"#).unwrap();

    docsort(&home)
        .args(["classify", "--from", "ana@jtape.com", "-f", "json"])
        .arg("--overrides")
        .arg(&overrides)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"category\": \"legal\""));
}

#[test]
fn test_classify_system_sender() {
    let home = TempDir::new().unwrap();
    docsort(&home)
        .args(["classify", "--from", "MAILER-DAEMON@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("system sender"));
}

#[test]
fn test_config_init_get_set() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("docsort.json");

    docsort(&home)
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    docsort(&home)
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "extraction.recipient_max_len"])
        .assert()
        .success()
        .stdout("40\n");

    docsort(&home)
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "extraction.recipient_max_len", "25"])
        .assert()
        .success();

    docsort(&home)
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "extraction.recipient_max_len"])
        .assert()
        .success()
        .stdout("25\n");

    docsort(&home)
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_batch_output_independent_of_jobs() {
    let home = TempDir::new().unwrap();
    let docs = home.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    for i in 0..12 {
        let text = if i % 2 == 0 {
            "INVOICE No 7 DFW PROFESSIONAL TOTAL EUR 120,00".to_string()
        } else {
            format!("JTAPE order {} Total: {}00,00", i, i)
        };
        fs::write(docs.join(format!("doc_{:02}.txt", i)), text).unwrap();
    }
    let pattern = format!("{}/*.txt", docs.display());

    let run = |jobs: &str| {
        docsort(&home)
            .args(["batch", &pattern, "-j", jobs])
            .output()
            .unwrap()
            .stdout
    };
    let sequential = run("1");
    assert!(!sequential.is_empty());
    assert_eq!(sequential, run("8"));
}

#[test]
fn test_amount_explain_uses_parsed_shape() {
    let home = TempDir::new().unwrap();
    docsort(&home)
        .args(["amount", "250.00.", "--explain"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Plain: 250.00"));
}

#[test]
fn test_batch_reports_missing_dfw_numbers() {
    let home = TempDir::new().unwrap();
    let docs = home.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    for n in [1, 2, 4] {
        fs::write(
            docs.join(format!("dfw_{n}.txt")),
            format!("INVOICE No {n} DFW PROFESSIONAL"),
        )
        .unwrap();
    }

    docsort(&home)
        .arg("batch")
        .arg(format!("{}/*.txt", docs.display()))
        .args(["-f", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Missing dfw numbers (1-90): 3, 5, 6,"));
}

#[test]
fn test_classify_scan_direction() {
    let home = TempDir::new().unwrap();
    docsort(&home)
        .args([
            "classify",
            "--from",
            "facturi@smarttax.ro",
            "--to",
            "office@dfwprofessional.ro",
            "--subject",
            "Factura 2024-05",
            "--scan",
            "-f",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"direction\": \"tax_service\""));
}
