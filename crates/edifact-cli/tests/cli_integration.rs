//! Exercises the built binary end to end over real files, covering the
//! `--file`/`--output` code paths the unit tests inside `main.rs` don't
//! reach (those only test the pure helper functions).

use std::io::Write;
use std::process::Command;

const SAMPLE_ORDERS: &[u8] = b"UNA:+.? 'UNB+UNOA:4+SENDER:ZZ+RECEIVER:ZZ+230101:1200+00000001'UNH+1+ORDERS:D:96A:UN'BGM+220+ORDER001+9'UNT+3+1'UNZ+1+00000001'";

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_edifact-cli"))
}

fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

#[test]
fn parse_command_prints_interchange_summary_for_a_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(&dir, "orders.edi", SAMPLE_ORDERS);

    let output = bin()
        .args(["parse", "--file"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"message_type\": \"ORDERS\""));
    assert!(stdout.contains("\"sender\": \"SENDER\""));
}

#[test]
fn parse_command_exits_nonzero_on_missing_unz() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(
        &dir,
        "broken.edi",
        b"UNA:+.? 'UNB+UNOA:4+S:ZZ+R:ZZ+230101:1200+1'UNH+1+ORDERS:D:96A:UN'BGM+220+X'UNT+3+1'",
    );

    let output = bin().args(["parse", "--file"]).arg(&input).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn validate_command_reports_no_errors_for_a_well_formed_interchange() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(&dir, "orders.edi", SAMPLE_ORDERS);

    let output = bin().args(["validate", "--file"]).arg(&input).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn inspect_command_reports_delimiters_and_message_type() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(&dir, "orders.edi", SAMPLE_ORDERS);

    let output = bin().args(["inspect", "--file"]).arg(&input).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"message_type\": \"ORDERS\""));
    assert!(stdout.contains("\"component_separator\": \":\""));
}

#[test]
fn generate_command_writes_an_edifact_file_from_a_canonical_order() {
    let dir = tempfile::tempdir().unwrap();
    let order_json = br#"{
        "order_type": "PurchaseOrder",
        "order_number": "ORDER001",
        "order_date": "2023-01-01",
        "buyer": null,
        "seller": null,
        "shipping": null,
        "other_parties": [],
        "line_items": [],
        "totals": {
            "currency": null,
            "line_items_total": null,
            "total_allowances": null,
            "total_charges": null,
            "total_tax_amount": null,
            "grand_total": null
        }
    }"#;
    let input = write_fixture(&dir, "order.json", order_json);
    let output_path = dir.path().join("generated.edi");

    let output = bin()
        .arg("generate")
        .arg("--input")
        .arg(&input)
        .args(["--sender", "SENDER", "--recipient", "RECEIVER", "--output"])
        .arg(&output_path)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let generated = std::fs::read_to_string(&output_path).unwrap();
    assert!(generated.starts_with("UNA"));
    assert!(generated.contains("ORDER001"));
}
