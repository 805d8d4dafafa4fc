use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn ioclens() -> Command {
    Command::cargo_bin("ioclens").expect("binary")
}

#[test]
fn classify_reads_stdin_and_dedupes() {
    ioclens()
        .args(["classify"])
        .write_stdin("8.8.8.8\n8.8.8.8, evil.example.com\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("8.8.8.8\tipv4"))
        .stdout(predicate::str::contains("evil.example.com\tdomain"))
        .stdout(predicate::str::contains("8.8.8.8").count(1));
}

#[test]
fn classify_json_emits_type_per_value() {
    let output = ioclens()
        .args(["classify", "--json"])
        .write_stdin("CVE-2021-44228")
        .output()
        .expect("run");
    assert!(output.status.success());
    let items: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(items[0]["value"], "CVE-2021-44228");
    assert_eq!(items[0]["type"], "cve");
}

#[test]
fn classify_rejects_empty_input() {
    ioclens()
        .args(["classify"])
        .write_stdin(" \n, \t")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no indicators found"));
}

#[test]
fn scan_aggregates_a_recorded_stream() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("iocs.txt");
    let stream = temp.path().join("events.txt");
    fs::write(&input, "8.8.8.8\nevil.example.com\n").unwrap();
    fs::write(
        &stream,
        concat!(
            "{\"ioc\":\"8.8.8.8\",\"service\":\"abuseipdb\",",
            "\"data\":{\"data\":{\"abuseConfidenceScore\":97,\"totalReports\":12}}}\n\n",
            "{\"ioc\":\"evil.example.com\",\"service\":\"virustotal\",\"error\":\"quota exceeded\"}\n\n",
        ),
    )
    .unwrap();

    let output = ioclens()
        .args([
            "scan",
            "--input",
            input.to_str().unwrap(),
            "--stream",
            stream.to_str().unwrap(),
            "--services",
            "abuseipdb,virustotal",
            "--json",
        ])
        .output()
        .expect("run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let view: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(view["progress_percent"], 100);
    assert_eq!(view["ordered_types"], serde_json::json!(["ipv4", "domain"]));

    let ip = &view["groups"]["ipv4"][0];
    assert_eq!(ip["overall_severity"], "red");
    assert_eq!(ip["services"]["abuseipdb"]["status"], "completed");
    // No event arrived for the other pair; it stays visibly in flight.
    assert_eq!(ip["services"]["virustotal"]["status"], "loading");

    let domain = &view["groups"]["domain"][0];
    assert_eq!(domain["services"]["virustotal"]["status"], "error");
    assert_eq!(domain["overall_severity"], "white");
}

#[test]
fn scan_renders_a_text_table_by_default() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("iocs.txt");
    let stream = temp.path().join("events.txt");
    fs::write(&input, "8.8.8.8").unwrap();
    fs::write(
        &stream,
        "{\"ioc\":\"8.8.8.8\",\"service\":\"greynoise\",\"data\":{\"classification\":\"malicious\"}}\n\n",
    )
    .unwrap();

    ioclens()
        .args([
            "scan",
            "--input",
            input.to_str().unwrap(),
            "--stream",
            stream.to_str().unwrap(),
            "--services",
            "greynoise",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("== IPv4 (1) =="))
        .stdout(predicate::str::contains("8.8.8.8  [RED]"))
        .stdout(predicate::str::contains("Progress: 100%"));
}

#[test]
fn scan_rejects_unknown_services() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("iocs.txt");
    fs::write(&input, "8.8.8.8").unwrap();

    ioclens()
        .args([
            "scan",
            "--input",
            input.to_str().unwrap(),
            "--stream",
            "-",
            "--services",
            "nonexistent",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown service"));
}

#[test]
fn scan_rejects_empty_indicator_input() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("iocs.txt");
    let stream = temp.path().join("events.txt");
    fs::write(&input, "\n\n").unwrap();
    fs::write(&stream, "").unwrap();

    ioclens()
        .args([
            "scan",
            "--input",
            input.to_str().unwrap(),
            "--stream",
            stream.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no indicators found"));
}

#[test]
fn scan_refuses_double_stdin() {
    ioclens()
        .args(["scan", "--input", "-", "--stream", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot both read from stdin"));
}
