use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_treasure-map"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch treasure-map");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to feed the map");
    child.wait_with_output().expect("treasure-map did not finish")
}

#[test]
fn simulates_a_map_from_stdin() {
    let input = "C - 3 - 4\n\
                 M - 1 - 0\n\
                 M - 2 - 1\n\
                 T - 0 - 3 - 2\n\
                 T - 1 - 3 - 3\n\
                 A - Lara - 1 - 1 - S - AADADAGGA\n";

    let output = run_with_stdin(&["-"], input);

    assert!(output.status.success(), "treasure-map should succeed");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "C - 3 - 4\nM - 1 - 0\nM - 2 - 1\nT - 1 - 3 - 2\nA - Lara - 0 - 3 - S - 3\n"
    );
}

#[test]
fn reports_missing_map_without_output() {
    let output = run_with_stdin(&["-"], "# only a comment\n");

    assert!(!output.status.success(), "missing map must fail");
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no map found"));
}

#[test]
fn stats_are_printed_on_request() {
    let input = "C - 3 - 3\nA - Jon - 0 - 0 - E - A\nA - Jane - 1 - 0 - W - A\n";

    let output = run_with_stdin(&["-", "--stats"], input);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("blocked: 2"), "unexpected stats: {stderr}");
}

#[test]
fn legacy_flag_accepts_repeated_maps() {
    let input = "C - 3 - 3\nC - 2 - 2\nA - Jon - 0 - 0 - S - A\n";

    let strict = run_with_stdin(&["-"], input);
    let legacy = run_with_stdin(&["-", "--legacy"], input);

    assert!(!strict.status.success());
    assert!(legacy.status.success());
    assert_eq!(
        String::from_utf8_lossy(&legacy.stdout),
        "C - 2 - 2\nA - Jon - 0 - 1 - S - 0\n"
    );
}

#[test]
fn stats_can_be_printed_as_json() {
    let input = "C - 3 - 3\nA - Jon - 0 - 0 - E - A\nA - Jane - 1 - 0 - W - A\n";

    let output = run_with_stdin(&["-", "--stats", "--stats-format", "json"], input);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let report: serde_json::Value =
        serde_json::from_str(stderr.trim()).expect("stats are a JSON object");
    assert_eq!(report["ticks"], 1);
    assert_eq!(report["advances"], 0);
    assert_eq!(report["blocked"]["occupied"], 2);
    assert_eq!(report["blocked"]["contested"], 0);
    assert_eq!(report["treasures_collected"], 0);
}
