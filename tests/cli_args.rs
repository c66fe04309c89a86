//! CLI arg parsing tests for the ssetop binary.

use assert_cmd::Command;

fn run(args: &[&str]) -> (bool, String) {
    let output = Command::cargo_bin("ssetop")
        .expect("binary built")
        .args(args)
        .output()
        .expect("run ssetop");
    let ok = output.status.success();
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (ok, text)
}

#[test]
fn test_help_mentions_flags() {
    let (ok, text) = run(&["--help"]);
    assert!(ok);
    assert!(
        text.contains("--profile") && text.contains("-P") && text.contains("--save"),
        "help text missing expected flags (--profile/-P, --save)\n{text}"
    );
    assert!(text.contains("Usage:"));
}

#[test]
fn test_unexpected_extra_argument_reports_usage() {
    let (_ok, text) = run(&["http://a/sse", "http://b/sse"]);
    assert!(
        text.contains("Unexpected argument"),
        "expected usage complaint, got:\n{text}"
    );
}

#[test]
fn test_dry_run_with_url_exits_cleanly() {
    let (ok, text) = run(&["http://127.0.0.1:9/api/stats/sse", "--dry-run"]);
    assert!(ok, "dry run should not attempt a connection:\n{text}");
}

#[test]
fn test_profile_equals_form_accepted() {
    let (ok, text) = run(&["--profile=tmpform", "--help"]);
    assert!(ok);
    assert!(text.contains("Usage:"));
}
