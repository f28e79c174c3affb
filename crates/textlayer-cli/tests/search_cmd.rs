use predicates::prelude::*;

mod common;
use common::{cmd, sample_file};

fn search_json(args: &[&str]) -> serde_json::Value {
    let tmp = sample_file();
    let mut full = vec!["search", tmp.path().to_str().unwrap()];
    full.extend_from_slice(args);
    full.extend_from_slice(&["--format", "json"]);
    let output = cmd().env_remove("RUST_LOG").args(&full).output().unwrap();
    assert!(output.status.success(), "search failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn text_format_lists_rects_and_status() {
    let tmp = sample_file();
    let output = cmd()
        .env_remove("RUST_LOG")
        .args(["search", tmp.path().to_str().unwrap(), "foo"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "page\tmatch\tcurrent\ttop\tleft\twidth\theight\n",
        ))
        .stderr(predicate::str::contains("1 / 4"));

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let rows: Vec<&str> = stdout.lines().skip(1).collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].starts_with("1\t0\ttrue\t"), "{}", rows[0]);
    assert!(rows[3].starts_with("3\t3\tfalse\t"), "{}", rows[3]);
}

#[test]
fn json_rect_matches_glyph_geometry() {
    let result = search_json(&["1829"]);
    assert_eq!(result["status"], "1 / 1");
    let rect = &result["highlights"][0];
    assert_eq!(rect["page"], 1);
    assert_eq!(rect["current"], true);
    assert_eq!(rect["fill"], "rgba(255, 165, 0, 0.6)");
    let approx = |key: &str, expected: f64| {
        let actual = rect[key].as_f64().unwrap();
        assert!((actual - expected).abs() < 1e-6, "{key}: {actual} != {expected}");
    };
    approx("top", 842.0 - 632.0);
    approx("left", 130.76);
    approx("width", 23.856);
    approx("height", 12.0);
}

#[test]
fn scale_multiplies_geometry() {
    let result = search_json(&["1829", "--scale", "200"]);
    let width = result["highlights"][0]["width"].as_f64().unwrap();
    assert!((width - 23.856 * 2.0).abs() < 1e-6);
}

#[test]
fn case_sensitive_narrows_matches() {
    let result = search_json(&["Foo", "--case-sensitive"]);
    assert_eq!(result["total"], 1);
    assert_eq!(result["highlights"][0]["page"], 2);
}

#[test]
fn current_selects_match() {
    let result = search_json(&["foo", "--current", "3"]);
    assert_eq!(result["current"], 3);
    let current: Vec<&serde_json::Value> = result["highlights"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|h| h["current"] == true)
        .collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0]["match"], 2);
    assert_eq!(current[0]["page"], 2);
}

#[test]
fn current_out_of_range_warns() {
    let tmp = sample_file();
    cmd()
        .env_remove("RUST_LOG")
        .args(["search", tmp.path().to_str().unwrap(), "foo", "--current", "10"])
        .assert()
        .success()
        .stderr(predicate::str::contains("current match out of range"))
        .stderr(predicate::str::contains("1 / 4"));
}

#[test]
fn pages_limit_mounted_pages() {
    let result = search_json(&["foo", "--pages", "1"]);
    assert_eq!(result["total"], 2);
}

#[test]
fn rotated_page_highlight_is_vertical() {
    let result = search_json(&["foo", "--pages", "3"]);
    let rect = &result["highlights"][0];
    assert!(rect["height"].as_f64().unwrap() > rect["width"].as_f64().unwrap());

    // Turning it back cancels the page's own quarter turn.
    let result = search_json(&["foo", "--pages", "3", "--rotation", "-90"]);
    let rect = &result["highlights"][0];
    assert!(rect["width"].as_f64().unwrap() > rect["height"].as_f64().unwrap());
}

#[test]
fn no_matches_reported() {
    let tmp = sample_file();
    cmd()
        .env_remove("RUST_LOG")
        .args(["search", tmp.path().to_str().unwrap(), "zzz", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::eq("page,match,current,top,left,width,height\n"))
        .stderr(predicate::str::contains("no matches"));
}

#[test]
fn empty_query_prints_no_status() {
    let tmp = sample_file();
    cmd()
        .env_remove("RUST_LOG")
        .args(["search", tmp.path().to_str().unwrap(), ""])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn invalid_rotation_fails() {
    let tmp = sample_file();
    cmd()
        .args(["search", tmp.path().to_str().unwrap(), "foo", "--rotation", "45"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid rotation"));
}

#[test]
fn verbose_emits_debug_logs() {
    let tmp = sample_file();
    cmd()
        .args(["-v", "search", tmp.path().to_str().unwrap(), "foo"])
        .assert()
        .success()
        .stderr(predicate::str::contains("mounted pages"));
}
