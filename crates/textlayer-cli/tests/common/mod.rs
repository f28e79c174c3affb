//! Shared fixtures for CLI integration tests.

#![allow(dead_code)]

use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

pub fn cmd() -> Command {
    Command::cargo_bin("textlayer").unwrap()
}

fn item(text: &str, x: f64, y: f64, width: f64) -> serde_json::Value {
    serde_json::json!({
        "str": text,
        "dir": "ltr",
        "width": width,
        "height": 12.0,
        "transform": [12.0, 0.0, 0.0, 12.0, x, y],
        "fontName": "g_d0_f1",
        "hasEOL": false,
    })
}

/// Three A4 pages: a label/value header with body text, a page with a
/// capitalized match, and a page rotated a quarter turn.
pub fn sample_dump() -> serde_json::Value {
    serde_json::json!({
        "pages": [
            {
                "pageNumber": 1,
                "width": 595.0,
                "height": 842.0,
                "rotate": 0,
                "items": [
                    { "type": "beginMarkedContentProps", "id": "mc0" },
                    item("1829", 130.76, 620.0, 23.856),
                    item("Saksnummer:", 56.7, 620.0, 71.652),
                    { "type": "endMarkedContent" },
                    item("foo bar foo", 56.7, 600.0, 66.0),
                ]
            },
            {
                "pageNumber": 2,
                "width": 595.0,
                "height": 842.0,
                "items": [
                    item("Foo", 56.7, 780.0, 18.0),
                    item("fighters", 80.0, 780.0, 48.0),
                ]
            },
            {
                "pageNumber": 3,
                "width": 595.0,
                "height": 842.0,
                "rotate": 90,
                "items": [ item("foo", 56.7, 700.0, 18.0) ]
            }
        ]
    })
}

pub fn write_json(value: &serde_json::Value) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(value.to_string().as_bytes()).unwrap();
    tmp
}

pub fn sample_file() -> NamedTempFile {
    write_json(&sample_dump())
}
