//! Shared helpers for fixture-driven tests across the workspace.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

const CONTEXT: usize = 2;

/// Human-readable report of the first mismatching line between two snapshots,
/// with a little context on either side.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;

    let line = |lines: &[String], i: usize| lines.get(i).cloned().unwrap_or_else(|| "<missing>".into());
    let total = expected.len().max(actual.len());
    let mut report = String::new();

    if let Some(at) = (0..total).find(|&i| expected.get(i) != actual.get(i)) {
        let window = at.saturating_sub(CONTEXT)..(at + CONTEXT + 1).min(total);
        let _ = writeln!(report, "line {} differs:", at + 1);
        for i in window {
            let marker = if i == at { '>' } else { ' ' };
            let _ = writeln!(report, "{marker}{:>5} - {}", i + 1, line(expected, i));
            let _ = writeln!(report, "{marker}{:>5} + {}", i + 1, line(actual, i));
        }
    }
    let _ = writeln!(report, "{} expected lines, {} actual lines", expected.len(), actual.len());
    report
}

/// Assert two line snapshots are equal, panicking with a focused diff.
pub fn assert_lines_eq(expected: &[String], actual: &[String]) {
    if expected != actual {
        panic!("{}", diff_lines(expected, actual));
    }
}

/// Load a TOML fixture file into `T`, panicking with the path on failure.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> T {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read TOML fixture {path:?}: {err}"));
    toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse TOML fixture {path:?}: {err}"))
}

/// Load a JSON fixture file into `T`, panicking with the path on failure.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> T {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read JSON fixture {path:?}: {err}"));
    serde_json::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse JSON fixture {path:?}: {err}"))
}

/// Path of a fixture relative to the calling crate's manifest directory.
pub fn fixture_path(manifest_dir: &str, relative: &str) -> std::path::PathBuf {
    Path::new(manifest_dir).join(relative)
}
