//! Rendering validation results for the terminal or as JSON.

use json_schema_validation::ValidationError;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Result of validating one instance file
#[derive(Debug, Serialize)]
pub struct InstanceReport {
    pub instance: String,
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl InstanceReport {
    pub fn new(path: &Path, errors: Vec<ValidationError>) -> Self {
        Self {
            instance: path.display().to_string(),
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// One block per instance. Branch errors of `anyOf`/`oneOf` are nested
/// under the error that carries them.
pub fn render_text(reports: &[InstanceReport]) -> String {
    let mut out = String::new();
    for report in reports {
        if report.valid {
            let _ = writeln!(out, "✓ {}", report.instance);
            continue;
        }
        let _ = writeln!(out, "✖ {}", report.instance);
        for error in &report.errors {
            write_error(&mut out, error, 1);
        }
    }
    out
}

fn write_error(out: &mut String, error: &ValidationError, depth: usize) {
    let _ = writeln!(out, "{}{}", "  ".repeat(depth), error);
    for branch in &error.context {
        write_error(out, branch, depth + 1);
    }
}

pub fn render_json(reports: &[InstanceReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}
