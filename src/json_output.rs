//! JSON output format for lint reports
//!
//! Sprint 3: --format json implementation

use crate::stats::percent;
use crate::visitor::Diagnostic;
use serde::{Deserialize, Serialize};

/// Wire format marker for the root object.
pub const JSON_FORMAT: &str = "revisar-json-v1";

/// A single diagnostic in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub rule_id: String,
    pub rule_name: String,
    pub rule_text: String,
    /// Cursor kind the diagnostic anchors to (e.g., "CompoundStmt")
    pub ast_kind: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    /// Offending code excerpt, truncated to 32 characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_code: Option<String>,
}

impl From<&Diagnostic> for JsonDiagnostic {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            rule_id: diagnostic.rule_id.clone(),
            rule_name: diagnostic.rule_name.clone(),
            rule_text: diagnostic.message.clone(),
            ast_kind: diagnostic.cursor_kind.as_str().to_string(),
            file: diagnostic.file.display().to_string(),
            line: diagnostic.line,
            column: diagnostic.column,
            err_code: diagnostic.snippet.clone(),
        }
    }
}

/// Summary for the whole lint session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    /// Number of translation units checked successfully
    pub files_checked: u64,
    /// Number of files that failed to decode or parse
    pub files_failed: u64,
    /// Total diagnostics across all files
    pub total_diagnostics: u64,
    /// files_checked / (files_checked + files_failed), as a percentage
    pub pass_rate: f64,
    /// Wall-clock session duration in whole seconds
    pub duration_secs: u64,
}

/// Root JSON output structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Revisar version that produced the report
    pub version: String,
    /// Format identifier for parsers
    pub format: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    pub fn new(
        diagnostics: &[Diagnostic],
        files_checked: u64,
        files_failed: u64,
        duration_secs: u64,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: JSON_FORMAT.to_string(),
            diagnostics: diagnostics.iter().map(JsonDiagnostic::from).collect(),
            summary: JsonSummary {
                files_checked,
                files_failed,
                total_diagnostics: diagnostics.len() as u64,
                pass_rate: percent(files_checked, files_failed),
                duration_secs,
            },
        }
    }

    pub fn render(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
