//! Shared presentation: headings and the validation report.

use crate::engine::ValidationReport;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Section heading, bold and underlined.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Borderless table with a header row
pub(super) fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(header);
    table
}

pub(super) fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn format_validation_report_text(report: &ValidationReport) -> String {
    if report.errors.is_empty() && report.warnings.is_empty() {
        return "Validation passed:\n  All checks passed".to_string();
    }
    let mut s = if report.is_valid() {
        "Validation passed with warnings:".to_string()
    } else {
        "Validation failed:".to_string()
    };
    if !report.errors.is_empty() {
        s.push_str(&format!("\n\nErrors ({}):", report.errors.len()));
        for e in &report.errors {
            s.push_str(&format!("\n  - {}", e));
        }
    }
    if !report.warnings.is_empty() {
        s.push_str(&format!("\n\nWarnings ({}):", report.warnings.len()));
        for w in &report.warnings {
            s.push_str(&format!("\n  - {}", w));
        }
    }
    s
}
