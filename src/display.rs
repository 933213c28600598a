use crate::compiler::{CompilationResult, FieldUsage};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde_json::json;
use std::fmt::Write as _;

/// Table with the shared look used by all text reports
pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

pub fn to_json_string(value: &serde_json::Value, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    // serializing a serde_json::Value cannot fail
    rendered.unwrap_or_default()
}

pub fn format_compilation_json(result: &CompilationResult, compact: bool) -> String {
    to_json_string(&json!(result), compact)
}

pub fn format_compilation_text(result: &CompilationResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Filter".bold());
    let _ = writeln!(out, "{}", to_json_string(&result.filter.to_json(), false));
    let _ = writeln!(out);

    if result.filter.is_match_all() {
        let _ = writeln!(out, "{}", "Filter matches every document.".yellow());
        let _ = writeln!(out);
    }

    out.push_str(&format_field_usage_text(result));
    out
}

/// Distinct skipped paths, in first-seen order
fn distinct_skipped(result: &CompilationResult) -> Vec<&str> {
    let mut skipped: Vec<&str> = Vec::new();
    for field in &result.skipped_fields {
        if !skipped.contains(&field.as_str()) {
            skipped.push(field);
        }
    }
    skipped
}

pub fn format_field_usage_json(result: &CompilationResult, compact: bool) -> String {
    let value = json!({
        "filtered_fields": result.filtered_fields,
        "fields": result.field_usage(),
        "skipped_fields": distinct_skipped(result),
        "skip_field_referenced": result.skip_applied(),
    });
    to_json_string(&value, compact)
}

pub fn format_field_usage_text(result: &CompilationResult) -> String {
    let mut out = String::new();
    let usage = result.field_usage();

    let _ = writeln!(out, "{}", "Referenced fields".bold());
    if usage.is_empty() {
        let _ = writeln!(out, "No fields referenced.");
    } else {
        let mut table = create_styled_table(&["Field", "References", "Skipped"]);
        for FieldUsage { field, count } in &usage {
            let skipped = if result.skipped_fields.contains(field) {
                "yes"
            } else {
                ""
            };
            table.add_row(vec![Cell::new(field), Cell::new(count), Cell::new(skipped)]);
        }
        let _ = writeln!(out, "{table}");
    }

    for skip in distinct_skipped(result) {
        let _ = writeln!(
            out,
            "{}",
            format!("Comparisons on '{skip}' were compiled to match_all.").cyan()
        );
    }
    out
}
