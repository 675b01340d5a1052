//! Rendering resolved configurations for humans.

use std::fmt::Write;

use heck::ToShoutySnakeCase;
use owo_colors::OwoColorize;

use crate::effective::Effective;
use crate::schema::Schema;

/// Render an effective configuration, one key per line with its value and
/// provenance, followed by the override events when any were recorded.
pub fn render_effective(effective: &Effective) -> String {
    let mut output = String::new();

    let key_width = effective.keys().map(str::len).max().unwrap_or(0);
    let value_width = effective
        .iter()
        .map(|(_, sourced)| sourced.value.to_string().len())
        .max()
        .unwrap_or(0);

    for (key, sourced) in effective.iter() {
        let value = sourced.value.to_string();
        let source = sourced.provenance.source_description();
        // Pad before styling so ANSI escapes don't skew the columns.
        writeln!(
            output,
            "  {}  {:value_width$}  {}",
            format!("{key:key_width$}").bold(),
            value,
            format!("({source})").dimmed(),
        )
        .unwrap();
    }

    if !effective.overrides().is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "{}", "Overrides:".bold()).unwrap();
        for ovr in effective.overrides() {
            writeln!(
                output,
                "  {}: {} {} {}",
                ovr.key.bold(),
                ovr.winner.source_description().green(),
                "overrides".dimmed(),
                ovr.loser.source_description().red(),
            )
            .unwrap();
        }
    }

    output
}

/// Format a focused summary for missing required keys, with set-it-via
/// hints so users see how to provide each one without reading the schema.
pub fn format_missing_keys(keys: &[String], schema: &Schema, env_prefix: Option<&str>) -> String {
    if keys.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    for key in keys {
        let Some(property) = schema.get(key) else {
            continue;
        };

        write!(
            output,
            "  {} <{}>",
            key.bold(),
            property.kind().to_string().cyan()
        )
        .unwrap();

        if let Some(prefix) = env_prefix {
            let var = format!("{}__{}", prefix, key.to_shouty_snake_case());
            write!(output, " ({})", format!("${var}").yellow()).unwrap();
        }

        if let Some(doc) = property.doc_comment() {
            write!(output, "\n    {}", doc.dimmed()).unwrap();
        }

        output.push('\n');
    }

    output
}
