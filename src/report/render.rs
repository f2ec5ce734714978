use crate::report::{Line, PanelOutcome, Report};
use std::fmt::Write;

/// Renders a report as plain text, one block per panel.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &Report) -> std::fmt::Result {
    writeln!(out, "Data Quality Report: {}", report.source)?;
    writeln!(out, "{} rows, {} columns", report.rows, report.columns)?;
    for panel in &report.panels {
        writeln!(out)?;
        writeln!(out, "== {} ==", panel.title)?;
        match &panel.outcome {
            PanelOutcome::Failed(message) => writeln!(out, "  [error] {message}")?,
            PanelOutcome::Lines(lines) => {
                for line in lines {
                    write_line(out, line)?;
                }
            }
        }
    }
    Ok(())
}

fn write_line(out: &mut String, line: &Line) -> std::fmt::Result {
    match line {
        Line::Success(message) => writeln!(out, "  [ok] {message}"),
        Line::Warning(message) => writeln!(out, "  [warning] {message}"),
        Line::Info(message) => writeln!(out, "  [info] {message}"),
        Line::Listing(entries) => {
            let width = entries.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
            for (key, value) in entries {
                writeln!(out, "  {key:<width$}  {value}")?;
            }
            Ok(())
        }
        Line::Preview { columns, rows } => {
            let widths: Vec<usize> = columns
                .iter()
                .enumerate()
                .map(|(index, column)| {
                    rows.iter()
                        .filter_map(|row| row.get(index))
                        .map(|cell| cell.chars().count())
                        .chain(std::iter::once(column.chars().count()))
                        .max()
                        .unwrap_or(0)
                })
                .collect();
            write_row(out, columns, &widths)?;
            let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
            write_row(out, &rule, &widths)?;
            for row in rows {
                write_row(out, row, &widths)?;
            }
            Ok(())
        }
    }
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) -> std::fmt::Result {
    let cells: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "  {}", cells.join(" | ").trim_end())
}
