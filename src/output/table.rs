//! Bordered grid rendering

use std::io::Write;

use console::measure_text_width;

use super::columns::ColumnSelection;
use super::fields::OrderedFields;

/// Header label for a column name: `expires_at` -> `EXPIRES AT`
pub fn header_label(column: &str) -> String {
    column.to_uppercase().replace('_', " ")
}

/// Render rows as a bordered table. Columns come from the first row;
/// zero rows print nothing.
pub fn render<W: Write + ?Sized>(
    out: &mut W,
    selection: &ColumnSelection,
    rows: &[OrderedFields],
) -> std::io::Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };

    let columns = selection.resolve(first);
    let header: Vec<String> = columns.iter().map(|c| header_label(c)).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.value(c).unwrap_or_default().to_string())
                .collect()
        })
        .collect();

    draw(out, &header, &body)
}

fn draw<W: Write + ?Sized>(
    out: &mut W,
    header: &[String],
    body: &[Vec<String>],
) -> std::io::Result<()> {
    let mut widths: Vec<usize> = header.iter().map(|h| measure_text_width(h)).collect();
    for line in body {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let border = widths
        .iter()
        .fold(String::from("+"), |acc, w| acc + &"-".repeat(w + 2) + "+");

    writeln!(out, "{}", border)?;
    write_line(out, header, &widths)?;
    writeln!(out, "{}", border)?;
    for line in body {
        write_line(out, line, &widths)?;
    }
    writeln!(out, "{}", border)
}

fn write_line<W: Write + ?Sized>(
    out: &mut W,
    cells: &[String],
    widths: &[usize],
) -> std::io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(measure_text_width(cell));
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    writeln!(out, "| {} |", padded.join(" | "))
}
