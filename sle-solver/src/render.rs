//! Pure text rendering for clients
//!
//! The solver never calls these; they turn result values into strings a
//! front end can show or copy.

use crate::types::{Matrix, Vector};

/// Decimal notation without exponent, e.g. `1.2e-15` → `"0.0000000000000012"`
pub fn plain_decimal(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Aligned grid with one bracketed row per line
pub fn render_matrix(a: &Matrix) -> String {
    let cells: Vec<Vec<String>> = a
        .to_rows()
        .iter()
        .map(|row| row.iter().map(|&x| format_cell(x)).collect())
        .collect();
    render_grid(&cells)
}

/// `[A | b]` grid
pub fn render_augmented(a: &Matrix, b: &Vector) -> String {
    let cells: Vec<Vec<String>> = a
        .to_rows()
        .iter()
        .zip(b.iter())
        .map(|(row, &rhs)| {
            let mut line: Vec<String> = row.iter().map(|&x| format_cell(x)).collect();
            line.push("|".to_string());
            line.push(format_cell(rhs));
            line
        })
        .collect();
    render_grid(&cells)
}

/// Single-line export: rows joined by `;`, then the right-hand side
///
/// `[[1, 2], [3, 4]]`, `[5, 6]` → `"[1,2;3,4] [5;6]"`
pub fn export_system(a: &Matrix, b: &Vector) -> String {
    let rows: Vec<String> = a
        .to_rows()
        .iter()
        .map(|row| row.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(","))
        .collect();
    let rhs: Vec<String> = b.iter().map(|x| x.to_string()).collect();
    format!("[{}] [{}]", rows.join(";"), rhs.join(";"))
}

fn format_cell(value: f64) -> String {
    if value == 0.0 {
        // Avoid printing "-0"
        return "0".to_string();
    }
    let text = format!("{:.4}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

fn render_grid(cells: &[Vec<String>]) -> String {
    let cols = cells.iter().map(|r| r.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..cols)
        .map(|j| cells.iter().filter_map(|r| r.get(j)).map(|c| c.len()).max().unwrap_or(0))
        .collect();

    cells
        .iter()
        .map(|row| {
            let padded: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(j, c)| format!("{:>width$}", c, width = widths[j]))
                .collect();
            format!("[ {} ]", padded.join("  "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
