// Terminal rendering of answer visuals

use crate::catalog::Visual;

/// Widest bar, in characters
const BAR_WIDTH: usize = 40;

pub fn render(visual: &Visual) -> String {
    match visual {
        Visual::BarChart { title, labels, values } => bar_chart(title, labels, values),
        Visual::Value(value) => value_card(value),
        Visual::Table { headers, rows } => table(headers, rows),
    }
}

fn bar_chart(title: &str, labels: &[&str], values: &[u64]) -> String {
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);

    let mut out = format!("{}\n", title);
    for (label, value) in labels.iter().zip(values) {
        let len = match (*value, max) {
            (0, _) | (_, 0) => 0,
            // non-zero values always get at least one block
            (v, m) => ((v as f64 / m as f64 * BAR_WIDTH as f64).round() as usize).max(1),
        };
        out.push_str(&format!(
            "  {:<width$} | {} {}\n",
            label,
            "#".repeat(len),
            value,
            width = label_width
        ));
    }
    out
}

fn value_card(value: &str) -> String {
    let inner = value.chars().count() + 4;
    let border = format!("+{}+", "-".repeat(inner));
    format!("{}\n|  {}  |\n{}\n", border, value, border)
}

fn table(headers: &[&str], rows: &[&[&str]]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[&str]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        format!("| {} |\n", padded.join(" | "))
    };
    let rule = format!(
        "+{}+\n",
        widths.iter().map(|w| "-".repeat(w + 2)).collect::<Vec<_>>().join("+")
    );

    let mut out = rule.clone();
    out.push_str(&line(headers));
    out.push_str(&rule);
    for row in rows {
        out.push_str(&line(*row));
    }
    out.push_str(&rule);
    out
}
