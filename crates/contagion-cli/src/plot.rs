//! ASCII plots of per-step time series

use std::fmt::Write;

/// Widest bar, in characters
const BAR_WIDTH: usize = 50;

/// Horizontal bar chart, one row per step numbered from `first_step`
pub fn bar_chart(title: &str, step_label: &str, values: &[usize], first_step: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);

    let max = values.iter().copied().max().unwrap_or(0);
    let label_width = (first_step + values.len().saturating_sub(1)).to_string().len();

    for (offset, &value) in values.iter().enumerate() {
        let len = if max == 0 { 0 } else { value * BAR_WIDTH / max };
        let _ = writeln!(
            out,
            "{} {:>width$} | {} {}",
            step_label,
            first_step + offset,
            "#".repeat(len),
            value,
            width = label_width
        );
    }

    out
}
