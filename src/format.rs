//! Terminal formatting helpers for money, dates and table footers.

use chrono::NaiveDateTime;

/// Whole-unit money with thousands separators, e.g. `320,000 UZS`
pub fn format_money(value: f64, currency: &str) -> String {
    let grouped = format_grouped_int(value.round() as i64);
    if currency.is_empty() {
        grouped
    } else {
        format!("{grouped} {currency}")
    }
}

pub fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Append summary rows under a rounded `tabled` table.
///
/// The first `label_columns` columns merge into a right-aligned label cell and
/// the remaining columns merge into one value cell. Tables that are too narrow
/// for the summary get it as plain lines instead.
pub fn add_summary_footer(table: &str, label_columns: usize, rows: &[(&str, String)]) -> String {
    let lines: Vec<&str> = table.lines().collect();
    let fallback = || {
        let mut out = table.to_string();
        for (label, value) in rows {
            out.push_str(&format!("\n{label}: {value}"));
        }
        out
    };

    if lines.len() < 4 || rows.is_empty() || label_columns == 0 {
        return fallback();
    }

    // Parse the top border to discover column widths
    let Some(inner) = lines[0].strip_prefix('╭').and_then(|s| s.strip_suffix('╮')) else {
        return fallback();
    };
    let widths: Vec<usize> = inner.split('┬').map(|p| p.chars().count()).collect();
    if widths.len() <= label_columns {
        return fallback();
    }

    let (left, right) = widths.split_at(label_columns);
    let left_width = left.iter().sum::<usize>() + left.len() - 1;
    let right_width = right.iter().sum::<usize>() + right.len() - 1;

    let fits = rows.iter().all(|(label, value)| {
        label.chars().count() + 2 <= left_width && value.chars().count() + 2 <= right_width
    });
    if !fits {
        return fallback();
    }

    let join = |ws: &[usize]| ws.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("┴");

    // Strip the original bottom border and start building
    let mut out = lines[..lines.len() - 1].join("\n");
    out.push('\n');
    out.push_str(&format!("├{}┼{}┤\n", join(left), join(right)));

    for (idx, (label, value)) in rows.iter().enumerate() {
        out.push_str(&format!(
            "│ {:>left$} │ {:>right$} │\n",
            label,
            value,
            left = left_width - 2,
            right = right_width - 2
        ));
        if idx < rows.len() - 1 {
            out.push_str(&format!(
                "├{}┼{}┤\n",
                "─".repeat(left_width),
                "─".repeat(right_width)
            ));
        }
    }

    out.push_str(&format!(
        "╰{}┴{}╯",
        "─".repeat(left_width),
        "─".repeat(right_width)
    ));

    out
}
