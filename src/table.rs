use std::borrow::Cow;
use std::fmt::Write as _;

pub const ELLIPSIS: &str = "...";

/// Renders an aligned plain-text table. Cells longer than `max_cell_width`
/// characters are cut and end in `...`.
pub fn render_table(
    headers: &[String],
    rows: &[Vec<String>],
    max_cell_width: Option<usize>,
) -> String {
    let prepare = |value: &String| -> String {
        let sanitized = sanitize_cell(value);
        match max_cell_width {
            Some(limit) => truncate_cell(sanitized.as_ref(), limit).into_owned(),
            None => sanitized.into_owned(),
        }
    };
    let headers = headers.iter().map(prepare).collect::<Vec<_>>();
    let rows = rows
        .iter()
        .map(|row| row.iter().map(prepare).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut widths = headers
        .iter()
        .map(|h| display_width(h).max(1))
        .collect::<Vec<_>>();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(&headers, &widths));
    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator_cells, &separator_widths));
    for row in &rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>], max_cell_width: Option<usize>) {
    print!("{}", render_table(headers, rows, max_cell_width));
}

/// Cuts `value` to at most `limit` characters. The last three become `...`
/// when `limit` leaves room for them; narrower limits cut without a marker.
pub fn truncate_cell(value: &str, limit: usize) -> Cow<'_, str> {
    if value.chars().count() <= limit {
        return Cow::Borrowed(value);
    }
    if limit <= ELLIPSIS.len() {
        return Cow::Owned(value.chars().take(limit).collect());
    }
    let keep = limit - ELLIPSIS.len();
    let mut truncated = value.chars().take(keep).collect::<String>();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let padding = width.saturating_sub(display_width(value));
            format!("{value}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI escape sequence
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
