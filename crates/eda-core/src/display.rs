//! Plain-text rendering of tables and summaries

use crate::describe::{ColumnInfo, ColumnSummary};
use crate::table::Table;
use crate::value::{format_float, Value};
use crate::Result;

/// Render rows under headers as right-aligned, space-separated columns
pub fn render_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let n_cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(n_cols) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |cells: &[String], out: &mut String| {
        let parts: Vec<String> = cells
            .iter()
            .enumerate()
            .take(n_cols)
            .map(|(i, c)| format!("{:>width$}", c, width = widths[i]))
            .collect();
        out.push_str(parts.join("  ").trim_end());
        out.push('\n');
    };
    line(headers, &mut out);
    for row in rows {
        line(row, &mut out);
    }
    out
}

/// Render the first `max_rows` rows of a table with a positional index
pub fn render_table(table: &Table, max_rows: usize) -> Result<String> {
    let shown = table.head(max_rows);
    let names = shown.column_names();
    let cells: Vec<Vec<Value>> = names
        .iter()
        .map(|name| shown.values(name))
        .collect::<Result<_>>()?;

    let mut headers = vec![String::new()];
    headers.extend(names);
    let rows: Vec<Vec<String>> = (0..shown.n_rows())
        .map(|i| {
            let mut row = vec![i.to_string()];
            row.extend(cells.iter().map(|column| column[i].to_string()));
            row
        })
        .collect();
    let mut out = render_grid(&headers, &rows);
    if table.n_rows() > max_rows {
        out.push_str(&format!("... ({} rows x {} columns)\n", table.n_rows(), table.n_cols()));
    }
    Ok(out)
}

/// Render `info` output
pub fn render_info(info: &[ColumnInfo], n_rows: usize) -> String {
    let headers = vec![
        "#".to_string(),
        "Column".to_string(),
        "Non-Null Count".to_string(),
        "Dtype".to_string(),
    ];
    let rows: Vec<Vec<String>> = info
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                i.to_string(),
                c.name.clone(),
                format!("{} non-null", c.non_null),
                c.dtype.to_string(),
            ]
        })
        .collect();
    format!(
        "RangeIndex: {n_rows} entries\nData columns (total {} columns):\n{}",
        info.len(),
        render_grid(&headers, &rows)
    )
}

/// Render `describe` output with statistics as rows and columns across
pub fn render_describe(summaries: &[ColumnSummary]) -> String {
    let mut headers = vec![String::new()];
    headers.extend(summaries.iter().map(|s| s.name.clone()));

    let opt_f = |v: Option<f64>| v.map(format_float).unwrap_or_else(|| "NaN".to_string());
    let opt_u = |v: Option<usize>| v.map(|n| n.to_string()).unwrap_or_else(|| "NaN".to_string());
    let opt_s = |v: &Option<String>| v.clone().unwrap_or_else(|| "NaN".to_string());

    let any_categorical = summaries.iter().any(|s| s.unique.is_some());
    let any_numeric = summaries.iter().any(|s| s.mean.is_some());
    let any_dates = summaries.iter().any(|s| s.first.is_some());

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut push = |label: &str, f: &dyn Fn(&ColumnSummary) -> String| {
        let mut row = vec![label.to_string()];
        row.extend(summaries.iter().map(f));
        rows.push(row);
    };
    push("count", &|s: &ColumnSummary| s.count.to_string());
    if any_categorical {
        push("unique", &|s: &ColumnSummary| opt_u(s.unique));
        push("top", &|s: &ColumnSummary| opt_s(&s.top));
        push("freq", &|s: &ColumnSummary| opt_u(s.freq));
    }
    if any_dates {
        push("first", &|s: &ColumnSummary| opt_s(&s.first));
        push("last", &|s: &ColumnSummary| opt_s(&s.last));
    }
    if any_numeric || !any_categorical {
        push("mean", &|s: &ColumnSummary| opt_f(s.mean));
        push("std", &|s: &ColumnSummary| opt_f(s.std));
        push("min", &|s: &ColumnSummary| opt_f(s.min));
        push("25%", &|s: &ColumnSummary| opt_f(s.q25));
        push("50%", &|s: &ColumnSummary| opt_f(s.q50));
        push("75%", &|s: &ColumnSummary| opt_f(s.q75));
        push("max", &|s: &ColumnSummary| opt_f(s.max));
    }
    render_grid(&headers, &rows)
}

/// Render `(label, count)` pairs as a two-column listing
pub fn render_counts<L: AsRef<str>>(title: &str, counts: &[(L, usize)]) -> String {
    let headers = vec![String::new(), title.to_string()];
    let rows: Vec<Vec<String>> = counts
        .iter()
        .map(|(label, n)| vec![label.as_ref().to_string(), n.to_string()])
        .collect();
    render_grid(&headers, &rows)
}
