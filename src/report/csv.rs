//! report/csv.rs — CSV serialization for the pattern matrix and the
//! aggregate recurrence statistics.

use crate::core::rqa::RqaSummary;
use crate::core::transitions::{CategoryFilter, FrequencyMatrix, CATEGORIES};

/// Header and one row per source category. With the off-task category
/// excluded, its row and column are omitted entirely.
pub fn pattern_matrix_csv(freq: &FrequencyMatrix, filter: CategoryFilter) -> String {
    let included: Vec<u8> = (0..CATEGORIES as u8).filter(|c| filter.includes(*c)).collect();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(included.len() + 1);
    let mut header = vec![String::new()];
    header.extend(included.iter().map(|c| c.to_string()));
    rows.push(header);

    for &from in &included {
        let mut row = vec![from.to_string()];
        row.extend(included.iter().map(|&to| format_value(freq.get(from, to))));
        rows.push(row);
    }

    join_rows(&rows)
}

/// Fixed column set for the aggregate results file, one row per
/// participant. Column order never varies between runs.
pub fn rqa_results_csv(rows: &[(String, RqaSummary)]) -> String {
    let mut out: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    out.push(
        [
            "participant",
            "samples",
            "recurrence_rate",
            "determinism",
            "average_diagonal_line",
            "longest_diagonal_line",
            "divergence",
            "entropy_diagonal_lines",
            "laminarity",
            "trapping_time",
            "longest_vertical_line",
            "entropy_vertical_lines",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    );

    for (participant, s) in rows {
        out.push(vec![
            participant.clone(),
            s.samples.to_string(),
            format!("{:.6}", s.recurrence_rate),
            format!("{:.6}", s.determinism),
            format!("{:.6}", s.average_diagonal_line),
            s.longest_diagonal_line.to_string(),
            format!("{:.6}", s.divergence),
            format!("{:.6}", s.entropy_diagonal_lines),
            format!("{:.6}", s.laminarity),
            format!("{:.6}", s.trapping_time),
            s.longest_vertical_line.to_string(),
            format!("{:.6}", s.entropy_vertical_lines),
        ]);
    }

    join_rows(&out)
}

fn join_rows(rows: &[Vec<String>]) -> String {
    let mut csv = String::new();
    for row in rows {
        let line = row
            .iter()
            .map(|field| escape(field))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }
    csv
}

fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Frequencies carry two decimals; write them without trailing zeros, the
/// way the analysis sheets expect them ("0.75", "0.5", "0").
fn format_value(x: f64) -> String {
    let mut s = format!("{x:.2}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
