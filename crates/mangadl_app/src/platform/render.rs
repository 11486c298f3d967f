use mangadl_core::{AppViewModel, BatchState, ChapterRowView};

pub fn render_table(view: &AppViewModel) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>4}  {:<3} {:<1}  {}\n",
        "Row", "Sel", "D", "Chapter"
    ));
    for row in &view.rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out
}

fn render_row(row: &ChapterRowView) -> String {
    let selected = if row.selected { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{:>4}  {} {:<1}  {}",
        row.row,
        selected,
        row.status_marker(),
        row.label
    );
    if let Some(progress) = row.progress {
        if progress.total > 0 {
            line.push_str(&format!("  ({}/{})", progress.page, progress.total));
        }
    }
    line
}

/// One-line progress summary while a batch runs.
pub fn render_status(view: &AppViewModel) -> Option<String> {
    let label = match view.batch {
        BatchState::Idle => return None,
        BatchState::Running => "Downloading",
        BatchState::Cancelling => "Cancelling",
    };
    let active = view
        .rows
        .iter()
        .filter_map(|row| row.progress.map(|p| (row, p)))
        .find(|(_, p)| p.total > 0 && p.page < p.total);
    let done = view.rows.iter().filter(|row| row.downloaded).count();
    Some(match active {
        Some((row, p)) => format!(
            "{label}: {} page {}/{} | {done} downloaded",
            row.label, p.page, p.total
        ),
        None => format!("{label}... | {done} downloaded"),
    })
}

pub fn render_report(report: &str) -> String {
    let width = report.lines().map(str::len).max().unwrap_or(0);
    let border = format!("+{}+", "-".repeat(width + 2));
    let mut out = format!("{border}\n");
    for line in report.lines() {
        out.push_str(&format!("| {line:<width$} |\n"));
    }
    out.push_str(&border);
    out
}
