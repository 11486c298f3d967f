use crate::{AppState, BatchState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ChaptersLoaded(rows) => {
            state.load_rows(rows);
            Vec::new()
        }
        Msg::RowToggled { row } => {
            state.toggle_row(row);
            Vec::new()
        }
        Msg::SelectAllToggled => {
            state.toggle_all();
            Vec::new()
        }
        Msg::DownloadClicked => {
            // One batch at a time; the selection is kept for the next click.
            if state.batch() != BatchState::Idle {
                return (state, Vec::new());
            }
            let rows = state.drain_selection();
            if rows.is_empty() {
                return (state, Vec::new());
            }
            state.start_batch(&rows);
            vec![Effect::StartBatch { rows }]
        }
        Msg::CancelClicked => {
            if state.request_cancel() {
                vec![Effect::CancelBatch]
            } else {
                Vec::new()
            }
        }
        Msg::PageProgress { row, page, total } => {
            state.apply_progress(row, page, total);
            Vec::new()
        }
        Msg::RowDownloaded { row } => {
            state.mark_downloaded(row);
            Vec::new()
        }
        Msg::BatchFinished { report } => {
            state.finish_batch(report);
            Vec::new()
        }
        Msg::ReportDismissed => {
            state.dismiss_report();
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}
