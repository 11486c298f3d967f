use mangadl_core::{update, AppState, BatchState, ChapterRowSnapshot, Effect, Msg, RowProgress};
use pretty_assertions::assert_eq;

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn table(count: usize) -> AppState {
    let rows = (0..count)
        .map(|row| ChapterRowSnapshot {
            row,
            label: format!("Chapter {}", row + 1),
            downloaded: false,
        })
        .collect();
    update(AppState::new(), Msg::ChaptersLoaded(rows)).0
}

fn select(state: AppState, rows: &[usize]) -> AppState {
    rows.iter()
        .fold(state, |state, row| update(state, Msg::RowToggled { row: *row }).0)
}

#[test]
fn download_drains_selection_and_starts_one_batch() {
    init_logging();
    let state = select(table(4), &[3, 1]);

    let (mut state, effects) = update(state, Msg::DownloadClicked);

    assert_eq!(effects, vec![Effect::StartBatch { rows: vec![1, 3] }]);
    let view = state.view();
    assert_eq!(view.batch, BatchState::Running);
    assert_eq!(view.selected_count, 0);
    assert!(view.rows.iter().all(|r| !r.selected));
    assert!(state.consume_dirty());
}

#[test]
fn empty_selection_starts_nothing() {
    let (state, effects) = update(table(2), Msg::DownloadClicked);
    assert!(effects.is_empty());
    assert_eq!(state.batch(), BatchState::Idle);
}

#[test]
fn second_click_while_running_keeps_new_selection() {
    let state = select(table(3), &[0]);
    let (state, _) = update(state, Msg::DownloadClicked);
    let state = select(state, &[2]);

    let (state, effects) = update(state, Msg::DownloadClicked);

    assert!(effects.is_empty());
    assert_eq!(state.view().selected_count, 1);
}

#[test]
fn only_successful_rows_get_the_marker() {
    init_logging();
    let state = select(table(2), &[0, 1]);
    let (state, _) = update(state, Msg::DownloadClicked);
    let (state, _) = update(
        state,
        Msg::PageProgress {
            row: 0,
            page: 2,
            total: 3,
        },
    );
    assert_eq!(
        state.view().rows[0].progress,
        Some(RowProgress { page: 2, total: 3 })
    );

    // Row 0 fails silently; row 1 succeeds.
    let (state, _) = update(state, Msg::RowDownloaded { row: 1 });
    let (state, _) = update(
        state,
        Msg::BatchFinished {
            report: "Last Download Queue finished.\nWe encountered some errors! Check the log for more details.".into(),
        },
    );

    let view = state.view();
    assert_eq!(view.batch, BatchState::Idle);
    assert_eq!(view.rows[0].status_marker(), "");
    assert_eq!(view.rows[1].status_marker(), "Y");
    assert!(view.rows.iter().all(|r| r.progress.is_none()));
    assert!(view
        .report
        .as_deref()
        .unwrap()
        .ends_with("Check the log for more details."));

    let (state, _) = update(state, Msg::ReportDismissed);
    assert_eq!(state.view().report, None);
}

#[test]
fn cancel_only_applies_to_running_batch() {
    let (state, effects) = update(table(1), Msg::CancelClicked);
    assert!(effects.is_empty());

    let state = select(state, &[0]);
    let (state, _) = update(state, Msg::DownloadClicked);
    let (state, effects) = update(state, Msg::CancelClicked);
    assert_eq!(effects, vec![Effect::CancelBatch]);
    assert_eq!(state.batch(), BatchState::Cancelling);

    let (state, effects) = update(state, Msg::CancelClicked);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::BatchFinished {
            report: "done".into(),
        },
    );
    assert_eq!(state.batch(), BatchState::Idle);
}
