use mangadl_core::{update, AppState, ChapterRowSnapshot, Msg};
use pretty_assertions::assert_eq;

fn loaded(rows: &[(usize, &str, bool)]) -> AppState {
    let snapshots = rows
        .iter()
        .map(|(row, label, downloaded)| ChapterRowSnapshot {
            row: *row,
            label: label.to_string(),
            downloaded: *downloaded,
        })
        .collect();
    let (mut state, _) = update(AppState::new(), Msg::ChaptersLoaded(snapshots));
    assert!(state.consume_dirty());
    state
}

fn selected_rows(state: &AppState) -> Vec<usize> {
    state
        .view()
        .rows
        .iter()
        .filter(|r| r.selected)
        .map(|r| r.row)
        .collect()
}

#[test]
fn loaded_rows_keep_previous_download_markers() {
    let state = loaded(&[(0, "Chapter 1", true), (1, "Chapter 2", false)]);
    let view = state.view();
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].status_marker(), "Y");
    assert_eq!(view.rows[1].status_marker(), "");
    assert_eq!(view.selected_count, 0);
}

#[test]
fn toggling_a_row_twice_unselects_it() {
    let state = loaded(&[(0, "a", false), (1, "b", false)]);
    let (mut state, effects) = update(state, Msg::RowToggled { row: 1 });
    assert!(effects.is_empty());
    assert_eq!(selected_rows(&state), vec![1]);
    assert!(state.consume_dirty());

    let (state, _) = update(state, Msg::RowToggled { row: 1 });
    assert!(selected_rows(&state).is_empty());
}

#[test]
fn toggling_unknown_row_is_ignored() {
    let state = loaded(&[(0, "a", false)]);
    let (mut state, _) = update(state, Msg::RowToggled { row: 9 });
    assert!(selected_rows(&state).is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn select_all_skips_downloaded_and_toggles_back() {
    let state = loaded(&[(0, "a", true), (1, "b", false), (2, "c", false)]);
    let (state, _) = update(state, Msg::SelectAllToggled);
    assert_eq!(selected_rows(&state), vec![1, 2]);

    let (state, _) = update(state, Msg::SelectAllToggled);
    assert!(selected_rows(&state).is_empty());
}

#[test]
fn reloading_rows_clears_selection() {
    let state = loaded(&[(0, "a", false)]);
    let (state, _) = update(state, Msg::RowToggled { row: 0 });
    let (state, _) = update(
        state,
        Msg::ChaptersLoaded(vec![ChapterRowSnapshot {
            row: 0,
            label: "a".into(),
            downloaded: false,
        }]),
    );
    assert!(selected_rows(&state).is_empty());
}
