//! mangadl core: pure state machine for the chapter table and download surface.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, BatchState, ChapterRowSnapshot, RowIndex};
pub use update::update;
pub use view_model::{AppViewModel, ChapterRowView, RowProgress, DOWNLOADED_MARKER};
