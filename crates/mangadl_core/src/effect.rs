use crate::RowIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Download the given rows, already drained from the selection.
    StartBatch { rows: Vec<RowIndex> },
    CancelBatch,
}
