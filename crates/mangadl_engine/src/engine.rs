use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use engine_logging::{engine_error, engine_info, error_chain};
use tokio_util::sync::CancellationToken;

use crate::saver::ChapterSaver;
use crate::{BatchReport, ChapterOutcome, EngineEvent, SelectionBatch};

/// Receives engine events; implementations must not touch visual state directly.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Saves every chapter of `batch` one after another and emits exactly one report.
///
/// A failing chapter is logged and skipped; it never stops the batch.
pub async fn run_batch(
    saver: &ChapterSaver,
    batch: SelectionBatch,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
) -> BatchReport {
    engine_info!(
        "starting batch of {} chapters for {:?}",
        batch.len(),
        batch.manga_title
    );
    let mut outcomes = Vec::with_capacity(batch.len());

    for (row, chapter) in &batch.chapters {
        let row = *row;
        sink.emit(EngineEvent::ChapterStarted { row });
        let on_page = |page: usize, total: usize| {
            sink.emit(EngineEvent::PageSaved { row, page, total });
        };

        let result = saver
            .save_chapter(&batch.manga_title, chapter, cancel, &on_page)
            .await;
        match result {
            Ok(path) => {
                engine_info!("saved chapter {} to {:?}", chapter.chapter, path);
                sink.emit(EngineEvent::ChapterDownloaded {
                    row,
                    path: path.clone(),
                });
                outcomes.push(ChapterOutcome {
                    row,
                    result: Ok(path),
                });
            }
            Err(err) => {
                let detail = error_chain(&err);
                engine_error!(
                    "Error saving {} - Chapter: {}, {} - {}",
                    batch.manga_title,
                    chapter.chapter,
                    chapter.title,
                    detail
                );
                sink.emit(EngineEvent::ChapterFailed {
                    row,
                    message: detail.clone(),
                });
                outcomes.push(ChapterOutcome {
                    row,
                    result: Err(detail),
                });
            }
        }
    }

    let report = BatchReport::from_outcomes(&outcomes);
    engine_info!(
        "batch finished: {} attempted, errors: {}",
        report.attempted,
        report.had_errors
    );
    sink.emit(EngineEvent::BatchFinished(report.clone()));
    report
}

enum EngineCommand {
    RunBatch {
        batch: SelectionBatch,
        cancel: CancellationToken,
    },
}

/// Runs batches on a dedicated worker thread, one at a time, and hands back events.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
    current: Arc<Mutex<CancellationToken>>,
}

impl EngineHandle {
    /// Starts the worker thread. The runtime is built up front so a failure
    /// reaches the caller instead of leaving a handle with no worker.
    pub fn new(saver: ChapterSaver) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let sink = ChannelEventSink::new(event_tx);
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::RunBatch { batch, cancel } => {
                        runtime.block_on(run_batch(&saver, batch, &sink, &cancel));
                    }
                }
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            current: Arc::new(Mutex::new(CancellationToken::new())),
        })
    }

    /// Queues a batch behind any batch already running.
    pub fn enqueue(&self, batch: SelectionBatch) {
        let cancel = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            *current = cancel.clone();
        }
        let _ = self.cmd_tx.send(EngineCommand::RunBatch { batch, cancel });
    }

    /// Cancels the most recently queued batch between pages.
    pub fn cancel(&self) {
        if let Ok(current) = self.current.lock() {
            current.cancel();
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv().ok()
    }
}
