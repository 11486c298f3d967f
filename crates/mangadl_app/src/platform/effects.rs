use std::sync::mpsc;
use std::thread;

use engine_logging::{engine_error, engine_info, engine_warn};
use mangadl_core::{Effect, Msg};
use mangadl_engine::{
    EngineEvent, EngineHandle, SelectionBatch, REPORT_ERROR_TRAILER, REPORT_PREAMBLE,
};

use super::config::ChapterList;

/// Executes core effects against the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    chapters: ChapterList,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, chapters: ChapterList, msg_tx: mpsc::Sender<Msg>) -> Self {
        let runner = Self { engine, chapters };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartBatch { rows } => {
                    let batch = self.selection_for(&rows);
                    engine_info!("StartBatch rows={:?} chapters={}", rows, batch.len());
                    self.engine.enqueue(batch);
                }
                Effect::CancelBatch => {
                    engine_info!("CancelBatch");
                    self.engine.cancel();
                }
            }
        }
    }

    fn selection_for(&self, rows: &[usize]) -> SelectionBatch {
        let mut batch = SelectionBatch::new(self.chapters.manga_title.clone());
        for row in rows {
            match self.chapters.chapters.get(*row) {
                Some(chapter) => batch.insert(*row, chapter.clone()),
                None => engine_warn!("Row {} has no chapter; skipped", row),
            }
        }
        batch
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || {
            while let Some(event) = engine.recv() {
                let msg = match event {
                    EngineEvent::ChapterStarted { .. } | EngineEvent::ChapterFailed { .. } => {
                        continue;
                    }
                    EngineEvent::PageSaved { row, page, total } => {
                        Msg::PageProgress { row, page, total }
                    }
                    EngineEvent::ChapterDownloaded { row, .. } => Msg::RowDownloaded { row },
                    EngineEvent::BatchFinished(report) => Msg::BatchFinished {
                        report: report.summary,
                    },
                };
                if msg_tx.send(msg).is_err() {
                    return;
                }
            }
            // Event channel closed: the worker is gone and no report will follow.
            engine_error!("Download worker stopped unexpectedly");
            let _ = msg_tx.send(engine_stopped_msg());
        });
    }
}

/// Ends any running batch with the error report when the worker disappears.
fn engine_stopped_msg() -> Msg {
    Msg::BatchFinished {
        report: format!("{REPORT_PREAMBLE}\n{REPORT_ERROR_TRAILER}"),
    }
}
