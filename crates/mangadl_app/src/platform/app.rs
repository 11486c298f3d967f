use std::sync::{mpsc, Arc};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use mangadl_core::{update, AppState, BatchState, ChapterRowSnapshot, Effect, Msg};
use mangadl_engine::{AtHomeClient, ChapterSaver, EngineHandle, FetcherFactory};

use super::config::{load_chapter_list, read_config, ChapterList};
use super::effects::EffectRunner;
use super::{logging, render};
use crate::Args;

const RENDER_INTERVAL: Duration = Duration::from_millis(250);

pub fn run_app(args: Args) -> anyhow::Result<()> {
    let loaded = read_config(&args.config)?;
    let config = loaded.clone().unwrap_or_default();
    logging::initialize(config.log);
    if loaded.is_some() {
        engine_info!("Loaded config from {:?}", args.config);
    } else {
        engine_warn!("No config at {:?}; using defaults", args.config);
    }
    let chapters = load_chapter_list(&args.chapters)?;

    let factory: Arc<dyn FetcherFactory> =
        Arc::new(AtHomeClient::new(config.fetch_settings())?);
    let lookup = ChapterSaver::new(factory.clone(), config.download.clone());
    let engine = EngineHandle::new(ChapterSaver::new(factory, config.download.clone()))?;

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let rows = row_snapshots(&lookup, &chapters);
    let runner = EffectRunner::new(engine, chapters, msg_tx.clone());

    let cancel_tx = msg_tx;
    if let Err(err) = ctrlc::set_handler(move || {
        let _ = cancel_tx.send(Msg::CancelClicked);
    }) {
        engine_warn!("Cannot install Ctrl-C handler: {}", err);
    }

    let mut surface = Surface::new(runner);
    surface.dispatch(Msg::ChaptersLoaded(rows));
    match args.rows {
        Some(rows) => {
            for row in rows {
                surface.dispatch(Msg::RowToggled { row });
            }
        }
        None => surface.dispatch(Msg::SelectAllToggled),
    }
    println!("{}", render::render_table(&surface.state.view()));

    surface.dispatch(Msg::DownloadClicked);
    if surface.state.batch() == BatchState::Idle {
        println!("Nothing selected to download.");
        return Ok(());
    }

    // Single consumer: every mutation of the visual state happens on this thread.
    loop {
        let msg = match msg_rx.recv_timeout(RENDER_INTERVAL) {
            Ok(msg) => msg,
            Err(mpsc::RecvTimeoutError::Timeout) => Msg::Tick,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        let finished = matches!(msg, Msg::BatchFinished { .. });
        surface.dispatch(msg);
        if surface.state.consume_dirty() {
            if let Some(status) = render::render_status(&surface.state.view()) {
                println!("{status}");
            }
        }
        if finished {
            break;
        }
    }

    let view = surface.state.view();
    println!("{}", render::render_table(&view));
    if let Some(report) = view.report {
        println!("{}", render::render_report(&report));
        surface.dispatch(Msg::ReportDismissed);
    }
    Ok(())
}

fn row_snapshots(lookup: &ChapterSaver, chapters: &ChapterList) -> Vec<ChapterRowSnapshot> {
    chapters
        .chapters
        .iter()
        .enumerate()
        .map(|(row, chapter)| {
            let existing = lookup.existing_artifact(&chapters.manga_title, chapter);
            if let Some(path) = &existing {
                engine_info!("Row {} already on disk at {:?}", row, path);
            }
            ChapterRowSnapshot {
                row,
                label: format!("Chapter {} - {}", chapter.chapter, chapter.title),
                downloaded: existing.is_some(),
            }
        })
        .collect()
}

/// Owns the visual state; effects produced by updates go straight to the engine.
struct Surface {
    state: AppState,
    runner: EffectRunner,
}

impl Surface {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects): (AppState, Vec<Effect>) = update(state, msg);
        self.state = state;
        if !effects.is_empty() {
            self.runner.enqueue(effects);
        }
    }
}
