#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use mangadl_engine::{
    ChapterDescriptor, EngineEvent, EventSink, FailureKind, FetchError, FetcherFactory,
    PageFetcher, Quality,
};

pub fn chapter(id: &str, number: &str, title: &str, pages: usize) -> ChapterDescriptor {
    ChapterDescriptor {
        id: id.to_string(),
        title: title.to_string(),
        chapter: number.to_string(),
        translated_language: "en".to_string(),
        data: (1..=pages).map(|n| format!("x{n}-full.png")).collect(),
        data_saver: (1..=pages).map(|n| format!("x{n}-small.jpg")).collect(),
    }
}

/// Serves `page bytes = page ref`, failing on configured refs or chapter ids.
#[derive(Default, Clone)]
pub struct FakeFactory {
    pub failing_pages: Arc<Mutex<HashSet<String>>>,
    pub unreachable_chapters: Arc<Mutex<HashSet<String>>>,
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl FakeFactory {
    pub fn fail_page(&self, page_ref: &str) {
        self.failing_pages.lock().unwrap().insert(page_ref.to_string());
    }

    pub fn fail_chapter(&self, chapter_id: &str) {
        self.unreachable_chapters
            .lock()
            .unwrap()
            .insert(chapter_id.to_string());
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

struct FakeFetcher {
    chapter_id: String,
    factory: FakeFactory,
}

#[async_trait::async_trait]
impl FetcherFactory for FakeFactory {
    async fn page_fetcher(
        &self,
        chapter: &ChapterDescriptor,
        _quality: Quality,
        _force_port_443: bool,
    ) -> Result<Box<dyn PageFetcher>, FetchError> {
        if self.unreachable_chapters.lock().unwrap().contains(&chapter.id) {
            return Err(FetchError::new(FailureKind::HttpStatus(503), "no server"));
        }
        Ok(Box::new(FakeFetcher {
            chapter_id: chapter.id.clone(),
            factory: self.clone(),
        }))
    }
}

#[async_trait::async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_page(&self, page_ref: &str) -> Result<Bytes, FetchError> {
        self.factory
            .requested
            .lock()
            .unwrap()
            .push(format!("{}/{}", self.chapter_id, page_ref));
        if self.factory.failing_pages.lock().unwrap().contains(page_ref) {
            return Err(FetchError::new(FailureKind::Network, "connection reset"));
        }
        Ok(Bytes::from(format!("bytes of {page_ref}")))
    }
}

#[derive(Default)]
pub struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn sorted_file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
