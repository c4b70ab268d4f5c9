use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{MovieProvider, Person, ProviderError, ProviderRecord};

/// Canned provider that counts its calls.
#[derive(Default)]
pub struct StubProvider {
    pub records: HashMap<String, ProviderRecord>,
    pub search_results: Vec<ProviderRecord>,
    pub failing: bool,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl StubProvider {
    pub fn with_record(mut self, record: ProviderRecord) -> Self {
        self.records.insert(record.id.clone(), record);
        self
    }

    pub fn with_search_results(mut self, results: Vec<ProviderRecord>) -> Self {
        self.search_results = results;
        self
    }

    pub fn failing() -> Self {
        Self { failing: true, ..Default::default() }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieProvider for StubProvider {
    async fn search(&self, _title: &str) -> Result<Vec<ProviderRecord>, ProviderError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(ProviderError::Transport("connection reset".into()));
        }
        Ok(self.search_results.clone())
    }

    async fn fetch_by_id(&self, external_id: &str) -> Result<Option<ProviderRecord>, ProviderError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(ProviderError::Transport("connection reset".into()));
        }
        Ok(self.records.get(external_id).cloned())
    }
}

/// A detailed provider record of the given kind.
pub fn detailed_record(id: &str, title: &str, kind: &str) -> ProviderRecord {
    ProviderRecord {
        id: id.to_string(),
        kind: Some(kind.to_string()),
        title: Some(title.to_string()),
        year: Some(1999),
        cover_url: Some(format!("https://img.test/{}.jpg", id)),
        rating: Some(8.7),
        genres: Some(vec!["Action".to_string(), "Sci-Fi".to_string()]),
        directors: Some(vec![
            Person { name: "Lana Wachowski".to_string() },
            Person { name: "Lilly Wachowski".to_string() },
        ]),
        synopsis: Some(vec![
            "A hacker learns the truth about reality.".to_string(),
            "Second synopsis.".to_string(),
        ]),
    }
}

/// A search-style record (no detail fields).
pub fn search_record(id: &str, title: &str, kind: &str) -> ProviderRecord {
    ProviderRecord {
        id: id.to_string(),
        kind: Some(kind.to_string()),
        title: Some(title.to_string()),
        year: Some(2003),
        cover_url: None,
        ..Default::default()
    }
}
