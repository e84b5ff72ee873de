#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use wine_radar::{
    data::{
        community::NotesSource,
        fetch::PageSource,
        search::{AggregatorOptions, SearchBackend, SearchHit, WebReviewAggregator},
        FailureKind, Fetched,
    },
    pipeline::Pipeline,
    scoring::{
        claude::{LlmError, LlmProvider},
        rubric::{Rubric, RubricVersion},
        ScoringClient,
    },
};

pub fn hit(title: &str, link: &str, snippet: &str) -> SearchHit {
    SearchHit {
        title: title.into(),
        link: link.into(),
        snippet: snippet.into(),
    }
}

/// Search fake keyed by a fragment of the query text.
#[derive(Default)]
pub struct FakeSearch {
    by_fragment: Vec<(String, Fetched<Vec<SearchHit>>)>,
}

impl FakeSearch {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn on(mut self, fragment: &str, hits: Vec<SearchHit>) -> Self {
        self.by_fragment
            .push((fragment.to_string(), Fetched::Content(hits)));
        self
    }

    pub fn failing(mut self, fragment: &str) -> Self {
        self.by_fragment.push((
            fragment.to_string(),
            Fetched::unavailable(FailureKind::Status(500), "search down"),
        ));
        self
    }
}

#[async_trait]
impl SearchBackend for FakeSearch {
    async fn search(&self, query: &str, _num: usize) -> Fetched<Vec<SearchHit>> {
        self.by_fragment
            .iter()
            .find(|(fragment, _)| query.contains(fragment.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or(Fetched::Content(Vec::new()))
    }
}

/// Page fake; unknown links fail with a connection error.
#[derive(Default)]
pub struct FakePages {
    pages: HashMap<String, String>,
    pub requested: Mutex<Vec<String>>,
}

impl FakePages {
    pub fn with(mut self, link: &str, text: &str) -> Self {
        self.pages.insert(link.to_string(), text.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for FakePages {
    async fn fetch_text(&self, url: &str) -> Fetched<String> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(text) => Fetched::Content(text.clone()),
            None => Fetched::unavailable(FailureKind::Connect, "connection refused"),
        }
    }
}

pub struct FakeNotes(pub Fetched<String>);

impl FakeNotes {
    pub fn none() -> Self {
        FakeNotes(Fetched::unavailable(FailureKind::NoMatch, "no match"))
    }

    pub fn text(notes: &str) -> Self {
        FakeNotes(Fetched::Content(notes.to_string()))
    }
}

#[async_trait]
impl NotesSource for FakeNotes {
    async fn notes(&self, _wine: &str) -> Fetched<String> {
        self.0.clone()
    }
}

/// LLM fake returning a canned reply and counting calls.
pub struct FakeLlm {
    reply: String,
    pub calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
}

impl FakeLlm {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

pub fn options() -> AggregatorOptions {
    AggregatorOptions {
        results_per_query: 5,
        fetch_concurrency: 3,
        denylist: vec!["vivino.com".into(), "cellartracker.com".into()],
    }
}

pub fn aggregator(search: FakeSearch, pages: Arc<FakePages>) -> WebReviewAggregator {
    WebReviewAggregator::new(Arc::new(search), pages, options())
}

pub fn pipeline(search: FakeSearch, notes: FakeNotes, llm: Arc<FakeLlm>) -> Pipeline {
    Pipeline::new(
        aggregator(search, Arc::new(FakePages::default())),
        Arc::new(notes),
        ScoringClient::new(llm, Rubric::new(RubricVersion::V2), 500),
    )
}

pub const RED_REPLY: &str = r#"{"wine_type":"Red","scores":{"Quality":8,"Acidity":7,"Tannins":6,"Body":5,"Fruitiness":7,"Finish":8,"Complexity":7,"Funky":6,"Brett":8,"Alcohol":5,"Sweetness":1}}"#;
