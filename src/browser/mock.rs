use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{BrowserError, Element, ElementRef, Locator, Session};

pub type Log = Arc<Mutex<Vec<String>>>;

#[derive(Clone)]
pub struct FakeElement {
    id: String,
    html: String,
    visible: bool,
    stale: bool,
    children: HashMap<Locator, Vec<FakeElement>>,
    log: Log,
}

impl FakeElement {
    pub fn new(id: &str, html: &str) -> Self {
        Self {
            id: id.to_string(),
            html: html.to_string(),
            visible: true,
            stale: false,
            children: HashMap::new(),
            log: Log::default(),
        }
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }

    pub fn child(mut self, locator: Locator, elements: Vec<FakeElement>) -> Self {
        self.children.entry(locator).or_default().extend(elements);
        self
    }

    fn attach(&mut self, log: &Log) {
        self.log = log.clone();
        for children in self.children.values_mut() {
            for child in children {
                child.attach(log);
            }
        }
    }

    fn check(&self) -> Result<(), BrowserError> {
        if self.stale {
            return Err(BrowserError::Stale(self.id.clone()));
        }
        Ok(())
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

fn boxed(elements: Vec<FakeElement>) -> Vec<ElementRef> {
    elements
        .into_iter()
        .map(|e| Box::new(e) as ElementRef)
        .collect()
}

#[async_trait]
impl Element for FakeElement {
    async fn html(&self) -> Result<String, BrowserError> {
        self.check()?;
        Ok(self.html.clone())
    }

    async fn text(&self) -> Result<String, BrowserError> {
        self.check()?;
        Ok(self.html.clone())
    }

    async fn is_visible(&self) -> Result<bool, BrowserError> {
        self.check()?;
        Ok(self.visible)
    }

    async fn click(&self) -> Result<(), BrowserError> {
        self.check()?;
        self.record(format!("click {}", self.id));
        Ok(())
    }

    async fn fill(&self, value: &str) -> Result<(), BrowserError> {
        self.check()?;
        self.record(format!("fill {}={}", self.id, value));
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, BrowserError> {
        self.check()?;
        Ok(boxed(self.children.get(locator).cloned().unwrap_or_default()))
    }
}

#[derive(Default)]
pub struct FakeSession {
    elements: HashMap<Locator, Vec<FakeElement>>,
    script: Mutex<VecDeque<Result<Vec<FakeElement>, BrowserError>>>,
    queries: AtomicUsize,
    log: Log,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: Locator, mut elements: Vec<FakeElement>) -> Self {
        for element in elements.iter_mut() {
            element.attach(&self.log);
        }
        self.elements.entry(locator).or_default().extend(elements);
        self
    }

    /// Queues a one-off answer for the next document-level query, whatever
    /// its locator.
    pub fn script(&self, response: Result<Vec<FakeElement>, BrowserError>) {
        let response = response.map(|mut elements| {
            for element in elements.iter_mut() {
                element.attach(&self.log);
            }
            elements
        });
        self.script.lock().unwrap().push_back(response);
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn visit(&self, url: &str) -> Result<(), BrowserError> {
        self.log.lock().unwrap().push(format!("visit {url}"));
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, BrowserError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let scripted = self.script.lock().unwrap().pop_front();
        if let Some(response) = scripted {
            return response.map(boxed);
        }
        Ok(boxed(self.elements.get(locator).cloned().unwrap_or_default()))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.log.lock().unwrap().push("close".to_string());
        Ok(())
    }
}
