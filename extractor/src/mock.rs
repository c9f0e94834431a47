//! Scripted page source and instant wait for testing

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::PageError;
use crate::traits::{PageSource, Wait};

/// Page source that replays a fixed sequence of renderings per game.
///
/// Each `content()` call returns the next rendering; once the sequence is
/// exhausted the last one repeats, like a page that has stopped changing.
#[derive(Default)]
pub struct MockPageSource {
    pages: HashMap<String, Vec<String>>,
    missing: HashSet<String>,
    current: Option<String>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Open { game_id: String },
    Content { game_id: String },
}

impl MockPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the renderings returned for `game_id`, in poll order.
    pub fn with_page<S: Into<String>>(mut self, game_id: &str, renderings: Vec<S>) -> Self {
        self.pages.insert(
            game_id.to_string(),
            renderings.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Make `open(game_id)` fail as if the page does not exist.
    pub fn with_missing_page(mut self, game_id: &str) -> Self {
        self.missing.insert(game_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of `content()` calls made while `game_id` was open.
    pub fn content_reads(&self, game_id: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::Content { game_id: g } if g == game_id))
            .count()
    }

    /// Game ids passed to `open`, in order.
    pub fn opened(&self) -> Vec<String> {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                MockCall::Open { game_id } => Some(game_id.clone()),
                MockCall::Content { .. } => None,
            })
            .collect()
    }
}

impl PageSource for MockPageSource {
    async fn open(&mut self, game_id: &str) -> Result<(), PageError> {
        self.call_log.lock().unwrap().push(MockCall::Open {
            game_id: game_id.to_string(),
        });
        self.current = None;
        if self.missing.contains(game_id) {
            return Err(PageError::NotFound {
                game_id: game_id.to_string(),
                path: PathBuf::from(game_id),
            });
        }
        if !self.pages.contains_key(game_id) {
            return Err(PageError::NotConfigured(format!("open({game_id})")));
        }
        self.current = Some(game_id.to_string());
        Ok(())
    }

    async fn content(&self) -> Result<String, PageError> {
        let game_id = self.current.as_ref().ok_or(PageError::NotOpened)?;
        let reads = self.content_reads(game_id);
        self.call_log.lock().unwrap().push(MockCall::Content {
            game_id: game_id.clone(),
        });
        let renderings = self
            .pages
            .get(game_id)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| PageError::NotConfigured(format!("content({game_id})")))?;
        Ok(renderings[reads.min(renderings.len() - 1)].clone())
    }
}

/// Wait that returns immediately and records what it was asked to wait.
#[derive(Clone, Default)]
pub struct InstantWait {
    waited: Arc<Mutex<Vec<Duration>>>,
}

impl InstantWait {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waited(&self) -> Vec<Duration> {
        self.waited.lock().unwrap().clone()
    }
}

impl Wait for InstantWait {
    async fn wait(&self, duration: Duration) {
        self.waited.lock().unwrap().push(duration);
    }
}
