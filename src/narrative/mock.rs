use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use anyhow::Result;
use async_trait::async_trait;

use super::client::{CompletionClient, CompletionRequest};

/// A scripted completion client for tests. Replies with a fixed text and can
/// be told to fail on a given call.
pub struct ScriptedCompletion {
    reply: String,
    fail_on: Option<usize>,
    calls: AtomicUsize,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fail_on: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Fail the call with this zero-based index.
    pub fn failing_on(mut self, call: usize) -> Self {
        self.fail_on = Some(call);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let i = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        if self.fail_on == Some(i) {
            anyhow::bail!("ScriptedCompletion: scripted failure on call {}", i + 1);
        }
        Ok(self.reply.clone())
    }
}
