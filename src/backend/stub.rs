//! Scripted in-memory backend for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::backend::TripBackend;
use crate::error::TripError;

pub(crate) const KYOTO_PLAN: &str =
    r#"{"days":[{"day":1,"activities":["Visit Fushimi Inari"]}],"estimated_cost":"$500"}"#;

/// Pops one canned result per call and records inputs.
#[derive(Default)]
pub(crate) struct StubBackend {
    pub research_results: Mutex<VecDeque<Result<String, TripError>>>,
    pub plan_results: Mutex<VecDeque<Result<String, TripError>>>,
    pub research_calls: AtomicUsize,
    pub plan_calls: AtomicUsize,
    pub plan_inputs: Mutex<Vec<(String, String)>>,
    pub research_inputs: Mutex<Vec<String>>,
    /// When set, research waits for `release` after signalling `entered`.
    pub gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl StubBackend {
    pub fn ok(research: &str, plan: &str) -> Self {
        let stub = Self::default();
        stub.push_research(Ok(research.to_string()));
        stub.push_plan(Ok(plan.to_string()));
        stub
    }

    pub fn push_research(&self, r: Result<String, TripError>) {
        self.research_results.lock().unwrap().push_back(r);
    }

    pub fn push_plan(&self, r: Result<String, TripError>) {
        self.plan_results.lock().unwrap().push_back(r);
    }
}

#[async_trait]
impl TripBackend for StubBackend {
    async fn research(&self, input: &str) -> Result<String, TripError> {
        self.research_calls.fetch_add(1, Ordering::SeqCst);
        self.research_inputs.lock().unwrap().push(input.to_string());
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        self.research_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TripError::research("no scripted result")))
    }

    async fn plan(
        &self,
        research_content: &str,
        user_preferences: &str,
    ) -> Result<String, TripError> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        self.plan_inputs
            .lock()
            .unwrap()
            .push((research_content.to_string(), user_preferences.to_string()));
        self.plan_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TripError::planning("no scripted result")))
    }
}
