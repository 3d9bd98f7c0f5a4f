//! HTTP backend — POSTs JSON to `/research` and `/plan`.
//!
//! No timeout and no retry: a hung call keeps the planner in its current phase.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::TripBackend;
use crate::config::ApiConfig;
use crate::error::TripError;

#[derive(Debug, Serialize)]
struct ResearchRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResearchResponse {
    output: String,
}

#[derive(Debug, Serialize)]
struct PlanRequest<'a> {
    research_content: &'a str,
    user_preferences: &'a str,
}

#[derive(Debug, Deserialize)]
struct PlanResponse {
    plan: String,
}

/// Client for the research/plan API.
pub struct HttpBackend {
    config: ApiConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("wander-ai/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl TripBackend for HttpBackend {
    async fn research(&self, input: &str) -> Result<String, TripError> {
        let url = self.config.research_url();
        debug!(%url, "POST research");

        let resp = self
            .client
            .post(&url)
            .json(&ResearchRequest { input })
            .send()
            .await
            .map_err(|e| TripError::research(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TripError::research(format!(
                "research returned {status}: {}",
                truncate(&body, 200)
            )));
        }

        let data: ResearchResponse = resp
            .json()
            .await
            .map_err(|e| TripError::research(format!("unreadable research body: {e}")))?;

        Ok(data.output)
    }

    async fn plan(
        &self,
        research_content: &str,
        user_preferences: &str,
    ) -> Result<String, TripError> {
        let url = self.config.plan_url();
        debug!(%url, research_len = research_content.len(), "POST plan");

        let resp = self
            .client
            .post(&url)
            .json(&PlanRequest {
                research_content,
                user_preferences,
            })
            .send()
            .await
            .map_err(|e| TripError::planning(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TripError::planning(format!(
                "plan returned {status}: {}",
                truncate(&body, 200)
            )));
        }

        // Reading the body can still fail mid-stream; that is a transport problem.
        let body = resp
            .text()
            .await
            .map_err(|e| TripError::planning(e.to_string()))?;

        let data: PlanResponse = serde_json::from_str(&body)
            .map_err(|e| TripError::plan_parse(format!("unreadable plan envelope: {e}")))?;

        Ok(data.plan)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}
