// src/core/service_client.rs
//! Client for the external agent service that runs the language-model
//! steps. The contract is deliberately thin: send a prompt payload,
//! receive text. No agent orchestration happens on this side.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const RESEARCH_ENDPOINT: &str = "/api/v1/research";
const COMPOSE_ENDPOINT: &str = "/api/v1/compose";

pub struct AgentClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct ResearchRequest<'a> {
    topic: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Serialize)]
struct ComposeRequest<'a> {
    topic: &'a str,
    research: &'a str,
    /// Numbered-list sample posts whose writing style the generated post
    /// should imitate.
    style_samples: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Deserialize)]
struct AgentTextResponse {
    text: String,
}

impl AgentClient {
    /// Create new agent client with configuration.
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Gather factual background on a topic.
    pub async fn research_topic(&self, topic: &str, context: Option<&str>) -> Result<String> {
        self.send_prompt(RESEARCH_ENDPOINT, &ResearchRequest { topic, context })
            .await
            .context("Failed to research topic")
    }

    /// Write a post about the topic in the style of the sample posts.
    pub async fn compose_post(
        &self,
        topic: &str,
        research: &str,
        style_samples: &str,
        context: Option<&str>,
    ) -> Result<String> {
        self.send_prompt(
            COMPOSE_ENDPOINT,
            &ComposeRequest {
                topic,
                research,
                style_samples,
                context,
            },
        )
        .await
        .context("Failed to compose post")
    }

    async fn send_prompt<T: Serialize>(&self, endpoint: &str, payload: &T) -> Result<String> {
        let url = format!("{}{}", self.base_url, endpoint);
        info!("Calling agent service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to reach agent service at {url}"))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read agent service response")?;

        if !status.is_success() {
            anyhow::bail!("Agent service returned {status}: {response_text}");
        }

        match serde_json::from_str::<AgentTextResponse>(&response_text) {
            Ok(parsed) => Ok(parsed.text),
            Err(_) => {
                // Some deployments answer with bare text instead of the
                // JSON envelope; pass it through as-is.
                warn!("Agent service response was not JSON, using raw body");
                Ok(response_text)
            }
        }
    }
}
