//! Narrative report generation.
//!
//! A report is built in two passes against a chat-completion backend: one
//! summary per forecast timeline, then a merge of all summaries into a single
//! Markdown report with a fixed layout (today's weather, a five-day outlook,
//! what to expect).

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::{fmt::Debug, sync::Arc};
use tracing::{debug, instrument};

use crate::{Config, error::InsightError};

pub mod chat;
pub mod prompts;

pub use chat::{ChatClient, ChatMessage};

const SECTION_TEMPERATURE: f32 = 0.4;
const MERGE_TEMPERATURE: f32 = 0.6;

/// Turns a filtered forecast into a human-readable report.
#[async_trait]
pub trait ReportGenerator: Send + Sync + Debug {
    async fn generate(&self, forecast: &Value) -> Result<String, InsightError>;
}

#[derive(Debug, Clone)]
pub struct ChatReportGenerator {
    client: ChatClient,
}

impl ChatReportGenerator {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    async fn summarize_section(&self, name: &str, section: &Value) -> Result<String, InsightError> {
        let section_json = serde_json::to_string_pretty(section)?;
        let messages = [
            ChatMessage::system(prompts::SECTION_SYSTEM_PROMPT),
            ChatMessage::user(prompts::section_prompt(name, &section_json)),
        ];

        self.client.complete(&messages, SECTION_TEMPERATURE).await
    }

    async fn merge(&self, summaries: &str, today: NaiveDate) -> Result<String, InsightError> {
        let messages = [
            ChatMessage::system(prompts::FINAL_SYSTEM_PROMPT),
            ChatMessage::user(prompts::merge_prompt(summaries, today)),
        ];

        self.client.complete(&messages, MERGE_TEMPERATURE).await
    }
}

#[async_trait]
impl ReportGenerator for ChatReportGenerator {
    #[instrument(skip_all, fields(model = %self.client.model()))]
    async fn generate(&self, forecast: &Value) -> Result<String, InsightError> {
        let mut sections = Vec::new();

        if let Some(timelines) = forecast.get("timelines").and_then(Value::as_object) {
            for (name, section) in timelines {
                debug!(section = %name, "summarizing forecast section");
                let summary = self.summarize_section(name, section).await?;
                sections.push(format!("{}\n{}", prompts::section_heading(name), summary));
            }
        }

        self.merge(&sections.join("\n\n"), Utc::now().date_naive()).await
    }
}

/// Construct the report generator from config.
pub fn generator_from_config(config: &Config) -> anyhow::Result<Arc<dyn ReportGenerator>> {
    let api_key = config.llm.api_key.as_deref().ok_or_else(|| {
        anyhow::anyhow!(
            "No report-generation API key configured.\n\
             Hint: set GROK_API_KEY or run `weatherx configure`."
        )
    })?;

    let client = ChatClient::new(
        config.llm.base_url.clone(),
        api_key.to_owned(),
        config.llm.model.clone(),
    );

    Ok(Arc::new(ChatReportGenerator::new(client)))
}
