use crate::config::Ai;
use crate::report::{Report, SectionKind};
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

/// AI summarization collaborator: evidence context in, free-text
/// troubleshooting analysis out.
pub struct AiClient {
    cfg: Ai,
    client: reqwest::blocking::Client,
    token: String,
}

impl AiClient {
    pub fn new(cfg: &Ai) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_seconds.max(1)))
            .build()
            .with_context(|| "building AI HTTP client")?;
        let token = std::env::var(&cfg.api_key_env).unwrap_or_default();
        Ok(Self {
            cfg: cfg.clone(),
            client,
            token,
        })
    }

    pub fn summarize(&self, context: &str, source: &str) -> Result<String> {
        let context = context.trim();
        if context.is_empty() {
            return Ok(String::new());
        }
        let prompt = format!(
            "Context Source: {source}\n{context}\n\
             Please analyze and provide:\n\
             1) Likely root causes\n\
             2) Step-by-step troubleshooting plan (with specific omc/oc commands and must-gather files)\n\
             3) Suggested remediations\n\
             4) Reference links: Red Hat docs, KCS, upstream resources\n\n\
             Output in clear Markdown format with sections and bullet points."
        );
        let response = self
            .client
            .post(&self.cfg.endpoint)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "model": self.cfg.model,
                "prompt": prompt,
                "max_tokens": self.cfg.max_tokens,
                "temperature": self.cfg.temperature,
            }))
            .send()
            .map_err(|err| anyhow!("AI request failed: {err}"))?;
        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            bail!("AI returned {}: {}", status.as_u16(), body);
        }
        let parsed: CompletionResponse =
            serde_json::from_str(&body).with_context(|| "AI invalid response")?;
        let answer = parsed
            .choices
            .first()
            .map(|c| c.text.trim().to_string())
            .unwrap_or_default();
        if answer.is_empty() {
            bail!("AI invalid response");
        }
        Ok(answer)
    }

    /// Summarize and render the outcome into the report. Empty context
    /// appends nothing; failures become a failure-note section under
    /// the same title the answer would have used.
    pub fn summarize_and_append(&self, report: &mut Report, context: &str, source: &str) {
        if context.trim().is_empty() {
            return;
        }
        let title = format!("AI Analysis - {source}");
        match self.summarize(context, source) {
            Ok(answer) if !answer.is_empty() => {
                report.append_section(SectionKind::Other, &title, &answer);
            }
            Ok(_) => {}
            Err(err) => {
                report.append_section(
                    SectionKind::Other,
                    &title,
                    &format!("AI analysis failed: {err:#}"),
                );
            }
        }
    }
}
