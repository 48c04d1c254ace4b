use crate::config::Kcs;
use crate::report::{Report, SectionKind};
use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::info;

static SOLUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://access\.redhat\.com/solutions/\d+").expect("static solution pattern")
});

/// Knowledge-base search collaborator: keyword in, solution URLs out.
pub struct KcsClient {
    cfg: Kcs,
    client: reqwest::blocking::Client,
    username: String,
    password: String,
}

impl KcsClient {
    pub fn new(cfg: &Kcs) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_seconds.max(1)))
            .build()
            .with_context(|| "building KCS HTTP client")?;
        let username = std::env::var(&cfg.username_env).unwrap_or_default();
        let password = std::env::var(&cfg.password_env).unwrap_or_default();
        Ok(Self {
            cfg: cfg.clone(),
            client,
            username,
            password,
        })
    }

    /// Query the knowledge base for solution documents matching the
    /// search string.
    pub fn search(&self, keyword: &str) -> Result<Vec<String>> {
        if keyword.trim().is_empty() {
            bail!("no search keyword provided");
        }
        let query = format!("*{keyword}*");
        let rows = self.cfg.rows.to_string();
        let response = self
            .client
            .get(&self.cfg.base_url)
            .query(&[
                ("fq", "documentKind:(\"Solution\")"),
                ("q", query.as_str()),
                ("rows", rows.as_str()),
                ("start", "0"),
            ])
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .map_err(|err| anyhow!("HTTP request failed: {err}"))?;
        if !response.status().is_success() {
            bail!("KCS API returned status: {}", response.status());
        }
        let body = response
            .text()
            .with_context(|| "reading KCS response body")?;
        Ok(SOLUTION_RE
            .find_iter(&body)
            .map(|m| m.as_str().to_string())
            .collect())
    }

    /// Search and render the outcome into the report. Failures become a
    /// failure-note section under the same title; the run continues.
    pub fn search_and_append(&self, report: &mut Report, keyword: &str, source: &str) {
        let title = format!("KCS Solutions - {source} [Keyword: {keyword}]");
        match self.search(keyword) {
            Err(err) => {
                report.append_section(
                    SectionKind::Other,
                    &title,
                    &format!("KCS search failed: {err:#}"),
                );
            }
            Ok(links) if links.is_empty() => {
                report.append_section(SectionKind::Other, &title, "No KCS solutions found");
            }
            Ok(links) => {
                info!("{} KCS solutions for {source}", links.len());
                let mut body = String::from("Found potential KCS solutions:\n");
                for link in &links {
                    body.push_str("- ");
                    body.push_str(link);
                    body.push('\n');
                }
                report.append_section(SectionKind::Other, &title, &body);
            }
        }
    }
}
