use crate::util::{ensure_dir, now_rfc3339};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// What a section is, decided by the caller at append time. Table-of-
/// contents membership, operator-block separators, and failure styling
/// all key off this tag instead of re-parsing title text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    MustGatherLoaded,
    NodeStatus,
    OperatorDegraded,
    OperatorLogs,
    Global,
    Other,
}

impl SectionKind {
    fn in_toc(self) -> bool {
        !matches!(self, SectionKind::Other)
    }

    /// A degraded-conditions section opens a new operator's block.
    fn starts_operator_block(self) -> bool {
        matches!(self, SectionKind::OperatorDegraded)
    }

    fn is_failure(self) -> bool {
        matches!(self, SectionKind::OperatorDegraded)
    }
}

struct TocEntry {
    anchor: String,
    title: String,
}

/// Accumulates titled sections in arrival order and serializes them to
/// one self-contained HTML document.
///
/// Created once per run, threaded `&mut` through every stage, saved at
/// the end. Sections are never reordered, removed, or merged; the same
/// title may appear more than once and gets a distinct anchor each time.
pub struct Report {
    title: String,
    body: String,
    toc: Vec<TocEntry>,
    anchor_counts: HashMap<String, u32>,
    created: String,
}

impl Report {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            body: String::new(),
            toc: Vec::new(),
            anchor_counts: HashMap::new(),
            created: now_rfc3339(),
        }
    }

    /// Append one collapsible section. Never fails; empty bodies render
    /// as a bare summary line.
    pub fn append_section(&mut self, kind: SectionKind, title: &str, body: &str) {
        let anchor = self.claim_anchor(title);
        if kind.in_toc() {
            self.toc.push(TocEntry {
                anchor: anchor.clone(),
                title: title.to_string(),
            });
        }
        if kind.starts_operator_block() {
            self.body
                .push_str("<hr style='border:1px solid #ddd; margin:20px 0;'>\n");
        }
        let display_title = if kind.is_failure() {
            format!(
                "<span style='color:red;'>&#10060; {}</span>",
                escape_html(title)
            )
        } else {
            escape_html(title)
        };
        self.body.push_str(&format!(
            "<details id=\"{anchor}\"><summary><b>{display_title}</b></summary>\n"
        ));
        if !body.is_empty() {
            self.body.push_str(&format!(
                "<pre class=\"log-content\">{}</pre>\n",
                escape_html(body)
            ));
        }
        self.body.push_str("</details>\n");
    }

    /// Stream one highlighted line into the document between sections,
    /// as evidence is discovered.
    pub fn append_hit_line(&mut self, line: &str) {
        self.body.push_str(&escape_html(line));
        self.body.push_str("<br>\n");
    }

    /// Derive the anchor for `title`, suffixing `-2`, `-3`… when a
    /// previous section already claimed the normalized id.
    fn claim_anchor(&mut self, title: &str) -> String {
        let base = anchor_id(title);
        let count = self.anchor_counts.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        }
    }

    /// Render the accumulated document. Pure function of state: calling
    /// twice yields identical bytes.
    pub fn to_html(&self) -> String {
        let mut toc = String::from("<h2>Table of Contents</h2><ul>");
        for entry in &self.toc {
            toc.push_str(&format!(
                "<li><a href=\"#{}\">{}</a></li>",
                entry.anchor,
                escape_html(&entry.title)
            ));
        }
        toc.push_str("</ul>");

        format!(
            "<html><head><meta charset='UTF-8'><title>{title}</title>\
             <style>{STYLE}</style></head><body><h1>{title}</h1>\
             {toc}{SEARCH_BOX}{body}\
             <p><small>Generated {stamp}</small></p></body></html>",
            title = escape_html(&self.title),
            toc = toc,
            body = self.body,
            stamp = self.created,
        )
    }

    /// Write the document into `dir`. Overwrites any previous report at
    /// the same destination with the current content.
    pub fn save(&self, dir: &Path, filename: &str) -> Result<PathBuf> {
        ensure_dir(dir)?;
        let out = dir.join(filename);
        std::fs::write(&out, self.to_html())
            .with_context(|| format!("writing report: {}", out.display()))?;
        Ok(out)
    }
}

/// Deterministic anchor id: lowercased title with spaces, slashes, and
/// colons each replaced by a hyphen.
pub fn anchor_id(title: &str) -> String {
    title
        .to_lowercase()
        .replace([' ', '/', ':'], "-")
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = "body{font-family:system-ui,Segoe UI,Helvetica,Arial,sans-serif;\
line-height:1.35;background:#f9f9f9}h1,h2{margin:16px 0 8px}\
pre{background:#f6f8fa;padding:10px;border-radius:6px;overflow:auto;\
font-size:13px;white-space:pre-wrap}summary{cursor:pointer;font-size:16px;margin:4px 0}\
details{margin:8px 0;border:1px solid #ddd;border-radius:6px;padding:4px;background:#fff}\
a{text-decoration:none;color:#0366d6}mark{background:yellow;font-weight:bold}";

// Live search: highlight every case-insensitive match inside section
// bodies and expand only the sections that contain one; an empty term
// clears the marks and collapses everything.
const SEARCH_BOX: &str = r#"
<h2>Search</h2>
<input type="text" id="searchBox" placeholder="Search logs, KCS, AI analysis..." style="width:100%;padding:8px;font-size:14px;margin-bottom:10px;">
<script>
function highlight(term) {
  let sections = document.querySelectorAll("details");
  sections.forEach(sec => {
    let pre = sec.querySelector("pre");
    if (!pre) return;
    let text = pre.innerText;
    if (term === "") {
      pre.innerHTML = text;
      sec.open = false;
    } else {
      let regex = new RegExp("(" + term + ")", "gi");
      let hasMatch = regex.test(text);
      pre.innerHTML = text.replace(regex, '<mark>$1</mark>');
      sec.open = hasMatch;
    }
  });
}
document.getElementById("searchBox").addEventListener("input", function() {
  highlight(this.value);
});
</script>
"#;
