//! Standalone HTML page that draws a [`PlotSpec`] with Chart.js.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::plot::PlotSpec;

const TEMPLATE: &str = include_str!("../assets/report.html");

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize plot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Page heading and the optional one-line description under it.
#[derive(Clone, Debug)]
pub struct ReportMeta<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
}

pub fn render_html(spec: &PlotSpec, meta: &ReportMeta<'_>) -> Result<String, ReportError> {
    let config = script_safe(&spec.to_json()?);
    let title = escape_html(meta.title);
    let description = meta
        .description
        .map(|d| format!("<p class=\"description\">{}</p>", escape_html(d)))
        .unwrap_or_default();

    Ok(fill(
        TEMPLATE,
        &[
            ("title", title.as_str()),
            ("description", description.as_str()),
            ("config", config.as_str()),
        ],
    ))
}

pub fn write_report(path: &Path, html: &str) -> Result<(), ReportError> {
    fs::write(path, html).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = html.len(), "wrote report");
    Ok(())
}

/// Single pass over `{{name}}` placeholders; substituted text is never
/// rescanned. Unknown names are left as they are.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
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

/// JSON inside a `<script>` element must not close the element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
