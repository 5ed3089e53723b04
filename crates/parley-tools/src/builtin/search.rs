use crate::error::{Result, ToolError};
use crate::traits::{Tool, ToolOutput};
use async_trait::async_trait;
use parley_core::{Context, ToolDefinition, ToolParameter};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DDG_HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const MAX_RESULTS: usize = 5;

/// Keyless web search through DuckDuckGo's HTML endpoint.
pub struct WebSearchTool {
    def: ToolDefinition,
    client: Client,
    endpoint: String,
}

impl WebSearchTool {
    pub fn new() -> Self {
        let def = ToolDefinition::new(
            "web_search",
            "Search the web for current information. Returns titles, snippets and URLs of the top results.",
        )
        .with_required_param(
            "query",
            ToolParameter::string().with_description("What to search for"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent("Mozilla/5.0 (compatible; parley/0.1)")
            .build()
            .unwrap_or_default();

        Self {
            def,
            client,
            endpoint: DDG_HTML_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct SearchInput {
    query: String,
}

#[async_trait]
impl Tool for WebSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.def
    }

    async fn execute(&self, _ctx: &Context, input: Value) -> Result<ToolOutput> {
        let input: SearchInput = serde_json::from_value(input)?;
        let query = input.query.trim();
        if query.is_empty() {
            return Err(ToolError::invalid_arguments("web_search", "query must not be empty"));
        }

        let url = format!("{}?q={}", self.endpoint, urlencoding::encode(query));
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ToolError::execution(
                "web_search",
                format!("search endpoint returned {}", response.status()),
            ));
        }

        let html = response.text().await?;
        let results = extract_results(&html);

        if results.is_empty() {
            return Ok(ToolOutput::text(format!("No results found for '{}'.", query)));
        }

        Ok(ToolOutput::text(results.join("\n\n")))
    }
}

fn extract_results(html: &str) -> Vec<String> {
    html.split("class=\"result__body\"")
        .skip(1)
        .filter_map(|chunk| {
            let title = element_text(chunk, "result__a")?;
            let snippet = element_text(chunk, "result__snippet").unwrap_or_default();
            let url = element_text(chunk, "result__url").unwrap_or_default();
            Some(format!("**{}**\n{}\nURL: {}", title, snippet, url))
        })
        .take(MAX_RESULTS)
        .collect()
}

/// Text inside the first element carrying `class`, with nested tags removed.
fn element_text(chunk: &str, class: &str) -> Option<String> {
    let marker = format!("class=\"{}\"", class);
    let after = chunk.split(marker.as_str()).nth(1)?;
    let body = &after[after.find('>')? + 1..];
    let end = body.find("</a>").or_else(|| body.find("</div>")).unwrap_or(body.len());
    let text = html_decode(&strip_tags(&body[..end]));
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <div class="result results_links">
          <div class="result__body">
            <h2 class="result__title"><a rel="nofollow" class="result__a" href="/l/?uddg=x">Mars &amp; its <b>moons</b></a></h2>
            <a class="result__snippet" href="/l/?uddg=x">Phobos and <b>Deimos</b> orbit Mars.</a>
            <a class="result__url" href="/l/?uddg=x">
              en.wikipedia.org/wiki/Moons_of_Mars
            </a>
          </div>
        </div>
        <div class="result results_links">
          <div class="result__body">
            <h2 class="result__title"><a class="result__a" href="/l/?uddg=y">Second hit</a></h2>
          </div>
        </div>
    "#;

    #[test]
    fn test_definition() {
        let tool = WebSearchTool::new();
        assert_eq!(tool.name(), "web_search");
        assert!(tool.validate_input(&serde_json::json!({"query": "mars"})).is_ok());
        assert!(tool.validate_input(&serde_json::json!({})).is_err());
    }

    #[test]
    fn test_extract_results() {
        let results = extract_results(FIXTURE);
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            "**Mars & its moons**\nPhobos and Deimos orbit Mars.\nURL: en.wikipedia.org/wiki/Moons_of_Mars"
        );
        assert!(results[1].starts_with("**Second hit**"));
    }

    #[test]
    fn test_extract_nothing() {
        assert!(extract_results("<html><body>No results.</body></html>").is_empty());
    }
}
