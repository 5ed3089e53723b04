use crate::error::{Result, ToolError};
use crate::traits::{Tool, ToolOutput};
use async_trait::async_trait;
use parley_core::{Context, ToolDefinition, ToolParameter};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Looks up the best-matching Wikipedia article and returns its summary.
pub struct WikipediaTool {
    def: ToolDefinition,
    client: Client,
    default_lang: String,
}

impl WikipediaTool {
    pub fn new() -> Self {
        let def = ToolDefinition::new(
            "wikipedia",
            "Look up a topic on Wikipedia and return the summary of the best matching article.",
        )
        .with_required_param(
            "query",
            ToolParameter::string().with_description("Topic or article title to look up"),
        )
        .with_param(
            "lang",
            ToolParameter::string()
                .with_description("Wikipedia language code, e.g. en, es, de")
                .with_default(Value::String("en".into())),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent("parley/0.1 (https://github.com/parley-rs/parley)")
            .build()
            .unwrap_or_default();

        Self {
            def,
            client,
            default_lang: "en".to_string(),
        }
    }

    pub fn with_default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_lang = lang.into();
        self
    }

    async fn search_title(&self, lang: &str, query: &str) -> Result<Option<String>> {
        let url = format!(
            "https://{}.wikipedia.org/w/api.php?action=query&list=search&format=json&srlimit=1&srsearch={}",
            lang,
            urlencoding::encode(query)
        );
        let response: SearchResponse = self.client.get(&url).send().await?.error_for_status()?.json().await?;
        Ok(response.query.search.into_iter().next().map(|hit| hit.title))
    }

    async fn summary(&self, lang: &str, title: &str) -> Result<PageSummary> {
        let url = format!(
            "https://{}.wikipedia.org/api/rest_v1/page/summary/{}",
            lang,
            urlencoding::encode(&title.replace(' ', "_"))
        );
        Ok(self.client.get(&url).send().await?.error_for_status()?.json().await?)
    }
}

impl Default for WikipediaTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct WikipediaInput {
    query: String,
    lang: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: SearchQuery,
}

#[derive(Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct PageSummary {
    title: String,
    #[serde(default)]
    extract: String,
    content_urls: Option<ContentUrls>,
}

#[derive(Deserialize)]
struct ContentUrls {
    desktop: PageUrl,
}

#[derive(Deserialize)]
struct PageUrl {
    page: String,
}

impl PageSummary {
    fn render(&self) -> String {
        let mut out = format!("{}\n{}", self.title, self.extract.trim());
        if let Some(urls) = &self.content_urls {
            out.push_str("\nURL: ");
            out.push_str(&urls.desktop.page);
        }
        out
    }
}

/// Language codes go into the host name, so only plain subdomain labels pass.
fn valid_lang(lang: &str) -> bool {
    (2..=12).contains(&lang.len())
        && lang.chars().all(|c| c.is_ascii_lowercase() || c == '-')
        && !lang.starts_with('-')
        && !lang.ends_with('-')
}

#[async_trait]
impl Tool for WikipediaTool {
    fn definition(&self) -> &ToolDefinition {
        &self.def
    }

    async fn execute(&self, _ctx: &Context, input: Value) -> Result<ToolOutput> {
        let input: WikipediaInput = serde_json::from_value(input)?;
        let query = input.query.trim();
        if query.is_empty() {
            return Err(ToolError::invalid_arguments("wikipedia", "query must not be empty"));
        }

        let lang = input
            .lang
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.default_lang.clone());
        if !valid_lang(&lang) {
            return Err(ToolError::invalid_arguments(
                "wikipedia",
                format!("'{}' is not a Wikipedia language code", lang),
            ));
        }

        let Some(title) = self.search_title(&lang, query).await? else {
            return Ok(ToolOutput::text(format!(
                "No Wikipedia article found for '{}'.",
                query
            )));
        };

        let summary = self.summary(&lang, &title).await?;
        Ok(ToolOutput::text(summary.render()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition() {
        let tool = WikipediaTool::new();
        assert_eq!(tool.name(), "wikipedia");
        assert!(tool.validate_input(&json!({"query": "Proxima b", "lang": "es"})).is_ok());
        assert!(tool.validate_input(&json!({"lang": "es"})).is_err());
    }

    #[test]
    fn test_valid_lang() {
        assert!(valid_lang("en"));
        assert!(valid_lang("zh-min-nan"));
        assert!(!valid_lang("e"));
        assert!(!valid_lang("evil.com/x"));
        assert!(!valid_lang("-en"));
    }

    #[test]
    fn test_parse_search_and_summary() {
        let search: SearchResponse = serde_json::from_value(json!({
            "batchcomplete": "",
            "query": {"search": [{"ns": 0, "title": "Proxima Centauri b", "pageid": 1}]}
        }))
        .unwrap();
        assert_eq!(search.query.search[0].title, "Proxima Centauri b");

        let empty: SearchResponse = serde_json::from_value(json!({"batchcomplete": ""})).unwrap();
        assert!(empty.query.search.is_empty());

        let summary: PageSummary = serde_json::from_value(json!({
            "title": "Proxima Centauri b",
            "extract": "Proxima Centauri b is an exoplanet. ",
            "content_urls": {"desktop": {"page": "https://en.wikipedia.org/wiki/Proxima_Centauri_b"}}
        }))
        .unwrap();
        assert_eq!(
            summary.render(),
            "Proxima Centauri b\nProxima Centauri b is an exoplanet.\nURL: https://en.wikipedia.org/wiki/Proxima_Centauri_b"
        );
    }

    #[tokio::test]
    async fn test_rejects_bad_lang_before_network() {
        let tool = WikipediaTool::new();
        let err = tool
            .execute(&Context::new(), json!({"query": "Mars", "lang": "x.y"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidArguments");
    }
}
