//! Browser-driven web search
//!
//! Drives a headless Chrome session against the DuckDuckGo HTML endpoint and
//! summarizes the first result only. The session launches lazily on the first
//! search and is reused for the rest of the process.

use super::{truncate_chars, RetrievalError, SEARCH_SUMMARY_CAP};
use crate::runtime::traits::SearchAgent;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use chromiumoxide::Page;
use futures::StreamExt;
use reqwest::Url;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// One result entry on the DuckDuckGo HTML endpoint
const RESULT_SELECTOR: &str = "div.result__body";

const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;
const DEFAULT_VIEWPORT_HEIGHT: u32 = 720;

/// Live Chrome session
struct SearchSession {
    #[allow(dead_code)] // Browser must stay alive
    browser: Browser,
    #[allow(dead_code)] // Task must stay alive
    handler_task: JoinHandle<()>,
    page: Page,
}

/// Web search collaborator backed by headless Chrome
pub struct BrowserSearchAgent {
    session: OnceCell<SearchSession>,
}

impl BrowserSearchAgent {
    pub fn new() -> Self {
        Self {
            session: OnceCell::new(),
        }
    }

    /// Directory where the fetcher caches downloaded Chrome binaries
    fn fetcher_cache_dir() -> PathBuf {
        let base = std::env::var("HOME").map_or_else(|_| PathBuf::from("/tmp"), PathBuf::from);
        base.join(".cache/switchboard/chromium")
    }

    fn browser_config(executable: Option<&Path>) -> Result<BrowserConfig, RetrievalError> {
        let user_data_dir = format!("/tmp/switchboard-chrome-{}", uuid::Uuid::new_v4());

        let mut builder = BrowserConfig::builder()
            .new_headless_mode()
            .no_sandbox()
            .arg("--disable-gpu")
            .user_data_dir(&user_data_dir)
            .viewport(chromiumoxide::handler::viewport::Viewport {
                width: DEFAULT_VIEWPORT_WIDTH,
                height: DEFAULT_VIEWPORT_HEIGHT,
                device_scale_factor: Some(1.0),
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            });

        if let Some(path) = executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(RetrievalError::Browser)
    }

    async fn launch_with(executable: Option<&Path>) -> Result<SearchSession, RetrievalError> {
        let config = Self::browser_config(executable)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RetrievalError::Browser(format!("failed to launch browser: {e}")))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::warn!("CDP handler error: {e}");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RetrievalError::Browser(format!("failed to open page: {e}")))?;

        Ok(SearchSession {
            browser,
            handler_task,
            page,
        })
    }

    /// Launch a session.
    ///
    /// Tries system Chrome first (zero download). On failure, downloads a
    /// compatible Chromium via `BrowserFetcher` and caches it for future runs.
    async fn launch() -> Result<SearchSession, RetrievalError> {
        match Self::launch_with(None).await {
            Ok(session) => return Ok(session),
            Err(e) => {
                tracing::info!("System Chrome not available ({e}), trying fetcher...");
            }
        }

        let cache_dir = Self::fetcher_cache_dir();
        tracing::info!("Downloading Chrome to {cache_dir:?} (first run only)...");

        std::fs::create_dir_all(&cache_dir).map_err(|e| {
            RetrievalError::Browser(format!(
                "failed to create cache dir {}: {e}",
                cache_dir.display()
            ))
        })?;

        let fetcher_opts = BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .map_err(|e| RetrievalError::Browser(format!("fetcher config error: {e}")))?;

        let fetcher = BrowserFetcher::new(fetcher_opts);
        let info = fetcher
            .fetch()
            .await
            .map_err(|e| RetrievalError::Browser(format!("Chrome download failed: {e:#}")))?;

        Self::launch_with(Some(&info.executable_path)).await
    }

    async fn session(&self) -> Result<&SearchSession, RetrievalError> {
        self.session.get_or_try_init(Self::launch).await
    }
}

impl Default for BrowserSearchAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchAgent for BrowserSearchAgent {
    async fn search_and_summarize(&self, query: &str) -> Result<String, RetrievalError> {
        let session = self.session().await?;
        let url = search_url(query)?;

        session
            .page
            .goto(url.as_str())
            .await
            .map_err(|e| RetrievalError::Browser(format!("navigation failed: {e}")))?;
        session
            .page
            .wait_for_navigation()
            .await
            .map_err(|e| RetrievalError::Browser(format!("page load failed: {e}")))?;

        let first_result = session
            .page
            .find_element(RESULT_SELECTOR)
            .await
            .map_err(|e| RetrievalError::Browser(format!("no results found: {e}")))?;

        let text = first_result
            .inner_text()
            .await
            .map_err(|e| RetrievalError::Browser(format!("failed to read result: {e}")))?
            .unwrap_or_default();

        Ok(collapse_whitespace(&text))
    }
}

fn search_url(query: &str) -> Result<Url, RetrievalError> {
    let mut url = Url::parse(SEARCH_ENDPOINT)
        .map_err(|e| RetrievalError::Malformed(format!("bad search endpoint: {e}")))?;
    url.query_pairs_mut().append_pair("q", query);
    Ok(url)
}

/// Collapse runs of whitespace so a multi-line result snippet reads as one
/// short summary.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Produce context text for a browser search route. Never fails.
pub(crate) async fn summarize(agent: &dyn SearchAgent, query: &str) -> String {
    match agent.search_and_summarize(query).await {
        Ok(text) => truncate_chars(text, SEARCH_SUMMARY_CAP),
        Err(e) => format!("Error searching the web: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::MockSearchAgent;

    #[test]
    fn search_url_encodes_query() {
        let url = search_url("rust state machines?").unwrap();
        assert_eq!(
            url.as_str(),
            "https://html.duckduckgo.com/html/?q=rust+state+machines%3F"
        );
    }

    #[test]
    fn collapse_whitespace_flattens_snippets() {
        assert_eq!(
            collapse_whitespace("Penguins\n  are   flightless\tbirds. "),
            "Penguins are flightless birds."
        );
    }

    #[tokio::test]
    async fn summary_is_capped() {
        let agent = MockSearchAgent::returning("word ".repeat(400));
        let text = summarize(&agent, "anything").await;
        assert_eq!(text.chars().count(), SEARCH_SUMMARY_CAP);
    }

    #[tokio::test]
    async fn search_error_degrades_to_text() {
        let agent = MockSearchAgent::failing("browser crashed");
        let text = summarize(&agent, "anything").await;
        assert!(text.starts_with("Error searching the web:"));
        assert!(text.contains("browser crashed"));
    }
}
