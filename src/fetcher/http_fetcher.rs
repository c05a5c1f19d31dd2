use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::app::{NewsbriefError, Result};
use crate::config::HeaderProfile;
use crate::domain::FetchedPage;
use crate::fetcher::{FetchConfig, Fetcher};

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig, headers: &HeaderProfile) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(headers.user_agent.as_str())
            .default_headers(headers.header_map()?)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsbriefError::Fetch(format!("HTTP {}", status)));
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(transport_failure)?;
        debug!(url = %final_url, bytes = html.len(), "Static fetch complete");

        Ok(FetchedPage {
            url: final_url,
            html,
        })
    }
}

fn transport_failure(e: reqwest::Error) -> NewsbriefError {
    if e.is_timeout() {
        NewsbriefError::Fetch(format!("request timed out: {}", e))
    } else {
        NewsbriefError::Fetch(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetchConfig::default(), &HeaderProfile::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/story")
            .match_header("user-agent", Matcher::Regex("Chrome/".into()))
            .match_header("accept-language", "en-US,en;q=0.9")
            .match_header("referer", "https://www.google.com/")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><body><article><p>Hi</p></article></body></html>")
            .create_async()
            .await;

        let page = fetcher()
            .fetch(&format!("{}/story", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(page.html.contains("<article>"));
        assert!(page.url.ends_with("/story"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/paywalled")
            .with_status(403)
            .with_body("denied")
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/paywalled", server.url()))
            .await
            .unwrap_err();

        match err {
            NewsbriefError::Fetch(reason) => assert!(reason.contains("403"), "{}", reason),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_fetch_error() {
        let err = fetcher().fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(err, NewsbriefError::Fetch(_)));
    }
}
