use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::models::NewsArticle;

const NEWS_ENDPOINT: &str = "https://newsapi.org/v2/everything";
const PAGE_SIZE: &str = "5";

// NewsAPI response shape, reduced to the fields we keep
#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    source: Option<NewsApiSource>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch_latest(
        &self,
        api_key: &str,
        query: &str,
    ) -> Result<Vec<NewsArticle>, reqwest::Error>;
}

pub struct ReqwestNewsProvider {
    client: Client,
}

impl ReqwestNewsProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl NewsProvider for ReqwestNewsProvider {
    async fn fetch_latest(
        &self,
        api_key: &str,
        query: &str,
    ) -> Result<Vec<NewsArticle>, reqwest::Error> {
        let response = self
            .client
            .get(NEWS_ENDPOINT)
            .query(&[
                ("q", query),
                ("language", "de"),
                ("sortBy", "publishedAt"),
                ("pageSize", PAGE_SIZE),
                ("apiKey", api_key),
            ])
            .send()
            .await?
            .error_for_status()?;

        let parsed: NewsApiResponse = response.json().await?;
        Ok(parsed
            .articles
            .into_iter()
            .map(|article| NewsArticle {
                title: article.title.unwrap_or_default(),
                summary: article
                    .description
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| "Keine Zusammenfassung verfügbar.".to_string()),
                source: article
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_else(|| "NewsAPI".to_string()),
            })
            .collect())
    }
}

// Simple mock provider for tests and handler mocks
pub struct MockNewsProvider {
    pub articles: Vec<NewsArticle>,
}

impl MockNewsProvider {
    #[allow(dead_code)]
    pub fn new(articles: Vec<NewsArticle>) -> Self {
        Self { articles }
    }
}

#[async_trait]
impl NewsProvider for MockNewsProvider {
    async fn fetch_latest(
        &self,
        _api_key: &str,
        _query: &str,
    ) -> Result<Vec<NewsArticle>, reqwest::Error> {
        Ok(self.articles.clone())
    }
}
