use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{info, warn};

use crate::api_client::NewsProvider;
use crate::domain::models::NewsArticle;

/// Placeholder articles served whenever live retrieval is unavailable.
pub static FALLBACK_NEWS: Lazy<Vec<NewsArticle>> = Lazy::new(|| {
    vec![
        NewsArticle {
            title: "Technologie-Aktien reagieren auf neue KI-Investitionen".to_string(),
            summary: "Mehrere Portfolio-Unternehmen profitieren von steigenden KI-Ausgaben im Unternehmenssektor.".to_string(),
            source: "Beispiel-News".to_string(),
        },
        NewsArticle {
            title: "Zinsausblick bleibt stabil".to_string(),
            summary: "Die Zentralbank signalisiert eine abwartende Haltung, was Wachstumswerte stützt.".to_string(),
            source: "Beispiel-News".to_string(),
        },
        NewsArticle {
            title: "Halbleiter-Lieferketten entspannen sich".to_string(),
            summary: "Analysten erwarten eine Normalisierung der Lagerbestände im zweiten Halbjahr.".to_string(),
            source: "Beispiel-News".to_string(),
        },
    ]
});

pub struct NewsService {
    provider: Arc<dyn NewsProvider>,
    api_key: Option<String>,
}

impl NewsService {
    /// The key is injected once at construction; `None` (or a blank value)
    /// pins the service to the fallback articles.
    pub fn new(provider: Arc<dyn NewsProvider>, api_key: Option<String>) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self { provider, api_key }
    }

    /// Live articles for the held symbols, or the static fallback. Every
    /// failure mode (empty portfolio, missing key, request error, empty
    /// result) degrades to the fallback; nothing propagates as an error.
    pub async fn portfolio_news(&self, symbols: &[String]) -> Vec<NewsArticle> {
        if symbols.is_empty() {
            return FALLBACK_NEWS.clone();
        }

        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                info!("No news API key configured, serving fallback articles");
                return FALLBACK_NEWS.clone();
            }
        };

        let query = symbols.join(" OR ");
        match self.provider.fetch_latest(api_key, &query).await {
            Ok(articles) if !articles.is_empty() => articles,
            Ok(_) => {
                info!("News query returned no articles, serving fallback");
                FALLBACK_NEWS.clone()
            }
            Err(e) => {
                warn!(error = %e, "News fetch failed, serving fallback");
                FALLBACK_NEWS.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::MockNewsProvider;

    fn live_article() -> NewsArticle {
        NewsArticle {
            title: "live".to_string(),
            summary: "live".to_string(),
            source: "live".to_string(),
        }
    }

    fn service(articles: Vec<NewsArticle>, api_key: Option<&str>) -> NewsService {
        NewsService::new(
            Arc::new(MockNewsProvider::new(articles)),
            api_key.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn empty_portfolio_gets_the_fallback_articles() {
        let service = service(vec![live_article()], Some("key"));
        let articles = service.portfolio_news(&[]).await;
        assert_eq!(articles, *FALLBACK_NEWS);
        assert_eq!(articles.len(), 3);
    }

    #[tokio::test]
    async fn missing_or_blank_key_serves_fallback() {
        let symbols = vec!["AAPL".to_string()];
        for key in [None, Some("   ")] {
            let service = service(vec![live_article()], key);
            assert_eq!(service.portfolio_news(&symbols).await, *FALLBACK_NEWS);
        }
    }

    #[tokio::test]
    async fn keyed_service_returns_provider_articles() {
        let service = service(vec![live_article()], Some("key"));
        let articles = service.portfolio_news(&["AAPL".to_string()]).await;
        assert_eq!(articles, vec![live_article()]);
    }

    #[tokio::test]
    async fn empty_provider_result_serves_fallback() {
        let service = service(Vec::new(), Some("key"));
        let articles = service.portfolio_news(&["AAPL".to_string()]).await;
        assert_eq!(articles, *FALLBACK_NEWS);
    }
}
