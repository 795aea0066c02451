use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use tokio::sync::RwLock;
use tower::ServiceExt; // for `oneshot`

use crate::api_client::MockNewsProvider;
use crate::domain::models::NewsArticle;
use crate::usecases::news_service::NewsService;
use crate::{router, AppState};

fn test_state(articles: Vec<NewsArticle>, api_key: Option<&str>) -> AppState {
    AppState {
        portfolio: Arc::new(RwLock::new(Vec::new())),
        news: Arc::new(NewsService::new(
            Arc::new(MockNewsProvider::new(articles)),
            api_key.map(str::to_string),
        )),
    }
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn sample_load_produces_full_analysis() {
    let app = router(test_state(Vec::new(), None));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/portfolio/sample")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["summary"]["position_count"], 4);
    assert_eq!(json["summary"]["top_holding"]["symbol"], "NVDA");
    assert!((json["summary"]["total_value"].as_f64().unwrap() - 7850.3).abs() < 1e-9);
    // NVDA is just under 40% of the sample, above the warning threshold.
    let sentences = json["narrative"]["sentences"].as_array().unwrap();
    assert_eq!(sentences.len(), 3);
    assert!(sentences[2].as_str().unwrap().contains("Konzentration"));

    // The loaded portfolio is visible on subsequent reads.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/portfolio")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["summary"]["position_count"], 4);
}

#[tokio::test]
async fn csv_upload_replaces_portfolio_and_uppercases_symbols() {
    let app = router(test_state(Vec::new(), None));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/portfolio")
                .body(Body::from("aapl,10,145.2\nnot a holding\nmsft,6,312.45\n"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["summary"]["position_count"], 2);
    assert!((json["summary"]["total_value"].as_f64().unwrap() - 3326.7).abs() < 1e-9);
    assert_eq!(json["positions"][0]["symbol"], "AAPL");
    assert_eq!(json["positions"][1]["symbol"], "MSFT");
    assert_eq!(json["summary"]["top_holding"]["symbol"], "MSFT");
}

#[tokio::test]
async fn unreadable_upload_is_rejected_and_state_is_kept() {
    let app = router(test_state(Vec::new(), None));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/portfolio/sample")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/portfolio")
                .body(Body::from("this is not,a\nportfolio"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("CSV"));

    // Previous portfolio survives the failed load.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/portfolio")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["summary"]["position_count"], 4);
}

#[tokio::test]
async fn empty_portfolio_reads_as_degenerate_analysis() {
    let app = router(test_state(Vec::new(), None));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/portfolio")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;

    assert_eq!(json["summary"]["total_value"], 0.0);
    assert_eq!(json["summary"]["position_count"], 0);
    assert!(json["summary"]["top_holding"].is_null());
    assert_eq!(json["forecast"]["expected"], 0.0);
    let sentences = json["narrative"]["sentences"].as_array().unwrap();
    assert_eq!(sentences.len(), 1);
    assert!(sentences[0].as_str().unwrap().contains("Lade dein Portfolio"));
}

fn mock_articles() -> Vec<NewsArticle> {
    vec![NewsArticle {
        title: "Testmeldung".to_string(),
        summary: "Eine Meldung aus dem Mock-Provider.".to_string(),
        source: "Mock".to_string(),
    }]
}

async fn load_sample(app: &axum::Router) {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/portfolio/sample")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn news_uses_the_provider_when_a_key_is_configured() {
    let app = router(test_state(mock_articles(), Some("test-key")));
    load_sample(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/news")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    let articles = json["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["source"], "Mock");
}

#[tokio::test]
async fn news_falls_back_without_a_key() {
    let app = router(test_state(mock_articles(), None));
    load_sample(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/news")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    let articles = json["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 3);
    assert_eq!(articles[0]["source"], "Beispiel-News");
}
