use super::*;
use crate::config::{Config, Environment};
use crate::instagram::{PostRetriever, Strategy, StrategyError};
use crate::posting::{PublishError, Publisher};
use crate::retry::RetryConfig;
use crate::summarize::SummaryService;
use crate::types::{Post, PostReceipt, StrategyUsed};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;


/// Strategy that always succeeds with a short caption
struct StaticStrategy;

#[async_trait]
impl Strategy for StaticStrategy {
    fn tag(&self) -> StrategyUsed {
        StrategyUsed::OpenGraph
    }

    async fn fetch(&self, account: &str) -> std::result::Result<Post, StrategyError> {
        Ok(Post::new(
            account,
            "Breaking: markets rally. Analysts expect more gains this week.",
            "https://scontent.cdninstagram.com/v/latest.jpg",
            format!("https://www.instagram.com/{account}/"),
        ))
    }
}

/// Strategy that always fails
struct BrokenStrategy;

#[async_trait]
impl Strategy for BrokenStrategy {
    fn tag(&self) -> StrategyUsed {
        StrategyUsed::GraphApi
    }

    async fn fetch(&self, _account: &str) -> std::result::Result<Post, StrategyError> {
        Err(StrategyError::NoData("No posts found in GraphQL response"))
    }
}

#[derive(Clone, Copy)]
enum Outcome {
    Published,
    NoPermission,
    ServerError,
}

/// Publisher with a scripted outcome that records what it was asked to post
struct StubPublisher {
    outcome: Outcome,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

#[async_trait]
impl Publisher for StubPublisher {
    fn is_live(&self) -> bool {
        false
    }

    async fn publish(
        &self,
        text: &str,
        image_url: Option<&str>,
    ) -> std::result::Result<PostReceipt, PublishError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), image_url.map(str::to_string)));
        match self.outcome {
            Outcome::Published => Ok(PostReceipt {
                post_id: "1445078208190291968".into(),
                post_url: "https://twitter.com/user/status/1445078208190291968".into(),
            }),
            Outcome::NoPermission => Err(PublishError::Permission),
            Outcome::ServerError => Err(PublishError::Rejected {
                status: 503,
                message: "Service Unavailable".into(),
            }),
        }
    }
}

struct TestApp {
    router: Router,
    publisher: Arc<StubPublisher>,
}

fn build_app(
    strategy: Arc<dyn Strategy>,
    outcome: Outcome,
    environment: Environment,
) -> TestApp {
    let mut config = Config::default();
    config.server.environment = environment;

    let retriever = PostRetriever::new(
        vec![strategy],
        None,
        RetryConfig::fixed(1, Duration::from_millis(500)),
        "bbcnews",
    );
    let publisher = Arc::new(StubPublisher {
        outcome,
        calls: Mutex::new(Vec::new()),
    });
    let bridge = Bridge::new(
        config,
        Arc::new(retriever),
        Arc::new(SummaryService::new(None)),
        publisher.clone(),
    );

    TestApp {
        router: create_router(bridge),
        publisher,
    }
}

fn test_app(outcome: Outcome) -> TestApp {
    build_app(Arc::new(StaticStrategy), outcome, Environment::Test)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_api_server_spawns_and_stops() {
    let mut config = Config::default();
    config.server.bind_address = "127.0.0.1:0".parse().unwrap();
    let bridge = Bridge::from_config(config).unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(start_api_server(bridge, async move {
        let _ = rx.await;
    }));

    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after the shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_enabled() {
    let app = test_app(Outcome::Published);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present"
    );
}
