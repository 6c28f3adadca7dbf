use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::documents::{AdCandidate, LocalizedText, ServiceDocument, UserProfile};
use crate::embedding::{EmbeddingProvider, MockEmbedder};
use crate::gateway::{
    CONCIERGE_STAGE_HEADER, CONCIERGE_STATUS_HEADER, HandlerState, create_router_with_state,
};
use crate::generative::{GenerativeProvider, MockGenerator};
use crate::index::IndexManager;
use crate::personalize::RankingWeights;
use crate::search::StageSettings;
use crate::service::Concierge;
use crate::store::{DocumentStore, FailingStore, MemoryStore, SeedData};

fn seed() -> SeedData {
    SeedData {
        services: vec![ServiceDocument {
            id: "reg".to_string(),
            name: LocalizedText::plain("Registrar General"),
            description: LocalizedText::plain("Birth, marriage and death certificates"),
            ..Default::default()
        }],
        users: vec![UserProfile {
            id: "u7".to_string(),
            age: Some(22),
            education: Some("degree".to_string()),
            ..Default::default()
        }],
        ads: vec![AdCandidate {
            id: "grad".to_string(),
            title: "Graduate programme".to_string(),
            target_segments: vec!["young_adult".to_string()],
            active: true,
            ..Default::default()
        }],
        ..Default::default()
    }
}

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    _dir: TempDir,
}

fn build_app(
    store: Arc<dyn DocumentStore>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    generator: Option<Arc<dyn GenerativeProvider>>,
) -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let concierge = Concierge::new(
        store,
        Arc::new(IndexManager::new(dir.path())),
        embedder,
        generator,
        StageSettings::default(),
        RankingWeights::default(),
    );
    let router = create_router_with_state(HandlerState::new(Arc::new(concierge)));
    (router, dir)
}

fn test_app(generator: Option<MockGenerator>) -> TestApp {
    let store = Arc::new(MemoryStore::from_seed(seed()));
    let (router, dir) = build_app(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Some(Arc::new(MockEmbedder::new(8))),
        generator.map(|g| Arc::new(g) as Arc<dyn GenerativeProvider>),
    );
    TestApp {
        router,
        store,
        _dir: dir,
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> axum::response::Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    router.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let app = test_app(None);
    let response = send(&app.router, "GET", "/healthz", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONCIERGE_STATUS_HEADER], "healthy");
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_ready_reports_components() {
    let app = test_app(None);
    let response = send(&app.router, "GET", "/ready", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["components"]["store"], "ready");
    assert_eq!(json["components"]["index"], "empty");
    assert_eq!(json["components"]["embedder"], "mock:8");
    assert!(json["components"]["generative_model"].is_null());
}

#[tokio::test]
async fn test_ready_unavailable_when_store_down() {
    let (router, _dir) = build_app(Arc::new(FailingStore), None, None);
    let response = send(&router, "GET", "/ready", None).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers()[CONCIERGE_STATUS_HEADER], "pending");
}

#[tokio::test]
async fn test_search_keyword_sets_stage_header() {
    let app = test_app(None);
    let response = send(
        &app.router,
        "POST",
        "/v1/search",
        Some(serde_json::json!({"query": "marriage certificates"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONCIERGE_STAGE_HEADER], "KEYWORD");
    let json = body_json(response).await;
    assert_eq!(json["stage"], "KEYWORD");
    assert_eq!(json["payload"]["kind"], "service");
    assert_eq!(json["payload"]["service"]["id"], "reg");
}

#[tokio::test]
async fn test_search_nothing_found() {
    let app = test_app(None);
    let response = send(
        &app.router,
        "POST",
        "/v1/search",
        Some(serde_json::json!({"query": "fishing permit"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONCIERGE_STAGE_HEADER], "NONE");
    assert_eq!(
        body_json(response).await["payload"]["message"],
        "No relevant information found."
    );
}

#[tokio::test]
async fn test_search_rejects_blank_and_malformed() {
    let app = test_app(None);

    let blank = send(
        &app.router,
        "POST",
        "/v1/search",
        Some(serde_json::json!({"query": "   "})),
    )
    .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    assert_eq!(blank.headers()[CONCIERGE_STATUS_HEADER], "invalid_request");

    let malformed = send(
        &app.router,
        "POST",
        "/v1/search",
        Some(serde_json::json!({"text": "passport"})),
    )
    .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    let json = body_json(malformed).await;
    assert_eq!(json["code"], 400);
    assert!(json["error"].as_str().unwrap().contains("query"));
}

#[tokio::test]
async fn test_ask_returns_generated_answer() {
    let app = test_app(Some(MockGenerator::new("Apply at the divisional secretariat.")));
    let response = send(
        &app.router,
        "POST",
        "/v1/ask",
        Some(serde_json::json!({"query": "Where do I get a birth certificate?"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONCIERGE_STAGE_HEADER],
        "GENERATIVE_FALLBACK"
    );
    assert_eq!(
        body_json(response).await["payload"]["answer"],
        "Apply at the divisional secretariat."
    );
}

#[tokio::test]
async fn test_semantic_search_empty_index_is_unavailable() {
    let app = test_app(None);
    let response = send(
        &app.router,
        "POST",
        "/v1/search/semantic",
        Some(serde_json::json!({"query": "certificate"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers()[CONCIERGE_STATUS_HEADER], "index_empty");
}

#[tokio::test]
async fn test_rebuild_with_empty_corpus_is_rejected() {
    // The seeded service has no questions, so the corpus is empty.
    let app = test_app(None);
    let response = send(&app.router, "POST", "/admin/index/rebuild", None).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()[CONCIERGE_STATUS_HEADER], "empty_corpus");
}

#[tokio::test]
async fn test_rebuild_without_embedder_is_unavailable() {
    let (router, _dir) = build_app(Arc::new(MemoryStore::from_seed(seed())), None, None);
    let response = send(&router, "POST", "/admin/index/rebuild", None).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_segments_known_and_unknown_user() {
    let app = test_app(None);

    let known = body_json(send(&app.router, "GET", "/v1/users/u7/segments", None).await).await;
    assert_eq!(known["user_id"], "u7");
    assert_eq!(
        known["segments"],
        serde_json::json!(["young_adult", "highly_educated"])
    );

    let unknown = body_json(send(&app.router, "GET", "/v1/users/nobody/segments", None).await).await;
    assert_eq!(unknown["segments"], serde_json::json!(["unknown"]));
}

#[tokio::test]
async fn test_recommendations_with_limit() {
    let app = test_app(None);

    let json = body_json(
        send(&app.router, "GET", "/v1/users/u7/recommendations?limit=1", None).await,
    )
    .await;
    let recs = json["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["ad"]["id"], "grad");
    assert_eq!(recs[0]["score"], 10);
    assert_eq!(recs[0]["source"], "ranked");

    let json = body_json(
        send(&app.router, "GET", "/v1/users/u7/recommendations?limit=0", None).await,
    )
    .await;
    assert_eq!(json["recommendations"][0]["source"], "placeholder");
}

#[tokio::test]
async fn test_education_unknown_user_is_empty() {
    let app = test_app(None);
    let json = body_json(send(&app.router, "GET", "/v1/users/nobody/education", None).await).await;
    assert_eq!(json["recommendations"], serde_json::json!([]));
}

#[tokio::test]
async fn test_record_engagement() {
    let app = test_app(None);
    let response = send(
        &app.router,
        "POST",
        "/v1/engagements",
        Some(serde_json::json!({
            "user_id": "u7",
            "type": "question_click",
            "question_clicked": "birth_certificate"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["status"], "recorded");

    let events = app.store.engagements("u7").await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].question_clicked.as_deref(), Some("birth_certificate"));
}

#[tokio::test]
async fn test_record_engagement_requires_user() {
    let app = test_app(None);
    let response = send(
        &app.router,
        "POST",
        "/v1/engagements",
        Some(serde_json::json!({"type": "click"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
