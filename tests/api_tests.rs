//! HTTP surface tests
//!
//! Drives the full route table (auth, admin API, admin page, redirects)
//! against an in-memory store.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

use shortpath::api::configure_routes;
use shortpath::api::middleware::AdminCredentials;
use shortpath::api::services::PublicOrigin;
use shortpath::config::StaticConfig;
use shortpath::services::LinkService;
use shortpath::storage::{LinkStore, MemoryStorage};

const USER: &str = "admin";
const PASS: &str = "correct horse";
const ORIGIN: &str = "https://s.example";

// =============================================================================
// Test Setup
// =============================================================================

fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, pass)))
}

fn auth() -> (&'static str, String) {
    ("Authorization", basic(USER, PASS))
}

fn new_store() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::new())
}

fn link_service(store: &Arc<MemoryStorage>) -> Arc<LinkService> {
    let store: Arc<dyn LinkStore> = store.clone();
    Arc::new(LinkService::from_config(store, &StaticConfig::default()))
}

/// Create a test app with the full route table
macro_rules! api_app {
    ($store:expr) => {
        api_app!($store, PASS, Some(ORIGIN))
    };
    ($store:expr, $password:expr, $origin:expr) => {{
        let links = link_service(&$store);
        test::init_service(App::new().configure(|cfg| {
            configure_routes(
                cfg,
                links,
                AdminCredentials::new(USER, $password),
                PublicOrigin::new($origin),
            )
        }))
        .await
    }};
}

// =============================================================================
// Routing
// =============================================================================

#[actix_rt::test]
async fn test_root_is_always_not_found() {
    let store = new_store();
    let app = api_app!(store);

    let req = TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::get().uri("/").insert_header(auth()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_unknown_short_path_is_not_found() {
    let store = new_store();
    let app = api_app!(store);

    let req = TestRequest::get().uri("/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = test::read_body(resp).await;
    assert_eq!(body, "404 Not Found");
}

#[actix_rt::test]
async fn test_shorten_then_redirect_round_trip() {
    let store = new_store();
    let app = api_app!(store);
    let long_url = "https://example.com/a/b/Report_2024.final.pdf?x=1&y=%20z";

    let req = TestRequest::post()
        .uri("/api/shorten")
        .insert_header(auth())
        .set_json(json!({ "longUrl": long_url }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["shortUrl"], "https://s.example/Report_2024final");
    assert!(body.get("message").is_none());

    let req = TestRequest::get().uri("/Report_2024final").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    let location = resp.headers().get("Location").unwrap().to_str().unwrap();
    assert_eq!(location, long_url);
}

#[actix_rt::test]
async fn test_head_redirect() {
    let store = new_store();
    store
        .insert("docs", "https://docs.rs", chrono::Utc::now())
        .await
        .unwrap();
    let app = api_app!(store);

    let req = TestRequest::default()
        .method(actix_web::http::Method::HEAD)
        .uri("/docs")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
}

// =============================================================================
// Authentication
// =============================================================================

#[actix_rt::test]
async fn test_missing_credentials_challenge() {
    let store = new_store();
    let app = api_app!(store);

    for uri in ["/translate", "/api/links"] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let challenge = resp
            .headers()
            .get("WWW-Authenticate")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(challenge.starts_with("Basic"));
        assert_eq!(test::read_body(resp).await, "Unauthorized");
    }
}

#[actix_rt::test]
async fn test_invalid_credentials_never_reach_handlers() {
    let store = new_store();
    let app = api_app!(store);

    let attempts = [
        (basic(USER, "wrong"), "Invalid credentials"),
        (basic("root", PASS), "Invalid credentials"),
        ("Bearer token".to_string(), "Invalid authentication"),
        ("Basic %%%".to_string(), "Invalid authentication"),
    ];

    for (header, expected) in attempts {
        let req = TestRequest::post()
            .uri("/api/shorten")
            .insert_header(("Authorization", header))
            .set_json(json!({ "longUrl": "https://example.com/x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get("WWW-Authenticate").is_none());
        assert_eq!(test::read_body(resp).await, expected);
    }

    // 401 之后存储保持不变
    assert!(store.is_empty());
}

#[actix_rt::test]
async fn test_unauthorized_delete_does_not_mutate() {
    let store = new_store();
    let mapping = store
        .insert("keep", "https://example.com/keep", chrono::Utc::now())
        .await
        .unwrap();
    let app = api_app!(store);

    let req = TestRequest::delete()
        .uri("/api/links")
        .insert_header(("Authorization", basic(USER, "nope")))
        .set_json(json!({ "id": mapping.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.len(), 1);
}

#[actix_rt::test]
async fn test_empty_password_disables_admin_surface() {
    let store = new_store();
    let app = api_app!(store, "", Some(ORIGIN));

    for uri in ["/translate", "/api/links"] {
        let req = TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", basic(USER, "")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_rt::test]
async fn test_translate_serves_admin_page() {
    let store = new_store();
    let app = api_app!(store);

    let req = TestRequest::get()
        .uri("/translate")
        .insert_header(auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("Content-Type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/html"));
    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("/api/shorten"));
    assert!(html.contains("/api/links"));
}

// =============================================================================
// POST /api/shorten
// =============================================================================

#[actix_rt::test]
async fn test_shorten_same_url_twice_returns_existing() {
    let store = new_store();
    let app = api_app!(store);

    let mut short_urls = Vec::new();
    for _ in 0..2 {
        let req = TestRequest::post()
            .uri("/api/shorten")
            .insert_header(auth())
            .set_json(json!({ "longUrl": "https://example.com/docs/" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        short_urls.push(body);
    }

    assert_eq!(short_urls[0]["shortUrl"], "https://s.example/docs");
    assert_eq!(short_urls[1]["shortUrl"], "https://s.example/docs");
    assert_eq!(
        short_urls[1]["message"],
        "short link already exists for this URL"
    );
    assert_eq!(store.len(), 1);
}

#[actix_rt::test]
async fn test_custom_path_collisions_get_suffixes() {
    let store = new_store();
    let app = api_app!(store);

    let mut paths = Vec::new();
    for i in 0..3 {
        let req = TestRequest::post()
            .uri("/api/shorten")
            .insert_header(auth())
            .set_json(json!({
                "longUrl": format!("https://example.com/{}", i),
                "customPath": "foo"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        paths.push(body["shortUrl"].as_str().unwrap().to_string());
    }

    assert_eq!(
        paths,
        vec![
            "https://s.example/foo",
            "https://s.example/foo-1",
            "https://s.example/foo-2"
        ]
    );
}

#[actix_rt::test]
async fn test_shorten_validation_errors() {
    let store = new_store();
    let app = api_app!(store);

    let cases = [
        (json!({}), "longUrl is required"),
        (json!({ "longUrl": "" }), "longUrl is required"),
        (json!({ "longUrl": "not a url" }), "invalid URL format"),
        (
            json!({ "longUrl": "ftp://example.com" }),
            "only HTTP/HTTPS protocols allowed",
        ),
        (
            json!({ "longUrl": "http://malware.com/x" }),
            "malicious site detected",
        ),
        (
            json!({ "longUrl": format!("http://{}", "a".repeat(2000)) }),
            "URL length exceeds limit",
        ),
        (
            json!({ "longUrl": "https://example.com/warez" }),
            "suspicious keyword detected",
        ),
        (
            json!({ "longUrl": "https://example.com/x", "customPath": "has space" }),
            "path may only contain letters, digits, underscore, hyphen",
        ),
        (
            json!({ "longUrl": "https://example.com/x", "customPath": "a".repeat(51) }),
            "path length exceeds 50 characters",
        ),
    ];

    for (payload, expected) in cases {
        let req = TestRequest::post()
            .uri("/api/shorten")
            .insert_header(auth())
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", payload);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], expected, "{}", payload);
    }

    assert!(store.is_empty());
}

#[actix_rt::test]
async fn test_shorten_malformed_json_is_bad_request() {
    let store = new_store();
    let app = api_app!(store);

    let req = TestRequest::post()
        .uri("/api/shorten")
        .insert_header(auth())
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_rt::test]
async fn test_short_url_uses_request_origin_without_public_url() {
    let store = new_store();
    let app = api_app!(store, PASS, None);

    let req = TestRequest::post()
        .uri("/api/shorten")
        .insert_header(auth())
        .insert_header(("Host", "short.test"))
        .set_json(json!({ "longUrl": "https://example.com/page" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["shortUrl"], "http://short.test/page");
}

// =============================================================================
// GET /api/links
// =============================================================================

#[actix_rt::test]
async fn test_list_links_pagination_and_search() {
    let store = new_store();
    let base = chrono::Utc::now();
    for i in 0..12 {
        store
            .insert(
                &format!("p{}", i),
                &format!("https://example.com/item/{}", i),
                base + chrono::Duration::seconds(i),
            )
            .await
            .unwrap();
    }
    store
        .insert("other", "https://rust-lang.org", base)
        .await
        .unwrap();
    let app = api_app!(store);

    let req = TestRequest::get()
        .uri("/api/links?page=2&pageSize=5")
        .insert_header(auth())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["pageSize"], 5);
    assert_eq!(body["pagination"]["totalItems"], 13);
    assert_eq!(body["pagination"]["totalPages"], 3);
    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 5);
    // 按创建时间倒序
    assert_eq!(links[0]["shortPath"], "p6");
    assert_eq!(links[0]["shortUrl"], "https://s.example/p6");
    assert_eq!(links[0]["longUrl"], "https://example.com/item/6");
    assert!(links[0]["id"].is_number());
    assert!(links[0]["createdAt"].is_string());

    let req = TestRequest::get()
        .uri("/api/links?search=rust")
        .insert_header(auth())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["totalItems"], 1);
    assert_eq!(body["pagination"]["pageSize"], 10);
    assert_eq!(body["links"][0]["shortPath"], "other");
}

#[actix_rt::test]
async fn test_list_links_clamps_bad_paging() {
    let store = new_store();
    let app = api_app!(store);

    let req = TestRequest::get()
        .uri("/api/links?page=-3&pageSize=abc")
        .insert_header(auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["pageSize"], 10);
    assert_eq!(body["pagination"]["totalPages"], 0);
    assert_eq!(body["links"], json!([]));
}

#[actix_rt::test]
async fn test_list_links_huge_page_is_empty() {
    let store = new_store();
    store
        .insert("one", "https://example.com/one", chrono::Utc::now())
        .await
        .unwrap();
    let app = api_app!(store);

    let req = TestRequest::get()
        .uri("/api/links?page=9223372036854775807&pageSize=100")
        .insert_header(auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["links"], json!([]));
    assert_eq!(body["pagination"]["totalItems"], 1);
    assert_eq!(body["pagination"]["pageSize"], 100);
}

// =============================================================================
// DELETE /api/links
// =============================================================================

#[actix_rt::test]
async fn test_delete_link_lifecycle() {
    let store = new_store();
    let mapping = store
        .insert("gone", "https://example.com/gone", chrono::Utc::now())
        .await
        .unwrap();
    let app = api_app!(store);

    let req = TestRequest::delete()
        .uri("/api/links")
        .insert_header(auth())
        .set_json(json!({ "id": mapping.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true, "message": "link deleted" }));

    let req = TestRequest::get().uri("/gone").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::delete()
        .uri("/api/links")
        .insert_header(auth())
        .set_json(json!({ "id": mapping.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "link not found");
}

#[actix_rt::test]
async fn test_delete_without_id_is_bad_request() {
    let store = new_store();
    let app = api_app!(store);

    for payload in [json!({}), json!({ "id": 0 })] {
        let req = TestRequest::delete()
            .uri("/api/links")
            .insert_header(auth())
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "missing link id");
    }
}

#[actix_rt::test]
async fn test_unknown_api_path_is_plain_not_found() {
    let store = new_store();
    let app = api_app!(store);

    let req = TestRequest::get()
        .uri("/api/unknown")
        .insert_header(auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(test::read_body(resp).await, "Not Found");

    let req = TestRequest::put()
        .uri("/api/links")
        .insert_header(auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
