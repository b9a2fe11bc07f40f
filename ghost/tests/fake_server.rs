//! Tests against an in-process fake Ghost + Unsplash server.
//!
//! The server binds to an OS-assigned port, records every request it sees
//! and answers with Ghost-shaped envelopes and errors.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use ghostkit::{
    ADMIN_AUDIENCE, Claims, Client, ContentKind, Error, Query, Resource, TOKEN_TTL_SECS,
    decode_claims,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

const ADMIN_KEY: &str =
    "6489a1b2c3d4e5f601234567:a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90";
const CONTENT_KEY: &str = "22444f78447824223cefc48062";
const UNSPLASH_KEY: &str = "unsplash-access-key";
const TAG_TOTAL: u32 = 42;
const ORIGINAL_UPDATED_AT: &str = "2026-10-01T08:00:00.000Z";
const NEXT_UPDATED_AT: &str = "2026-10-01T08:05:00.000Z";

// ── fake server ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: Vec<(String, String)>,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Bytes,
}

impl Recorded {
    fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    fn is(&self, method: &str, path: &str) -> bool {
        self.method == method && self.path == path
    }
}

#[derive(Default)]
struct FakeGhost {
    requests: Mutex<Vec<Recorded>>,
    posts: Mutex<HashMap<String, Value>>,
}

impl FakeGhost {
    fn seeded() -> Self {
        let fake = FakeGhost::default();
        fake.posts.lock().unwrap().insert(
            "p1".to_string(),
            json!({
                "id": "p1",
                "title": "Hello",
                "html": "<p>Hello</p>",
                "updated_at": ORIGINAL_UPDATED_AT,
            }),
        );
        fake
    }
}

fn ghost_error(status: u16, message: &str, kind: &str) -> Response {
    (
        StatusCode::from_u16(status).unwrap(),
        Json(json!({"errors": [{"message": message, "type": kind}]})),
    )
        .into_response()
}

fn photo(id: &str, name: &str, username: &str, plus: bool) -> Value {
    json!({
        "id": id,
        "width": 6000,
        "height": 4000,
        "description": null,
        "alt_description": "mountain lake at dawn",
        "urls": {
            "raw": format!("https://images.unsplash.com/photo-{}?ixid=raw", id),
            "full": format!("https://images.unsplash.com/photo-{}?ixid=full", id),
            "regular": format!("https://images.unsplash.com/photo-{}?ixid=regular", id),
        },
        "links": {"html": format!("https://unsplash.com/photos/{}", id)},
        "user": {"name": name, "username": username},
        "plus": plus,
    })
}

fn valid_admin_token(req: &Recorded) -> bool {
    let Some(token) = req
        .authorization
        .as_deref()
        .and_then(|a| a.strip_prefix("Ghost "))
    else {
        return false;
    };
    let (kid, secret) = ADMIN_KEY.split_once(':').unwrap();
    let header_kid = jsonwebtoken::decode_header(token).ok().and_then(|h| h.kid);
    if header_kid.as_deref() != Some(kid) {
        return false;
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[ADMIN_AUDIENCE]);
    let key = DecodingKey::from_secret(&hex::decode(secret).unwrap());
    match jsonwebtoken::decode::<Claims>(token, &key, &validation) {
        Ok(data) => data.claims.exp - data.claims.iat == TOKEN_TTL_SECS,
        Err(_) => false,
    }
}

fn content_post(slug: &str) -> Value {
    json!({"id": "p1", "slug": slug, "title": "Hello", "html": "<p>Hello</p>"})
}

fn tags_page(req: &Recorded) -> Response {
    let limit: u32 = req.param("limit").and_then(|l| l.parse().ok()).unwrap_or(15);
    let page: u32 = req.param("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let pages = TAG_TOTAL.div_ceil(limit);
    let start = (page - 1) * limit;
    let end = (start + limit).min(TAG_TOTAL);

    let tags: Vec<Value> = (start..end)
        .map(|i| json!({"id": format!("t{}", i), "slug": format!("tag-{}", i)}))
        .collect();

    let next = (page < pages).then_some(page + 1);
    let prev = (page > 1).then(|| page - 1);

    Json(json!({
        "tags": tags,
        "meta": {"pagination": {
            "page": page,
            "limit": limit,
            "pages": pages,
            "total": TAG_TOTAL,
            "next": next,
            "prev": prev,
        }}
    }))
    .into_response()
}

fn update_post(fake: &FakeGhost, id: &str, req: &Recorded) -> Response {
    let body = req.json();
    let Some(fields) = body["posts"][0].as_object() else {
        return ghost_error(400, "No posts in body.", "BadRequestError");
    };

    let mut posts = fake.posts.lock().unwrap();
    let Some(stored) = posts.get_mut(id) else {
        return ghost_error(404, "Post not found.", "NotFoundError");
    };

    match fields.get("updated_at").and_then(Value::as_str) {
        None => {
            return ghost_error(
                422,
                "Validation error, cannot edit post.",
                "ValidationError",
            );
        }
        Some(ts) if stored["updated_at"] != ts => {
            return ghost_error(
                422,
                "Saving failed! Someone else is editing this post.",
                "UpdateCollisionError",
            );
        }
        Some(_) => {}
    }

    for (k, v) in fields {
        stored[k] = v.clone();
    }
    stored["updated_at"] = json!(NEXT_UPDATED_AT);

    Json(json!({"posts": [stored.clone()]})).into_response()
}

fn upload(req: &Recorded) -> Response {
    let multipart = req
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));
    if !multipart {
        return ghost_error(415, "Expected multipart upload.", "UnsupportedMediaTypeError");
    }

    let raw = String::from_utf8_lossy(&req.body).to_string();
    let filename = raw
        .split("filename=\"")
        .nth(1)
        .and_then(|s| s.split('"').next())
        .unwrap_or("unknown")
        .to_string();
    let reference = raw
        .split("name=\"ref\"\r\n\r\n")
        .nth(1)
        .and_then(|s| s.split("\r\n").next())
        .map(str::to_string);

    Json(json!({"images": [{
        "url": format!("https://blog.example.com/content/images/2026/10/{}", filename),
        "ref": reference,
    }]}))
    .into_response()
}

fn unsplash(rest: &str, req: &Recorded) -> Response {
    let expected = format!("Client-ID {}", UNSPLASH_KEY);
    if req.authorization.as_deref() != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"errors": ["OAuth error: The access token is invalid"]})),
        )
            .into_response();
    }

    match rest.trim_end_matches('/') {
        "search/photos" => Json(json!({
            "total": 2,
            "total_pages": 1,
            "results": [
                photo("abc123", "Jane Doe", "janedoe", false),
                photo("plus999", "Studio Co", "studioco", true),
            ],
        }))
        .into_response(),
        "photos/abc123" => Json(photo("abc123", "Jane Doe", "janedoe", false)).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"errors": ["Couldn't find Photo"]})),
        )
            .into_response(),
    }
}

fn route(fake: &FakeGhost, req: &Recorded) -> Response {
    if let Some(rest) = req.path.strip_prefix("/unsplash/") {
        return unsplash(rest, req);
    }

    let Some(api_path) = req.path.strip_prefix("/ghost/api/") else {
        return ghost_error(404, "Unknown route.", "NotFoundError");
    };
    if !api_path.ends_with('/') {
        let location = format!("{}/", req.path);
        return (StatusCode::MOVED_PERMANENTLY, [("location", location)]).into_response();
    }
    let segments: Vec<&str> = api_path.trim_end_matches('/').split('/').collect();

    if segments[0] == "admin" && !valid_admin_token(req) {
        return ghost_error(401, "Invalid token", "UnauthorizedError");
    }
    if segments[0] == "content" && req.param("key") != Some(CONTENT_KEY) {
        return ghost_error(401, "Unknown Content API Key", "UnauthorizedError");
    }

    match (req.method.as_str(), segments.as_slice()) {
        ("GET", ["content", "posts"]) => Json(json!({
            "posts": [{"id": "p1", "title": "Hello"}],
            "meta": {"pagination": {"page": 1, "limit": 15, "pages": 1, "total": 1, "next": null, "prev": null}}
        }))
        .into_response(),
        ("GET", ["content", "posts", "slug", "hello"]) => {
            Json(json!({"posts": [content_post("hello")]})).into_response()
        }
        ("GET", ["content", "posts", "p1"]) => {
            Json(json!({"posts": [content_post("hello")]})).into_response()
        }
        ("GET", ["admin", "tags"]) => tags_page(req),
        ("GET", ["admin", "limited"]) => ghost_error(429, "Too many requests.", "TooManyRequestsError"),
        ("GET", ["admin", "posts", id]) => match fake.posts.lock().unwrap().get(*id) {
            Some(post) => Json(json!({"posts": [post]})).into_response(),
            None => ghost_error(404, "Post not found.", "NotFoundError"),
        },
        ("POST", ["admin", "posts"]) => {
            let mut post = req.json()["posts"][0].clone();
            post["id"] = json!("new1");
            post["updated_at"] = json!(ORIGINAL_UPDATED_AT);
            (StatusCode::CREATED, Json(json!({"posts": [post]}))).into_response()
        }
        ("PUT", ["admin", "posts", id]) => update_post(fake, id, req),
        ("DELETE", ["admin", "posts", id]) => {
            if fake.posts.lock().unwrap().remove(*id).is_some() {
                StatusCode::NO_CONTENT.into_response()
            } else {
                ghost_error(404, "Post not found.", "NotFoundError")
            }
        }
        ("POST", ["admin", "images", "upload"]) => upload(req),
        _ => ghost_error(404, "Resource not found.", "NotFoundError"),
    }
}

async fn handle(
    State(fake): State<Arc<FakeGhost>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let req = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default(),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body,
    };
    fake.requests.lock().unwrap().push(req.clone());
    route(&fake, &req)
}

struct TestServer {
    base: String,
    fake: Arc<FakeGhost>,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    fn requests(&self) -> Vec<Recorded> {
        self.fake.requests.lock().unwrap().clone()
    }

    fn client(&self) -> Client {
        Client::builder(&self.base)
            .content_key(CONTENT_KEY)
            .admin_key(ADMIN_KEY)
            .unsplash_access_key(UNSPLASH_KEY)
            .unsplash_base_url(format!("{}/unsplash", self.base))
            .build()
            .expect("client builds")
    }
}

async fn start_test_server() -> TestServer {
    let fake = Arc::new(FakeGhost::seeded());
    let app = Router::new().fallback(handle).with_state(fake.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to port 0");
    let addr = listener.local_addr().expect("get local addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    TestServer {
        base: format!("http://127.0.0.1:{}", addr.port()),
        fake,
        _handle: handle,
    }
}

fn fields(v: Value) -> Resource {
    v.as_object().cloned().expect("object")
}

// ── authentication ───────────────────────────────────────────────────────────

#[tokio::test]
async fn content_requests_carry_key_and_no_token() {
    let server = start_test_server().await;
    let client = server.client();

    let body = client
        .get("content/posts/", &Query::new().limit(15))
        .await
        .unwrap();
    assert_eq!(body["posts"][0]["id"], "p1");

    let reqs = server.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].param("key"), Some(CONTENT_KEY));
    assert_eq!(reqs[0].param("limit"), Some("15"));
    assert!(reqs[0].authorization.is_none());
}

#[tokio::test]
async fn admin_requests_carry_fresh_short_lived_tokens() {
    let server = start_test_server().await;
    let client = server.client();

    client.get("admin/posts/p1/", &Query::new()).await.unwrap();
    client.get("admin/posts/p1/", &Query::new()).await.unwrap();

    let reqs = server.requests();
    assert_eq!(reqs.len(), 2);

    let mut tokens = Vec::new();
    for req in &reqs {
        assert!(req.param("key").is_none());
        let token = req
            .authorization
            .as_deref()
            .and_then(|a| a.strip_prefix("Ghost "))
            .expect("admin token");
        let claims = decode_claims(token).unwrap();
        assert!(claims.exp > claims.iat);
        assert!(claims.exp - claims.iat <= 300);
        tokens.push(token.to_string());
    }
    assert_ne!(tokens[0], tokens[1]);
}

#[tokio::test]
async fn content_service_unwraps_envelopes_with_key_only() {
    let server = start_test_server().await;
    let client = server.client();
    let content = client.content();

    let page = content
        .browse(ContentKind::Posts, &Query::new().limit(15))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0]["id"], "p1");
    let pagination = page.pagination.expect("pagination");
    assert_eq!(pagination.total, 1);
    assert!(pagination.is_last());

    let post = content
        .read_by_slug(ContentKind::Posts, "hello", &Query::new().formats("html"))
        .await
        .unwrap();
    assert_eq!(post["slug"], "hello");
    assert_eq!(post["html"], "<p>Hello</p>");

    let post = content
        .read(ContentKind::Posts, "p1", &Query::new())
        .await
        .unwrap();
    assert_eq!(post["id"], "p1");

    let err = content
        .read_by_slug(ContentKind::Posts, "missing", &Query::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let reqs = server.requests();
    assert_eq!(reqs.len(), 4);
    assert!(reqs[0].is("GET", "/ghost/api/content/posts/"));
    assert_eq!(reqs[0].param("limit"), Some("15"));
    assert!(reqs[1].is("GET", "/ghost/api/content/posts/slug/hello/"));
    assert_eq!(reqs[1].param("formats"), Some("html"));
    assert!(reqs[2].is("GET", "/ghost/api/content/posts/p1/"));
    for req in &reqs {
        assert_eq!(req.param("key"), Some(CONTENT_KEY));
        assert!(req.authorization.is_none());
    }
}

#[tokio::test]
async fn missing_content_key_fails_without_network() {
    let server = start_test_server().await;
    let client = Client::builder(&server.base)
        .admin_key(ADMIN_KEY)
        .build()
        .unwrap();

    let err = client.get("content/posts/", &Query::new()).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(server.requests().is_empty());
}

// ── updates and the concurrency token ────────────────────────────────────────

#[tokio::test]
async fn update_post_reads_updated_at_once_then_echoes_it() {
    let server = start_test_server().await;
    let client = server.client();

    let updated = client
        .update_post("p1", fields(json!({"title": "Renamed"})), None)
        .await
        .unwrap();
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["updated_at"], NEXT_UPDATED_AT);

    let reqs = server.requests();
    assert_eq!(reqs.len(), 2);
    assert!(reqs[0].is("GET", "/ghost/api/admin/posts/p1/"));
    assert!(reqs[1].is("PUT", "/ghost/api/admin/posts/p1/"));
    assert_eq!(reqs[1].json()["posts"][0]["updated_at"], ORIGINAL_UPDATED_AT);
    assert!(reqs[1].param("source").is_none());
}

#[tokio::test]
async fn update_post_with_token_skips_read() {
    let server = start_test_server().await;
    let client = server.client();

    client
        .update_post(
            "p1",
            fields(json!({"html": "<p>New body</p>"})),
            Some(ORIGINAL_UPDATED_AT),
        )
        .await
        .unwrap();

    let reqs = server.requests();
    assert_eq!(reqs.len(), 1);
    assert!(reqs[0].is("PUT", "/ghost/api/admin/posts/p1/"));
    assert_eq!(reqs[0].param("source"), Some("html"));
}

#[tokio::test]
async fn stale_updated_at_is_rejected_with_status() {
    let server = start_test_server().await;
    let client = server.client();

    let err = client
        .update_post(
            "p1",
            fields(json!({"title": "x"})),
            Some("2020-01-01T00:00:00.000Z"),
        )
        .await
        .unwrap_err();

    assert!(err.is_validation());
    match err {
        Error::Api { status, message, .. } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Saving failed! Someone else is editing this post.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn raw_put_without_updated_at_is_a_validation_error() {
    let server = start_test_server().await;
    let client = server.client();

    let err = client
        .put(
            "admin/posts/p1/",
            &json!({"posts": [{"title": "x"}]}),
            &Query::new(),
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.status(), Some(422));
}

// ── html conversion flag ─────────────────────────────────────────────────────

#[tokio::test]
async fn create_post_sets_source_iff_html_present() {
    let server = start_test_server().await;
    let client = server.client();

    let created = client
        .create_post(fields(json!({"title": "With HTML", "html": "<p>Body</p>"})))
        .await
        .unwrap();
    assert_eq!(created["id"], "new1");
    assert_eq!(created["title"], "With HTML");

    client
        .create_post(fields(json!({"title": "Lexical", "lexical": "{\"root\":{}}"})))
        .await
        .unwrap();

    let reqs = server.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].param("source"), Some("html"));
    assert_eq!(reqs[0].json()["posts"][0]["html"], "<p>Body</p>");
    assert!(reqs[1].param("source").is_none());
    assert_eq!(reqs[1].json()["posts"].as_array().unwrap().len(), 1);
}

// ── errors ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn non_2xx_carries_status_and_message() {
    let server = start_test_server().await;
    let client = server.client();

    let err = client
        .get("admin/posts/missing/", &Query::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "ghost: HTTP 404: Post not found.");

    let err = client.get("admin/limited/", &Query::new()).await.unwrap_err();
    assert!(err.is_rate_limit());
    match err {
        Error::Api { message, body, .. } => {
            assert_eq!(message, "Too many requests.");
            assert!(body.contains("TooManyRequestsError"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // 429 is surfaced, never retried.
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn delete_returns_unit_then_not_found() {
    let server = start_test_server().await;
    let client = server.client();

    client.delete("admin/posts/p1/").await.unwrap();
    let err = client.delete("admin/posts/p1/").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn transport_failure_is_distinct_from_http_errors() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = Client::builder(format!("http://127.0.0.1:{}", port))
        .content_key(CONTENT_KEY)
        .build()
        .unwrap();

    let err = client.get("content/posts/", &Query::new()).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn redirected_write_is_an_error_not_a_read() {
    let server = start_test_server().await;
    let client = server.client();

    let err = client
        .post("admin/posts", &json!({"posts": [{"title": "NEW"}]}), &Query::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(301));

    let reqs = server.requests();
    assert_eq!(reqs.len(), 1);
    assert!(reqs[0].is("POST", "/ghost/api/admin/posts"));

    let err = client.get("admin/posts/p1", &Query::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(301));
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn ids_and_slugs_cannot_change_the_request_target() {
    let server = start_test_server().await;
    let client = server.client();

    let err = client.posts().read("../settings", &Query::new()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidSegment(_)));

    let err = client.posts().delete("p1?force=true").await.unwrap_err();
    assert!(matches!(err, Error::InvalidSegment(_)));

    let err = client
        .update_post("p1/../p2", fields(json!({"title": "x"})), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSegment(_)));

    let err = client
        .content()
        .read_by_slug(ContentKind::Posts, "hello#frag", &Query::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSegment(_)));

    let err = client.unsplash_photo("../me").await.unwrap_err();
    assert!(matches!(err, Error::InvalidSegment(_)));

    assert!(server.requests().is_empty());
    assert!(server.fake.posts.lock().unwrap().contains_key("p1"));
}

// ── uploads ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_returns_url_with_matching_extension() {
    let server = start_test_server().await;
    let client = server.client();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cover.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\nfake").unwrap();

    let url = client
        .upload(path.to_str().unwrap(), Some("cover.png"))
        .await
        .unwrap();
    assert!(url.ends_with(".png"));

    let reqs = server.requests();
    assert_eq!(reqs.len(), 1);
    assert!(reqs[0].is("POST", "/ghost/api/admin/images/upload/"));
    let raw = String::from_utf8_lossy(&reqs[0].body).to_lowercase();
    assert!(raw.contains("content-type: image/png"));
    assert!(raw.contains("name=\"ref\""));
}

#[tokio::test]
async fn upload_unsupported_type_fails_before_network() {
    let server = start_test_server().await;
    let client = server.client();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.pdf");
    std::fs::write(&path, b"%PDF-1.7").unwrap();

    let err = client.upload(path.to_str().unwrap(), None).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedMedia(_)));

    // Type is checked before the file is even opened.
    let err = client.upload("/nonexistent/file.tiff", None).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedMedia(_)));

    assert!(server.requests().is_empty());
}

// ── pagination ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn pages_follow_next_until_exhausted() {
    let server = start_test_server().await;
    let client = server.client();

    let mut page = 1;
    let mut seen = Vec::new();
    loop {
        let list = client
            .tags()
            .browse(&Query::new().limit(15).page(page))
            .await
            .unwrap();
        seen.extend(list.items.iter().map(|t| t["id"].as_str().unwrap().to_string()));
        let pagination = list.pagination.unwrap();
        assert_eq!(pagination.total, 42);
        match pagination.next {
            Some(next) => page = next,
            None => break,
        }
    }

    assert_eq!(server.requests().len(), 3);
    assert_eq!(seen.len(), 42);
    let mut unique = seen.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 42);
}

#[tokio::test]
async fn browse_all_collects_every_page_once() {
    let server = start_test_server().await;
    let client = server.client();

    let tags = client
        .tags()
        .browse_all(&Query::new().limit(15))
        .await
        .unwrap();
    assert_eq!(tags.len(), 42);
    assert_eq!(tags[0]["id"], "t0");
    assert_eq!(tags[41]["id"], "t41");

    let pages: Vec<_> = server
        .requests()
        .iter()
        .map(|r| r.param("page").unwrap().to_string())
        .collect();
    assert_eq!(pages, vec!["1", "2", "3"]);
}

// ── unsplash ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unsplash_search_normalizes_results() {
    let server = start_test_server().await;
    let client = server.client();

    let photos = client
        .unsplash_search("lake", Some(ghostkit::Orientation::Landscape), 2)
        .await
        .unwrap();
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0].id, "abc123");
    assert_eq!(photos[0].width, 6000);
    assert_eq!(photos[0].user_name, "Jane Doe");
    assert_eq!(photos[0].user_username, "janedoe");
    assert!(!photos[0].plus);
    assert!(photos[1].plus);

    let reqs = server.requests();
    assert_eq!(reqs[0].param("query"), Some("lake"));
    assert_eq!(reqs[0].param("orientation"), Some("landscape"));
    assert_eq!(reqs[0].param("per_page"), Some("2"));
}

#[tokio::test]
async fn unsplash_caption_looks_up_only_when_needed() {
    let server = start_test_server().await;
    let client = server.client();

    let caption = client
        .unsplash_caption(None, Some("Ann"), Some("ann"))
        .await
        .unwrap();
    assert!(caption.contains(">Ann</a>"));
    assert!(server.requests().is_empty());

    let caption = client
        .unsplash_caption(Some("abc123"), None, None)
        .await
        .unwrap();
    assert!(caption.contains("https://unsplash.com/@janedoe?"));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn set_unsplash_feature_image_updates_post() {
    let server = start_test_server().await;
    let client = server.client();

    let post = client
        .set_unsplash_feature_image("p1", "abc123")
        .await
        .unwrap();
    assert_eq!(
        post["feature_image"],
        "https://images.unsplash.com/photo-abc123?ixid=full"
    );
    assert!(
        post["feature_image_caption"]
            .as_str()
            .unwrap()
            .contains("Jane Doe")
    );
    assert_eq!(post["feature_image_alt"], "mountain lake at dawn");

    let reqs = server.requests();
    assert_eq!(reqs.len(), 3);
    assert!(reqs[0].is("GET", "/unsplash/photos/abc123"));
    assert!(reqs[1].is("GET", "/ghost/api/admin/posts/p1/"));
    assert!(reqs[2].is("PUT", "/ghost/api/admin/posts/p1/"));
}

#[tokio::test]
async fn set_unsplash_feature_image_surfaces_second_call_failure() {
    let server = start_test_server().await;
    let client = server.client();

    let err = client
        .set_unsplash_feature_image("missing", "abc123")
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    // The photo lookup already happened; nothing is rolled back.
    assert!(server.requests()[0].is("GET", "/unsplash/photos/abc123"));
}

#[tokio::test]
async fn unsplash_without_key_is_config_error() {
    let server = start_test_server().await;
    let client = Client::builder(&server.base)
        .content_key(CONTENT_KEY)
        .build()
        .unwrap();

    let err = client.unsplash_search("lake", None, 5).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(server.requests().is_empty());
}
