//! Shared helpers for HTTP-level tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use menu_server::auth::JwtConfig;
use menu_server::db::DbService;
use menu_server::db::repository::{category, dining_table, item, staff};
use menu_server::routes::build_app;
use menu_server::{Config, ServerState};
use serde_json::Value;
use shared::models::{CategoryCreate, DiningTableCreate, ItemCreate};
use tempfile::TempDir;
use tower::ServiceExt;

pub const STAFF_USERNAME: &str = "manager";
pub const STAFF_PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub state: ServerState,
    pub app: Router,
    pub token: String,
    _dir: TempDir,
}

impl TestApp {
    /// In-memory database, temp work dir, one staff account and a signed token
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Same as [`TestApp::new`] with config overrides applied first
    pub async fn with_config(tweak: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(
            dir.path().to_string_lossy().to_string(),
            JwtConfig::with_secret("integration-test-secret-0123456789abcdef"),
        );
        tweak(&mut config);
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::with_db(config, db);

        let account = staff::create(state.pool(), STAFF_USERNAME, STAFF_PASSWORD)
            .await
            .unwrap();
        let token = state
            .jwt_service
            .generate_token(account.id, &account.username)
            .unwrap();

        let app = build_app(&state).with_state(state.clone());
        Self {
            state,
            app,
            token,
            _dir: dir,
        }
    }

    /// Category "Mains" with Burger (9.50, available) and Soup (4.25,
    /// unavailable), plus tables T1..T3.
    /// Returns `(burger_id, soup_id, table_ids)`.
    pub async fn seed(&self) -> (i64, i64, Vec<i64>) {
        let pool = self.state.pool();
        let mains = category::create(pool, CategoryCreate { name: "Mains".into() })
            .await
            .unwrap();
        let burger = item::create(
            pool,
            ItemCreate {
                category_id: mains.id,
                name: "Burger".into(),
                description: String::new(),
                price: 9.5,
                available: Some(true),
            },
        )
        .await
        .unwrap();
        let soup = item::create(
            pool,
            ItemCreate {
                category_id: mains.id,
                name: "Soup".into(),
                description: String::new(),
                price: 4.25,
                available: Some(false),
            },
        )
        .await
        .unwrap();

        let mut tables = Vec::new();
        for name in ["T1", "T2", "T3"] {
            let t = dining_table::create(pool, DiningTableCreate { name: name.into() })
                .await
                .unwrap();
            tables.push(t.id);
        }
        (burger.id, soup.id, tables)
    }

    /// Serve the app on an ephemeral local port
    pub async fn spawn_server(&self) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = self.app.clone();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(build_request(method, uri, body, None)).await
    }

    pub async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(build_request(method, uri, body, Some(&self.token))).await
    }

    /// Open a draft on the table, add `count` burgers and place it
    pub async fn placed_order(&self, table_id: i64, item_id: i64, count: i64) -> i64 {
        let (_, body) = self
            .call(Method::POST, &format!("/api/tables/{table_id}/orders"), None)
            .await;
        let order_id = body["data"]["id"].as_i64().unwrap();
        let (status, _) = self
            .call(
                Method::POST,
                &format!("/api/orders/{order_id}/items"),
                Some(serde_json::json!({ "item_id": item_id, "count": count })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = self
            .call(Method::POST, &format!("/api/orders/{order_id}/place"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        order_id
    }
}

pub fn build_request(method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// `code` field of an error envelope
pub fn error_code(body: &Value) -> u64 {
    body["code"].as_u64().unwrap_or_default()
}
