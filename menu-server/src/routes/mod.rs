//! 路由装配
//!
//! - 顾客接口: `/api/menu`, `/api/tables`, `/api/orders`
//! - 员工接口: `/api/admin/*` (需要 JWT)
//! - WebSocket: `/ws/admin`, `/ws/orders/{id}`
//! - 静态图片: `/media/images/items/{filename}`

use axum::Router;
use axum::middleware::from_fn_with_state;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::auth::require_staff;
use crate::core::ServerState;
use crate::ws;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Public routes (no authentication)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::health::router())
        .merge(api::auth::router())
        .merge(api::menu::router())
        .merge(api::orders::router())
        .merge(api::media::router())
        .merge(ws::router())
}

/// Staff routes, mounted under `/api/admin`
pub fn build_admin_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .merge(api::admin::orders::router())
        .merge(api::admin::notifications::router())
        .merge(api::admin::categories::router())
        .merge(api::admin::items::router())
        .merge(api::admin::tables::router())
        .merge(api::auth::admin_router())
        .route_layer(from_fn_with_state(state.clone(), require_staff))
}

/// Build a fully configured application with all middleware
///
/// Used by both the HTTP server and in-process tests
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        .nest("/api/admin", build_admin_router(state))
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Propagate request ID to response (inner: sees the ID set below)
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        // Request ID - Generate unique ID for each request (outermost)
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}
