//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 健康检查 (含数据库探测) | 无 |

use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 状态 (ok | error)
    status: &'static str,
    version: &'static str,
    database: CheckResult,
    /// 当前广播组数量
    groups: usize,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    status: &'static str,
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

async fn health(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<HealthResponse>>> {
    let start = Instant::now();
    let database = match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => CheckResult {
            status: "ok",
            latency_ms: Some(start.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            CheckResult {
                status: "error",
                latency_ms: None,
                message: Some(e.to_string()),
            }
        }
    };

    let status = if database.status == "ok" { "ok" } else { "error" };
    Ok(ok(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        groups: state.channels.group_count(),
    }))
}
