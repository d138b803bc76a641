//! 认证中间件
//!
//! 为 `/api/admin/*` 提供 JWT 认证

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentStaff, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 员工认证中间件
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，
/// 成功后将 [`CurrentStaff`] 注入请求扩展。
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_staff(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 允许 CORS 预检
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let staff = authenticate(&state, token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = e.message.clone(),
            uri = format!("{:?}", req.uri())
        );
        e
    })?;

    req.extensions_mut().insert(staff);
    Ok(next.run(req).await)
}

/// 验证令牌并解析员工 (HTTP 中间件与 WebSocket 共用)
pub fn authenticate(state: &ServerState, token: &str) -> Result<CurrentStaff, AppError> {
    let claims = state.jwt_service.validate_token(token).map_err(|e| match e {
        JwtError::ExpiredToken => AppError::token_expired(),
        _ => AppError::invalid_token("Invalid token"),
    })?;

    CurrentStaff::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")))
}
