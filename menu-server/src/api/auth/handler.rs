//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use shared::models::{LoginRequest, LoginResponse, StaffInfo};

use crate::auth::{CurrentStaff, password};
use crate::core::ServerState;
use crate::db::repository::staff;
use crate::security_log;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
///
/// Unknown username and wrong password return the same error.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let username = req.username.trim().to_string();
    let found = staff::find_by_username(state.pool(), &username).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match found {
        Some(s) => s,
        None => {
            security_log!("WARN", "login_failed", username = username.as_str(), reason = "not_found");
            return Err(AppError::invalid_credentials());
        }
    };

    let valid = password::verify_password(&account.hash_pass, &req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !valid {
        security_log!("WARN", "login_failed", username = username.as_str(), reason = "bad_password");
        return Err(AppError::invalid_credentials());
    }

    if !account.is_active {
        security_log!("WARN", "login_disabled", username = username.as_str());
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let token = state
        .jwt_service
        .generate_token(account.id, &account.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(staff_id = account.id, username = %account.username, "Staff logged in");

    Ok(ok(LoginResponse {
        token,
        staff: StaffInfo::from(&account),
    }))
}

/// GET /api/admin/me
pub async fn me(staff: CurrentStaff) -> AppResult<Json<ApiResponse<StaffInfo>>> {
    Ok(ok(StaffInfo {
        id: staff.id,
        username: staff.username,
    }))
}
