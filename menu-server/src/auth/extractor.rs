//! CurrentStaff Extractor

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::CurrentStaff;
use crate::core::ServerState;
use crate::utils::AppError;

/// Handlers behind [`require_staff`](crate::auth::require_staff) can take
/// `CurrentStaff` directly; the middleware has already validated the token.
impl FromRequestParts<ServerState> for CurrentStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentStaff>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}
