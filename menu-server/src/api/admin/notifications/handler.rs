//! Admin Notification Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use shared::models::{Notification, NotificationQuery};
use shared::response::Page;

use crate::api::admin::Affected;
use crate::core::ServerState;
use crate::db::repository::{RepoError, notification};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

/// GET /api/admin/notifications?unopened=&page=&per_page=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<ApiResponse<Page<Notification>>>> {
    let (page, per_page, offset) = state.page_window(query.page, query.per_page);
    let (items, total) = notification::list(state.pool(), query.unopened, per_page, offset).await?;
    Ok(ok(Page::new(items, page, per_page, total)))
}

/// GET /api/admin/notifications/unread-count
pub async fn unread_count(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<UnreadCount>>> {
    Ok(ok(UnreadCount {
        unread: current_unread(&state).await?,
    }))
}

/// GET /api/admin/notifications/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let found = notification::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(found))
}

/// POST /api/admin/notifications/:id/open
pub async fn open(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<UnreadCount>>> {
    if !notification::mark_opened(state.pool(), id).await? {
        return Err(not_found(id));
    }
    Ok(ok(UnreadCount {
        unread: current_unread(&state).await?,
    }))
}

/// POST /api/admin/notifications/open-all
pub async fn open_all(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Affected>>> {
    let affected = notification::mark_all_opened(state.pool()).await?;
    Ok(ok(Affected { affected }))
}

/// DELETE /api/admin/notifications/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    if !notification::delete(state.pool(), id).await? {
        return Err(not_found(id));
    }
    Ok(ok(Affected { affected: 1 }))
}

async fn current_unread(state: &ServerState) -> AppResult<i64> {
    let mut conn = state.pool().acquire().await.map_err(RepoError::from)?;
    Ok(notification::count_unopened(&mut conn).await?)
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::NotificationNotFound).with_detail("notification_id", id)
}
