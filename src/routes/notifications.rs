use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    notify::Notice,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct NoticeList {
    #[schema(value_type = Vec<Notice>)]
    pub items: Vec<Notice>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(drain_notifications))
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Pending cart notices, oldest first. Returned notices are removed.", body = ApiResponse<NoticeList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn drain_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<NoticeList>>> {
    let items = state.carts.drain_notices(user.user_id).await;
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success(
        "Notifications",
        NoticeList { items },
        Some(meta),
    )))
}
