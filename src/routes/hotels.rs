use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{HotelList, HotelOptionList},
    error::AppResult,
    models::Hotel,
    response::ApiResponse,
    routes::params::Pagination,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_hotels))
        .route("/options", get(hotel_options))
        .route("/{id}", get(get_hotel))
}

#[utoipa::path(
    get,
    path = "/api/hotels",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List hotels by name", body = ApiResponse<HotelList>)
    ),
    tag = "Hotels"
)]
pub async fn list_hotels(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<HotelList>>> {
    let resp = catalog_service::list_hotels(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/hotels/options",
    responses(
        (status = 200, description = "Hotel id and name pairs", body = ApiResponse<HotelOptionList>)
    ),
    tag = "Hotels"
)]
pub async fn hotel_options(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<HotelOptionList>>> {
    let resp = catalog_service::hotel_options(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/hotels/{id}",
    params(
        ("id" = Uuid, Path, description = "Hotel ID")
    ),
    responses(
        (status = 200, description = "Get hotel", body = ApiResponse<Hotel>),
        (status = 404, description = "Hotel not found")
    ),
    tag = "Hotels"
)]
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Hotel>>> {
    let resp = catalog_service::get_hotel(&state, id).await?;
    Ok(Json(resp))
}
