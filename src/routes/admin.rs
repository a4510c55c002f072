use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    dto::{
        admin::{Created, DashboardStats, HotelForm, ProductForm},
        reports::{Report, ReportKind},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Hotel, Product},
    response::ApiResponse,
    services::{admin_service, report_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/hotels", post(create_hotel))
        .route("/products", post(create_product))
        .route("/reports/{kind}", get(download_report))
        .route("/reports/{kind}/preview", get(preview_report))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Store counters and total revenue", body = ApiResponse<DashboardStats>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = admin_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/hotels",
    request_body = HotelForm,
    responses(
        (status = 200, description = "Hotel created successfully!", body = ApiResponse<Created<Hotel>>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "One message per invalid field"),
        (status = 500, description = "Failed to create hotel")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_hotel(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<HotelForm>,
) -> AppResult<Json<ApiResponse<Created<Hotel>>>> {
    let resp = admin_service::create_hotel(&state, &user, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = ProductForm,
    responses(
        (status = 200, description = "Product created successfully!", body = ApiResponse<Created<Product>>),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "One message per invalid field"),
        (status = 500, description = "Failed to create product")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<ProductForm>,
) -> AppResult<Json<ApiResponse<Created<Product>>>> {
    let resp = admin_service::create_product(&state, &user, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/{kind}",
    params(
        ("kind" = String, Path, description = "sales, inventory or revenue")
    ),
    responses(
        (status = 200, description = "Report as a PDF attachment", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Unknown report kind"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Failed to generate report")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn download_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kind): Path<String>,
) -> AppResult<impl IntoResponse> {
    let kind: ReportKind = kind.parse()?;
    let report = report_service::build_report(&state, &user, kind).await?;
    let filename = report.filename("pdf");

    let bytes = tokio::task::spawn_blocking(move || report_service::render_pdf(&report))
        .await
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))??;

    tracing::info!(%kind, %filename, size = bytes.len(), "report downloaded");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/{kind}/preview",
    params(
        ("kind" = String, Path, description = "sales, inventory or revenue")
    ),
    responses(
        (status = 200, description = "Report table as JSON", body = ApiResponse<Report>),
        (status = 400, description = "Unknown report kind"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn preview_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kind): Path<String>,
) -> AppResult<Json<ApiResponse<Report>>> {
    let kind: ReportKind = kind.parse()?;
    let report = report_service::build_report(&state, &user, kind).await?;
    Ok(Json(ApiResponse::success(report.title.clone(), report, None)))
}
