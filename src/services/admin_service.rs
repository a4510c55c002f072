use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::admin::{Created, DashboardStats, HotelForm, NewHotel, NewProduct, ProductForm},
    entity::{
        Hotels, Orders, Products, Users,
        hotels::ActiveModel as HotelActive,
        products::ActiveModel as ProductActive,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Hotel, Product},
    response::{ApiResponse, Meta},
    services::catalog_service::{hotel_from_entity, product_from_entity},
    state::AppState,
};

pub const HOTELS_REDIRECT: &str = "/admin/hotels";
pub const PRODUCTS_REDIRECT: &str = "/admin/products";

/// Validate the hotel form and store it with a zero rating, owned by `user`.
/// Nothing is written when validation fails.
pub async fn create_hotel(
    state: &AppState,
    user: &AuthUser,
    form: HotelForm,
) -> AppResult<ApiResponse<Created<Hotel>>> {
    ensure_admin(user)?;
    let hotel = form.validate()?;
    let hotel = insert_hotel(state, user, hotel).await.map_err(|err| {
        tracing::error!(error = %err, "error creating hotel");
        AppError::Remote("Failed to create hotel".into())
    })?;

    audit::record(
        &state.pool,
        user.user_id,
        "hotel_create",
        "hotels",
        serde_json::json!({ "hotel_id": hotel.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Hotel created successfully!",
        Created {
            record: hotel,
            redirect: HOTELS_REDIRECT.to_string(),
        },
        Some(Meta::empty()),
    ))
}

async fn insert_hotel(state: &AppState, user: &AuthUser, hotel: NewHotel) -> AppResult<Hotel> {
    let amenities = serde_json::to_value(&hotel.amenities)
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
    let model = HotelActive {
        id: Set(Uuid::new_v4()),
        name: Set(hotel.name),
        description: Set(hotel.description),
        location: Set(hotel.location),
        rating: Set(0.0),
        image_url: Set(hotel.image_url),
        amenities: Set(amenities),
        price_range: Set(hotel.price_range),
        owner_id: Set(user.user_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(hotel_from_entity(model))
}

/// Validate the product form and store it with a zero rating.
/// Nothing is written when validation fails.
pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    form: ProductForm,
) -> AppResult<ApiResponse<Created<Product>>> {
    ensure_admin(user)?;
    let product = form.validate()?;
    let product = insert_product(state, product).await.map_err(|err| {
        tracing::error!(error = %err, "error creating product");
        AppError::Remote("Failed to create product".into())
    })?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "hotel_id": product.hotel_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created successfully!",
        Created {
            record: product,
            redirect: PRODUCTS_REDIRECT.to_string(),
        },
        Some(Meta::empty()),
    ))
}

async fn insert_product(state: &AppState, product: NewProduct) -> AppResult<Product> {
    let model = ProductActive {
        id: Set(Uuid::new_v4()),
        hotel_id: Set(product.hotel_id),
        name: Set(product.name),
        description: Set(product.description),
        price: Set(product.price),
        quantity: Set(product.quantity),
        category: Set(product.category.as_str().to_string()),
        rating: Set(0.0),
        image_url: Set(product.image_url),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let hotel_name = Hotels::find_by_id(model.hotel_id)
        .one(&state.orm)
        .await?
        .map(|hotel| hotel.name);
    product_from_entity(model, hotel_name)
}

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_admin(user)?;
    let total_users = Users::find().count(&state.orm).await? as i64;
    let active_hotels = Hotels::find().count(&state.orm).await? as i64;
    let total_products = Products::find().count(&state.orm).await? as i64;
    let total_orders = Orders::find().count(&state.orm).await? as i64;

    let revenue: (Decimal,) =
        sqlx::query_as("SELECT COALESCE(SUM(total_amount), 0)::NUMERIC FROM orders")
            .fetch_one(&state.pool)
            .await?;

    Ok(ApiResponse::success(
        "Dashboard",
        DashboardStats {
            total_users,
            active_hotels,
            total_products,
            total_orders,
            revenue: revenue.0,
        },
        Some(Meta::empty()),
    ))
}
