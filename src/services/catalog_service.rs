use std::{fmt, str::FromStr};

use chrono::Utc;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::{
    dto::catalog::{HotelList, HotelOptionList, ProductList},
    entity::{
        hotels::{Column as HotelCol, Entity as Hotels, Model as HotelModel},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    models::{Hotel, HotelOption, Product, ProductCategory},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, ProductQuery},
    state::AppState,
};

/// The literal that disables a catalog filter.
pub const ALL: &str = "all";

/// An equality filter that is either switched off (`"all"`) or pinned to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            return Ok(Selection::All);
        }
        s.parse::<T>()
            .map(Selection::Only)
            .map_err(|err| AppError::BadRequest(format!("invalid filter value '{s}': {err}")))
    }
}

impl<'de, T> Deserialize<'de> for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Product listing filter: by owning hotel and by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogFilter {
    pub hotel: Selection<Uuid>,
    pub category: Selection<ProductCategory>,
}

impl CatalogFilter {
    pub fn new(hotel: Selection<Uuid>, category: Selection<ProductCategory>) -> Self {
        Self { hotel, category }
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.hotel.admits(&product.hotel_id) && self.category.admits(&product.category)
    }

    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products
            .into_iter()
            .filter(|product| self.matches(product))
            .collect()
    }
}

/// One page of an in-memory listing, with its `Meta`.
pub fn page_of<T>(items: Vec<T>, pagination: &Pagination) -> (Vec<T>, Meta) {
    let (page, limit, offset) = pagination.normalize();
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(0))
        .collect();
    (items, Meta::new(page, limit, total))
}

/// Every product with its hotel name, newest first. Filtering happens in memory.
pub async fn fetch_products(state: &AppState) -> AppResult<Vec<Product>> {
    Products::find()
        .find_also_related(Hotels)
        .order_by_desc(ProdCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, hotel)| product_from_entity(product, hotel.map(|h| h.name)))
        .collect()
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let filter = query.filter();
    let products = filter.apply(fetch_products(state).await?);
    let (items, meta) = page_of(products, &query.pagination());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn find_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let found = Products::find_by_id(id)
        .find_also_related(Hotels)
        .one(&state.orm)
        .await?;
    match found {
        Some((product, hotel)) => product_from_entity(product, hotel.map(|h| h.name)),
        None => Err(AppError::NotFound),
    }
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = find_product(state, id).await?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn list_hotels(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<HotelList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Hotels::find().order_by_asc(HotelCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(u64::try_from(limit).unwrap_or(0))
        .offset(u64::try_from(offset).unwrap_or(u64::MAX))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(hotel_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Hotels", HotelList { items }, Some(meta)))
}

pub async fn get_hotel(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Hotel>> {
    let hotel = Hotels::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(hotel_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Hotel", hotel, None))
}

/// `(id, name)` pairs for hotel pickers.
pub async fn hotel_options(state: &AppState) -> AppResult<ApiResponse<HotelOptionList>> {
    let items: Vec<HotelOption> = Hotels::find()
        .order_by_asc(HotelCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|hotel| HotelOption {
            id: hotel.id,
            name: hotel.name,
        })
        .collect();
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success(
        "Hotels",
        HotelOptionList { items },
        Some(meta),
    ))
}

pub fn product_from_entity(model: ProductModel, hotel_name: Option<String>) -> AppResult<Product> {
    Ok(Product {
        id: model.id,
        hotel_id: model.hotel_id,
        hotel_name,
        name: model.name,
        description: model.description,
        price: model.price,
        quantity: model.quantity,
        category: model.category.parse()?,
        rating: model.rating,
        image_url: model.image_url,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

pub fn hotel_from_entity(model: HotelModel) -> Hotel {
    let amenities = serde_json::from_value::<Vec<String>>(model.amenities).unwrap_or_else(|err| {
        tracing::warn!(hotel_id = %model.id, error = %err, "hotel amenities are not a list of labels");
        Vec::new()
    });
    Hotel {
        id: model.id,
        name: model.name,
        description: model.description,
        location: model.location,
        rating: model.rating,
        image_url: model.image_url,
        amenities,
        price_range: model.price_range,
        owner_id: model.owner_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
