use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::ProductCategory,
    validation::{self, FieldErrors},
};

pub const DEFAULT_PRICE_RANGE: &str = "$$";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HotelForm {
    pub name: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub price_range: Option<String>,
}

/// A hotel form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHotel {
    pub name: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
    pub amenities: Vec<String>,
    pub price_range: String,
}

impl HotelForm {
    pub fn validate(self) -> Result<NewHotel, AppError> {
        let mut errors = FieldErrors::new();
        validation::min_chars(&mut errors, "name", &self.name, 2, "Name must be at least 2 characters");
        validation::min_chars(
            &mut errors,
            "description",
            &self.description,
            10,
            "Description must be at least 10 characters",
        );
        validation::min_chars(
            &mut errors,
            "location",
            &self.location,
            5,
            "Location must be at least 5 characters",
        );
        validation::web_url(&mut errors, "image_url", &self.image_url, "Must be a valid URL");

        let price_range = self
            .price_range
            .map(|range| range.trim().to_string())
            .filter(|range| !range.is_empty())
            .unwrap_or_else(|| DEFAULT_PRICE_RANGE.to_string());
        let amenities = self
            .amenities
            .into_iter()
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();

        errors.finish(|| NewHotel {
            name: self.name,
            description: self.description,
            location: self.location,
            image_url: self.image_url.trim().to_string(),
            amenities,
            price_range,
        })
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductForm {
    pub hotel_id: String,
    pub name: String,
    pub description: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub quantity: i64,
    pub category: String,
    pub image_url: String,
}

/// A product form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub hotel_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i32,
    pub category: ProductCategory,
    pub image_url: String,
}

impl ProductForm {
    pub fn validate(self) -> Result<NewProduct, AppError> {
        let mut errors = FieldErrors::new();
        let hotel_id = validation::uuid(&mut errors, "hotel_id", &self.hotel_id, "Invalid hotel ID");
        validation::min_chars(&mut errors, "name", &self.name, 2, "Name must be at least 2 characters");
        validation::min_chars(
            &mut errors,
            "description",
            &self.description,
            10,
            "Description must be at least 10 characters",
        );
        validation::non_negative_decimal(&mut errors, "price", self.price, "Price must be positive");
        let quantity = validation::non_negative_count(
            &mut errors,
            "quantity",
            self.quantity,
            "Quantity must be positive",
        );
        let category = self.category.parse::<ProductCategory>().ok();
        if category.is_none() {
            errors.add(
                "category",
                format!(
                    "Invalid enum value. Expected 'room' | 'food' | 'service', received '{}'",
                    self.category
                ),
            );
        }
        validation::web_url(&mut errors, "image_url", &self.image_url, "Must be a valid URL");

        match (hotel_id, quantity, category) {
            (Some(hotel_id), Some(quantity), Some(category)) => errors.finish(|| NewProduct {
                hotel_id,
                name: self.name,
                description: self.description,
                price: self.price,
                quantity,
                category,
                image_url: self.image_url.trim().to_string(),
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Result of a successful form submission: the stored record and where the
/// client should go next.
#[derive(Debug, Serialize, ToSchema)]
pub struct Created<T> {
    pub record: T,
    pub redirect: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_users: i64,
    pub active_hotels: i64,
    pub total_products: i64,
    pub total_orders: i64,
    #[schema(value_type = String)]
    pub revenue: Decimal,
}
