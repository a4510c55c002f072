mod common;

use common::{MemoryCartStore, admin, offline_state, user};
use hotel_storefront::{
    dto::admin::{DEFAULT_PRICE_RANGE, HotelForm, ProductForm},
    error::AppError,
    models::ProductCategory,
    services::admin_service,
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn hotel_form() -> HotelForm {
    HotelForm {
        name: "Tribe Hotel".to_string(),
        description: "A luxury boutique hotel celebrating African art.".to_string(),
        location: "Limuru Road, Gigiri, Nairobi".to_string(),
        image_url: "https://images.example.com/tribe.jpg".to_string(),
        amenities: vec![" Spa ".to_string(), String::new(), "Art Gallery".to_string()],
        price_range: None,
    }
}

fn product_form() -> ProductForm {
    ProductForm {
        hotel_id: Uuid::new_v4().to_string(),
        name: "Garden Suite".to_string(),
        description: "Suite opening onto the hotel gardens.".to_string(),
        price: Decimal::new(3200000, 2),
        quantity: 4,
        category: "room".to_string(),
        image_url: "https://images.example.com/suite.jpg".to_string(),
    }
}

fn field_errors(err: AppError) -> hotel_storefront::validation::FieldErrors {
    match err {
        AppError::Validation(fields) => fields,
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn valid_hotel_form_fills_defaults() {
    let hotel = hotel_form().validate().expect("valid");
    assert_eq!(hotel.price_range, DEFAULT_PRICE_RANGE);
    assert_eq!(hotel.amenities, vec!["Spa", "Art Gallery"]);
}

#[test]
fn short_description_is_a_field_error() {
    let form = HotelForm {
        description: "Nice".to_string(),
        ..hotel_form()
    };
    let errors = field_errors(form.validate().expect_err("too short"));
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get("description"),
        Some("Description must be at least 10 characters")
    );
}

#[test]
fn every_invalid_hotel_field_is_reported() {
    let form = HotelForm {
        name: "T".to_string(),
        description: "Nice".to_string(),
        location: "Gigi".to_string(),
        image_url: "ftp://images.example.com/tribe.jpg".to_string(),
        amenities: Vec::new(),
        price_range: Some("$$$".to_string()),
    };
    let errors = field_errors(form.validate().expect_err("invalid"));
    assert_eq!(errors.len(), 4);
    assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
    assert_eq!(errors.get("location"), Some("Location must be at least 5 characters"));
    assert_eq!(errors.get("image_url"), Some("Must be a valid URL"));
}

#[test]
fn valid_product_form_parses_fields() {
    let form = product_form();
    let hotel_id = form.hotel_id.clone();
    let product = form.validate().expect("valid");
    assert_eq!(product.hotel_id.to_string(), hotel_id);
    assert_eq!(product.category, ProductCategory::Room);
    assert_eq!(product.quantity, 4);
}

#[test]
fn every_invalid_product_field_is_reported() {
    let form = ProductForm {
        hotel_id: "serena".to_string(),
        price: Decimal::new(-1, 0),
        quantity: -3,
        category: "spa".to_string(),
        image_url: "not a url".to_string(),
        ..product_form()
    };
    let errors = field_errors(form.validate().expect_err("invalid"));
    assert_eq!(errors.get("hotel_id"), Some("Invalid hotel ID"));
    assert_eq!(errors.get("price"), Some("Price must be positive"));
    assert_eq!(errors.get("quantity"), Some("Quantity must be positive"));
    assert_eq!(
        errors.get("category"),
        Some("Invalid enum value. Expected 'room' | 'food' | 'service', received 'spa'")
    );
    assert_eq!(errors.get("image_url"), Some("Must be a valid URL"));
    assert!(!errors.contains("name"));
}

#[test]
fn zero_price_and_stock_are_allowed() {
    let form = ProductForm {
        price: Decimal::ZERO,
        quantity: 0,
        ..product_form()
    };
    assert!(form.validate().is_ok());
}

#[tokio::test]
async fn invalid_hotel_never_reaches_the_database() {
    // The state's database is unreachable: any write would surface as a remote failure.
    let state = offline_state(MemoryCartStore::new());
    let form = HotelForm {
        description: "Nice".to_string(),
        ..hotel_form()
    };

    let err = admin_service::create_hotel(&state, &admin(), form)
        .await
        .expect_err("rejected");
    assert!(field_errors(err).contains("description"));
}

#[tokio::test]
async fn forms_require_an_admin() {
    let state = offline_state(MemoryCartStore::new());
    let err = admin_service::create_product(&state, &user(), product_form())
        .await
        .expect_err("forbidden");
    assert!(matches!(err, AppError::Forbidden));
}
