use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{DashboardStats, HotelForm, ProductForm},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartSummary, CartView, UpdateQuantityRequest},
        catalog::{HotelList, HotelOptionList, ProductList},
        reports::{Report, ReportKind, ReportTable},
    },
    models::{CartItem, CartLine, Hotel, HotelOption, Product, ProductCategory, User},
    notify::{Notice, NoticeLevel},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, hotels, notifications, params, products},
    validation::FieldErrors,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        products::list_products,
        products::get_product,
        hotels::list_hotels,
        hotels::hotel_options,
        hotels::get_hotel,
        cart::view_cart,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        notifications::drain_notifications,
        admin::dashboard,
        admin::create_hotel,
        admin::create_product,
        admin::download_report,
        admin::preview_report
    ),
    components(
        schemas(
            User,
            Hotel,
            HotelOption,
            Product,
            ProductCategory,
            CartItem,
            CartLine,
            CartSummary,
            CartView,
            Notice,
            NoticeLevel,
            notifications::NoticeList,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            UpdateQuantityRequest,
            HotelForm,
            ProductForm,
            DashboardStats,
            FieldErrors,
            Report,
            ReportKind,
            ReportTable,
            ProductList,
            HotelList,
            HotelOptionList,
            params::Pagination,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<Report>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Hotels", description = "Hotel endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Notifications", description = "Cart notices"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
