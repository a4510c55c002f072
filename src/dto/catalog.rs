use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Hotel, HotelOption, Product};

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct HotelList {
    #[schema(value_type = Vec<Hotel>)]
    pub items: Vec<Hotel>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct HotelOptionList {
    #[schema(value_type = Vec<HotelOption>)]
    pub items: Vec<HotelOption>,
}
