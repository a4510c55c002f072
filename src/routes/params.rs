use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::ProductCategory,
    services::catalog_service::{CatalogFilter, Selection},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

/// Product listing query. `hotel_id` and `category` accept `all` to disable the filter.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub hotel_id: Option<Selection<Uuid>>,
    pub category: Option<Selection<ProductCategory>>,
}

impl ProductQuery {
    pub fn filter(&self) -> CatalogFilter {
        CatalogFilter::new(
            self.hotel_id.unwrap_or_default(),
            self.category.unwrap_or_default(),
        )
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
