mod common;

use common::product_at;
use hotel_storefront::{
    models::{Product, ProductCategory},
    routes::params::{Pagination, ProductQuery},
    services::catalog_service::{CatalogFilter, Selection, page_of},
};
use uuid::Uuid;

fn catalog() -> (Uuid, Uuid, Vec<Product>) {
    let serena = Uuid::new_v4();
    let tribe = Uuid::new_v4();
    let products = vec![
        product_at(serena, "Deluxe King Room", 25000, ProductCategory::Room),
        product_at(serena, "Continental Breakfast", 1800, ProductCategory::Food),
        product_at(tribe, "Garden Suite", 32000, ProductCategory::Room),
        product_at(tribe, "Spa Massage", 6000, ProductCategory::Service),
        product_at(tribe, "Nyama Choma Platter", 3500, ProductCategory::Food),
    ];
    (serena, tribe, products)
}

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn all_hotels_room_category_keeps_every_room() {
    let (_, _, products) = catalog();
    let filter: CatalogFilter = CatalogFilter::new(Selection::All, "room".parse().expect("category"));
    let rooms = filter.apply(products.clone());

    let expected: Vec<Product> = products
        .into_iter()
        .filter(|p| p.category == ProductCategory::Room)
        .collect();
    assert_eq!(rooms, expected);
    assert_eq!(names(&rooms), vec!["Deluxe King Room", "Garden Suite"]);
}

#[test]
fn both_filters_must_match() {
    let (serena, tribe, products) = catalog();

    let serena_food = CatalogFilter::new(Selection::Only(serena), Selection::Only(ProductCategory::Food));
    assert_eq!(names(&serena_food.apply(products.clone())), vec!["Continental Breakfast"]);

    let tribe_all = CatalogFilter::new(Selection::Only(tribe), Selection::All);
    assert_eq!(tribe_all.apply(products.clone()).len(), 3);

    let nobody = CatalogFilter::new(Selection::Only(Uuid::new_v4()), Selection::All);
    assert!(nobody.apply(products).is_empty());
}

#[test]
fn default_filter_keeps_order_and_everything() {
    let (_, _, products) = catalog();
    let kept = CatalogFilter::default().apply(products.clone());
    assert_eq!(kept, products);
}

#[test]
fn all_sentinel_parses_case_insensitively() {
    assert_eq!("all".parse::<Selection<Uuid>>().expect("all"), Selection::All);
    assert_eq!("ALL".parse::<Selection<ProductCategory>>().expect("ALL"), Selection::All);
    assert_eq!("".parse::<Selection<ProductCategory>>().expect("empty"), Selection::All);
    assert_eq!(
        "service".parse::<Selection<ProductCategory>>().expect("service"),
        Selection::Only(ProductCategory::Service)
    );
    assert!("spa".parse::<Selection<ProductCategory>>().is_err());
    assert!("not-a-uuid".parse::<Selection<Uuid>>().is_err());
}

#[test]
fn product_query_builds_the_filter() {
    let hotel = Uuid::new_v4();
    let query: ProductQuery = serde_json::from_value(serde_json::json!({
        "hotel_id": hotel.to_string(),
        "category": "all",
        "page": 2
    }))
    .expect("query");

    let filter = query.filter();
    assert_eq!(filter.hotel, Selection::Only(hotel));
    assert_eq!(filter.category, Selection::All);
    assert_eq!(query.pagination().normalize(), (2, 20, 20));

    let empty = ProductQuery::default();
    assert_eq!(empty.filter(), CatalogFilter::default());
}

#[test]
fn huge_page_numbers_saturate_instead_of_overflowing() {
    let pagination = Pagination {
        page: Some(i64::MAX),
        per_page: Some(20),
    };
    assert_eq!(pagination.normalize(), (i64::MAX, 20, i64::MAX));

    let (_, _, products) = catalog();
    let (items, meta) = page_of(products, &pagination);
    assert!(items.is_empty());
    assert_eq!(meta.total, Some(5));
    assert_eq!(meta.page, Some(i64::MAX));
}

#[test]
fn out_of_range_paging_is_clamped() {
    let pagination = Pagination {
        page: Some(-4),
        per_page: Some(10_000),
    };
    assert_eq!(pagination.normalize(), (1, 100, 0));

    let (_, _, products) = catalog();
    let (items, _) = page_of(products, &Pagination::default());
    assert_eq!(items.len(), 5);
}
