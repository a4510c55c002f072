use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use sea_orm::ActiveValue::NotSet;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit,
    db::{DbPool, OrmConn},
    entity::cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
    error::AppResult,
    models::{CartItem, CartLine, Product},
};

/// Remote storage for cart rows.
///
/// Writes are scoped by `(user_id, product_id)`; nothing here enforces that a
/// pair maps to a single row, callers merge before inserting.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// All rows of a user, each joined with its product and the product's hotel name.
    async fn fetch_lines(&self, user_id: Uuid) -> AppResult<Vec<CartLine>>;

    async fn insert_line(&self, user_id: Uuid, product_id: Uuid, quantity: i32)
    -> AppResult<CartItem>;

    async fn update_quantity(&self, user_id: Uuid, product_id: Uuid, quantity: i32)
    -> AppResult<()>;

    async fn delete_line(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()>;

    async fn delete_all(&self, user_id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct DbCartStore {
    pool: DbPool,
    orm: OrmConn,
}

impl DbCartStore {
    pub fn new(pool: DbPool, orm: OrmConn) -> Self {
        Self { pool, orm }
    }
}

#[derive(FromRow)]
struct CartWithProductRow {
    cart_id: Uuid,
    user_id: Uuid,
    quantity: i32,
    added_at: DateTime<Utc>,
    product_id: Uuid,
    hotel_id: Uuid,
    hotel_name: String,
    name: String,
    description: String,
    price: Decimal,
    stock: i32,
    category: String,
    rating: f64,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl CartWithProductRow {
    fn into_line(self) -> AppResult<CartLine> {
        Ok(CartLine {
            id: self.cart_id,
            user_id: self.user_id,
            product_id: self.product_id,
            quantity: self.quantity,
            created_at: self.added_at,
            product: Product {
                id: self.product_id,
                hotel_id: self.hotel_id,
                hotel_name: Some(self.hotel_name),
                name: self.name,
                description: self.description,
                price: self.price,
                quantity: self.stock,
                category: self.category.parse()?,
                rating: self.rating,
                image_url: self.image_url,
                created_at: self.created_at,
            },
        })
    }
}

fn scoped(user_id: Uuid, product_id: Uuid) -> Condition {
    Condition::all()
        .add(CartCol::UserId.eq(user_id))
        .add(CartCol::ProductId.eq(product_id))
}

#[async_trait]
impl CartStore for DbCartStore {
    async fn fetch_lines(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let rows = sqlx::query_as::<_, CartWithProductRow>(
            r#"
            SELECT ci.id AS cart_id, ci.user_id, ci.quantity, ci.created_at AS added_at,
                   p.id AS product_id, p.hotel_id, h.name AS hotel_name, p.name, p.description,
                   p.price, p.quantity AS stock, p.category, p.rating, p.image_url, p.created_at
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            JOIN hotels h ON h.id = p.hotel_id
            WHERE ci.user_id = $1
            ORDER BY ci.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CartWithProductRow::into_line).collect()
    }

    async fn insert_line(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<CartItem> {
        let model = CartActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: NotSet,
        }
        .insert(&self.orm)
        .await?;

        audit::record(
            &self.pool,
            user_id,
            "cart_add",
            "cart_items",
            serde_json::json!({ "product_id": product_id, "quantity": quantity }),
        )
        .await;

        Ok(CartItem {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            quantity: model.quantity,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }

    async fn update_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<()> {
        let result = CartItems::update_many()
            .col_expr(CartCol::Quantity, Expr::value(quantity))
            .filter(scoped(user_id, product_id))
            .exec(&self.orm)
            .await?;

        if result.rows_affected > 1 {
            tracing::warn!(
                %user_id,
                %product_id,
                rows = result.rows_affected,
                "quantity update touched more than one cart row"
            );
        }

        audit::record(
            &self.pool,
            user_id,
            "cart_update",
            "cart_items",
            serde_json::json!({ "product_id": product_id, "quantity": quantity }),
        )
        .await;
        Ok(())
    }

    async fn delete_line(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        CartItems::delete_many()
            .filter(scoped(user_id, product_id))
            .exec(&self.orm)
            .await?;

        audit::record(
            &self.pool,
            user_id,
            "cart_remove",
            "cart_items",
            serde_json::json!({ "product_id": product_id }),
        )
        .await;
        Ok(())
    }

    async fn delete_all(&self, user_id: Uuid) -> AppResult<()> {
        let result = CartItems::delete_many()
            .filter(CartCol::UserId.eq(user_id))
            .exec(&self.orm)
            .await?;

        audit::record(
            &self.pool,
            user_id,
            "cart_clear",
            "cart_items",
            serde_json::json!({ "rows": result.rows_affected }),
        )
        .await;
        Ok(())
    }
}
