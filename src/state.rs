use std::sync::Arc;

use crate::{
    db::{DbPool, OrmConn},
    services::cart_service::CartRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub carts: Arc<CartRegistry>,
}
