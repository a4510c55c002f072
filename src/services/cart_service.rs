//! Per-identity shopping carts kept in memory and mirrored to the cart store.
//!
//! A [`CartSession`] owns the ordered cart lines of one identity. Every
//! operation holds the session lock across its remote call, so overlapping
//! requests for the same identity are applied one after another in arrival
//! order. A failed remote call leaves the lines as they were, records an error
//! notice and returns [`AppError::Remote`].

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use rust_decimal::Decimal;
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
};
use uuid::Uuid;

use crate::{
    dto::cart::{CartSummary, CartView},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, TOKEN_TTL_HOURS},
    models::{CartLine, Product},
    notify::{Notice, NoticeBuffer},
    services::cart_store::CartStore,
};

pub const LOGIN_REQUIRED: &str = "Please login to add items to cart";
pub const LOGIN_REQUIRED_MANAGE: &str = "Please login to manage your cart";

/// Value added tax applied on top of the cart subtotal.
pub fn tax_rate() -> Decimal {
    Decimal::new(16, 2)
}

/// Sum of price times quantity over the given lines.
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

pub fn summarize(subtotal: Decimal) -> CartSummary {
    let tax = (subtotal * tax_rate()).round_dp(2);
    CartSummary {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

#[derive(Default)]
struct CartState {
    identity: Option<AuthUser>,
    lines: Vec<CartLine>,
    loaded: bool,
}

impl CartState {
    fn position(&self, product_id: Uuid) -> Option<usize> {
        self.lines.iter().position(|line| line.product_id == product_id)
    }
}

pub struct CartSession {
    store: Arc<dyn CartStore>,
    notices: Arc<NoticeBuffer>,
    state: Mutex<CartState>,
}

impl CartSession {
    pub fn new(store: Arc<dyn CartStore>) -> Self {
        Self::with_notices(store, Arc::new(NoticeBuffer::default()))
    }

    pub fn with_notices(store: Arc<dyn CartStore>, notices: Arc<NoticeBuffer>) -> Self {
        Self {
            store,
            notices,
            state: Mutex::new(CartState::default()),
        }
    }

    pub fn notices(&self) -> &Arc<NoticeBuffer> {
        &self.notices
    }

    pub async fn identity(&self) -> Option<AuthUser> {
        self.state.lock().await.identity.clone()
    }

    /// React to an identity change: load the identity's cart, or drop the
    /// in-memory lines when the identity goes away (no remote call).
    pub async fn set_identity(&self, identity: Option<AuthUser>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        match identity {
            None => {
                state.identity = None;
                state.lines.clear();
                state.loaded = false;
                Ok(())
            }
            Some(user) => self.load(&mut state, user).await,
        }
    }

    /// Load for `user` unless the session already holds that identity's cart.
    pub async fn ensure_identity(&self, user: &AuthUser) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let current = state
            .identity
            .as_ref()
            .is_some_and(|held| held.user_id == user.user_id);
        if current && state.loaded {
            return Ok(());
        }
        self.load(&mut state, user.clone()).await
    }

    /// Apply every identity published on `identity` until its sender is dropped.
    pub fn follow(self: Arc<Self>, mut identity: watch::Receiver<Option<AuthUser>>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let next = identity.borrow_and_update().clone();
                if let Err(err) = self.set_identity(next).await {
                    tracing::debug!(error = %err, "identity change left an empty cart");
                }
                if identity.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    async fn load(&self, state: &mut CartState, user: AuthUser) -> AppResult<()> {
        let user_id = user.user_id;
        state.identity = Some(user);
        match self.store.fetch_lines(user_id).await {
            Ok(lines) => {
                tracing::debug!(%user_id, lines = lines.len(), "cart loaded");
                state.lines = lines;
                state.loaded = true;
                Ok(())
            }
            Err(err) => {
                tracing::error!(%user_id, error = %err, "error loading cart");
                state.lines.clear();
                state.loaded = false;
                Err(self.fail("Failed to load cart items"))
            }
        }
    }

    /// Add `quantity` units of `product`. An existing line for the product is
    /// merged by summing quantities; otherwise a new row is inserted and the
    /// given product is kept as the line's display copy.
    pub async fn add_product(&self, product: Product, quantity: i32) -> AppResult<CartLine> {
        if quantity < 1 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".to_string(),
            ));
        }

        let mut state = self.state.lock().await;
        let user_id = self.require_identity(&state, LOGIN_REQUIRED)?;

        if let Some(index) = state.position(product.id) {
            let merged = state.lines[index].quantity.saturating_add(quantity);
            return match self
                .store
                .update_quantity(user_id, product.id, merged)
                .await
            {
                Ok(()) => {
                    state.lines[index].quantity = merged;
                    self.notices.success("Added to cart");
                    Ok(state.lines[index].clone())
                }
                Err(err) => {
                    tracing::error!(%user_id, product_id = %product.id, error = %err, "error adding to cart");
                    Err(self.fail("Failed to add item to cart"))
                }
            };
        }

        match self.store.insert_line(user_id, product.id, quantity).await {
            Ok(row) => {
                let line = CartLine::from_row(row, product);
                state.lines.push(line.clone());
                self.notices.success("Added to cart");
                Ok(line)
            }
            Err(err) => {
                tracing::error!(%user_id, product_id = %product.id, error = %err, "error adding to cart");
                Err(self.fail("Failed to add item to cart"))
            }
        }
    }

    /// Set the quantity of a product's line. Values below 1 remove the line.
    ///
    /// The remote update is issued even if no local line exists; the returned
    /// line is `None` in that case and after a removal.
    pub async fn update_quantity(
        &self,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<Option<CartLine>> {
        let mut state = self.state.lock().await;
        let user_id = self.require_identity(&state, LOGIN_REQUIRED_MANAGE)?;

        if quantity < 1 {
            self.remove_locked(&mut state, user_id, product_id).await?;
            return Ok(None);
        }

        if let Err(err) = self
            .store
            .update_quantity(user_id, product_id, quantity)
            .await
        {
            tracing::error!(%user_id, %product_id, error = %err, "error updating quantity");
            return Err(self.fail("Failed to update quantity"));
        }

        let updated = state.position(product_id).map(|index| {
            state.lines[index].quantity = quantity;
            state.lines[index].clone()
        });
        self.notices.success("Quantity updated");
        Ok(updated)
    }

    pub async fn remove(&self, product_id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user_id = self.require_identity(&state, LOGIN_REQUIRED_MANAGE)?;
        self.remove_locked(&mut state, user_id, product_id).await
    }

    async fn remove_locked(
        &self,
        state: &mut CartState,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<()> {
        match self.store.delete_line(user_id, product_id).await {
            Ok(()) => {
                state.lines.retain(|line| line.product_id != product_id);
                self.notices.success("Removed from cart");
                Ok(())
            }
            Err(err) => {
                tracing::error!(%user_id, %product_id, error = %err, "error removing from cart");
                Err(self.fail("Failed to remove item from cart"))
            }
        }
    }

    pub async fn clear(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user_id = self.require_identity(&state, LOGIN_REQUIRED_MANAGE)?;
        match self.store.delete_all(user_id).await {
            Ok(()) => {
                state.lines.clear();
                self.notices.success("Cart cleared");
                Ok(())
            }
            Err(err) => {
                tracing::error!(%user_id, error = %err, "error clearing cart");
                Err(self.fail("Failed to clear cart"))
            }
        }
    }

    pub async fn lines(&self) -> Vec<CartLine> {
        self.state.lock().await.lines.clone()
    }

    pub async fn total(&self) -> Decimal {
        cart_total(&self.state.lock().await.lines)
    }

    pub async fn view(&self) -> CartView {
        let state = self.state.lock().await;
        CartView {
            items: state.lines.clone(),
            summary: summarize(cart_total(&state.lines)),
        }
    }

    fn require_identity(&self, state: &CartState, message: &str) -> AppResult<Uuid> {
        match &state.identity {
            Some(user) => Ok(user.user_id),
            None => {
                self.notices.error(message);
                Err(AppError::Unauthorized(message.to_string()))
            }
        }
    }

    fn fail(&self, message: &str) -> AppError {
        self.notices.error(message);
        AppError::Remote(message.to_string())
    }
}

struct Entry {
    session: Arc<CartSession>,
    last_used: Instant,
}

/// Owns one [`CartSession`] per signed-in identity.
///
/// Sessions unused for longer than the idle timeout (by default the token
/// lifetime) are dropped the next time any session is opened. Their stored
/// rows are kept and reload on the identity's next request.
pub struct CartRegistry {
    store: Arc<dyn CartStore>,
    idle_timeout: Duration,
    sessions: Mutex<HashMap<Uuid, Entry>>,
}

impl CartRegistry {
    pub fn new(store: Arc<dyn CartStore>) -> Self {
        let token_ttl = Duration::from_secs(TOKEN_TTL_HOURS.unsigned_abs() * 3600);
        Self::with_idle_timeout(store, token_ttl)
    }

    pub fn with_idle_timeout(store: Arc<dyn CartStore>, idle_timeout: Duration) -> Self {
        Self {
            store,
            idle_timeout,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The session of `user`, created and loaded on first use.
    ///
    /// If the session is ended while it loads, the load is retried on a
    /// fresh session so the caller never holds one the registry has dropped.
    pub async fn session(&self, user: &AuthUser) -> AppResult<Arc<CartSession>> {
        loop {
            let session = self.checkout(user.user_id).await;
            session.ensure_identity(user).await?;

            let sessions = self.sessions.lock().await;
            let current = sessions
                .get(&user.user_id)
                .is_some_and(|entry| Arc::ptr_eq(&entry.session, &session));
            if current {
                return Ok(session);
            }
            tracing::debug!(user_id = %user.user_id, "cart session ended while loading, retrying");
        }
    }

    async fn checkout(&self, user_id: Uuid) -> Arc<CartSession> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|id, entry| {
            *id == user_id || now.duration_since(entry.last_used) < self.idle_timeout
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "idle cart sessions dropped");
        }

        let entry = sessions.entry(user_id).or_insert_with(|| Entry {
            session: Arc::new(CartSession::new(self.store.clone())),
            last_used: now,
        });
        entry.last_used = now;
        entry.session.clone()
    }

    /// Drop the in-memory cart of `user_id`. Remote rows are kept.
    pub async fn end_session(&self, user_id: Uuid) -> bool {
        let removed = self.sessions.lock().await.remove(&user_id);
        match removed {
            Some(entry) => {
                if let Err(err) = entry.session.set_identity(None).await {
                    tracing::warn!(%user_id, error = %err, "failed to reset cart session");
                }
                true
            }
            None => false,
        }
    }

    /// Pending notices of `user_id`, oldest first. Empty when no session is open.
    pub async fn drain_notices(&self, user_id: Uuid) -> Vec<Notice> {
        let session = self
            .sessions
            .lock()
            .await
            .get(&user_id)
            .map(|entry| entry.session.clone());
        session
            .map(|session| session.notices().drain())
            .unwrap_or_default()
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
