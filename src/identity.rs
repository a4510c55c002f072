use tokio::sync::watch;

use crate::middleware::auth::AuthUser;

/// Publishes the current identity (or its absence) to interested services.
///
/// Consumers call [`IdentityProvider::subscribe`] and react to changes; see
/// `CartSession::follow`.
#[derive(Debug)]
pub struct IdentityProvider {
    tx: watch::Sender<Option<AuthUser>>,
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn current(&self) -> Option<AuthUser> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.tx.subscribe()
    }

    pub fn sign_in(&self, user: AuthUser) {
        tracing::debug!(user_id = %user.user_id, "identity signed in");
        self.tx.send_replace(Some(user));
    }

    pub fn sign_out(&self) {
        tracing::debug!("identity signed out");
        self.tx.send_replace(None);
    }
}
