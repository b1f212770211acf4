//! Customer sign-in state: extractors, the identity interface, and the
//! change-notification bus.
//!
//! Handlers never touch the session layer directly. They take
//! [`CustomerSession`] (works signed in or out) or [`RequireAuth`]
//! (redirects anonymous visitors to the login page), and read identity
//! through the [`Identity`] trait. Sign-in mutations go through
//! [`CustomerSession::sign_in`] and [`CustomerSession::sign_out`], each of
//! which writes the session and then emits exactly one [`AuthEvent`] on
//! the process-wide bus.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use bookstore_core::CustomerId;
use tokio::sync::broadcast;
use tower_sessions::Session;
use tracing::warn;

use crate::error::AppError;
use crate::models::{CurrentCustomer, session_keys};

/// A sign-in state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// A customer signed in.
    SignedIn(CustomerId),
    /// The session was cleared; carries the id that was signed in, when
    /// there was one.
    SignedOut(Option<CustomerId>),
}

/// Broadcast bus for sign-in transitions.
///
/// Every mutation of the session identity produces exactly one event
/// here. The audit task in `main` keeps a subscriber alive for logging;
/// anything else that cares subscribes too and re-reads state when an
/// event arrives.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    /// Create a new bus.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Subscribe to sign-in transitions.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    /// Announce a transition. Delivery is best-effort: with zero
    /// subscribers the event is dropped, which is fine for a
    /// notify-and-re-read bus.
    fn notify(&self, event: AuthEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of "who is signed in right now".
///
/// Navigation and page rendering consume identity through this interface
/// so they never reach into the session layer themselves.
pub trait Identity {
    /// The signed-in customer, if any.
    fn current(&self) -> Option<&CurrentCustomer>;

    /// Just the id, for backend calls.
    fn customer_id(&self) -> Option<CustomerId> {
        self.current().map(|c| c.id)
    }

    /// Whether anyone is signed in.
    fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }
}

/// Per-request accessor for the customer session.
///
/// Loads the identity from the cookie session once at extraction time.
/// Any session-layer failure reads as "signed out"; a request is never
/// rejected because the session store is broken.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(session: CustomerSession) -> impl IntoResponse {
///     match session.customer_id() {
///         Some(id) => format!("Customer {id}"),
///         None => "Guest visitor".to_string(),
///     }
/// }
/// ```
pub struct CustomerSession {
    session: Option<Session>,
    current: Option<CurrentCustomer>,
}

impl CustomerSession {
    /// Sign a customer in: persist the identity, then notify.
    ///
    /// # Errors
    ///
    /// Returns an error if the session layer is missing or the identity
    /// cannot be written. No event is emitted in that case.
    pub async fn sign_in(
        &mut self,
        events: &AuthEvents,
        customer: CurrentCustomer,
    ) -> Result<(), AppError> {
        let Some(session) = &self.session else {
            return Err(AppError::Internal(
                "session layer unavailable".to_string(),
            ));
        };

        session
            .insert(session_keys::CURRENT_CUSTOMER, &customer)
            .await?;

        let id = customer.id;
        self.current = Some(customer);
        events.notify(AuthEvent::SignedIn(id));
        Ok(())
    }

    /// Sign out: drop the whole session, then notify.
    ///
    /// Clearing an already-anonymous session still counts as a mutation
    /// and still emits one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store refuses the flush. No event
    /// is emitted in that case.
    pub async fn sign_out(&mut self, events: &AuthEvents) -> Result<(), AppError> {
        if let Some(session) = &self.session {
            session.flush().await?;
        }

        let previous = self.current.take().map(|c| c.id);
        events.notify(AuthEvent::SignedOut(previous));
        Ok(())
    }

    /// Load the accessor from request parts, failing open to signed-out.
    async fn load(parts: &mut Parts) -> Self {
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            warn!("Session layer missing from request extensions");
            return Self {
                session: None,
                current: None,
            };
        };

        let current = read_current(&session).await;

        Self {
            session: Some(session),
            current,
        }
    }
}

impl Identity for CustomerSession {
    fn current(&self) -> Option<&CurrentCustomer> {
        self.current.as_ref()
    }
}

impl<S> FromRequestParts<S> for CustomerSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::load(parts).await)
    }
}

/// Extractor that requires a signed-in customer.
///
/// Anonymous visitors are redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(customer): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Customer {}", customer.id)
/// }
/// ```
pub struct RequireAuth(pub CurrentCustomer);

impl Identity for RequireAuth {
    fn current(&self) -> Option<&CurrentCustomer> {
        Some(&self.0)
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accessor = CustomerSession::load(parts).await;
        accessor
            .current
            .map(Self)
            .ok_or_else(|| Redirect::to("/auth/login"))
    }
}

/// Read the stored identity; a broken store or garbage value reads as
/// signed out, never an error.
async fn read_current(session: &Session) -> Option<CurrentCustomer> {
    session
        .get(session_keys::CURRENT_CUSTOMER)
        .await
        .ok()
        .flatten()
}
