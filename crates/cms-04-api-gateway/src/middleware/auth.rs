//! Authentication middleware.
//!
//! Resolves `Authorization: Bearer <token>` against the configured staff
//! tokens and attaches the matching [`Session`] to the request. It never
//! rejects a request itself: the method tier is only known once the body is
//! parsed, so the handler decides whether a missing session matters.

use crate::domain::config::{AuthConfig, StaffToken};
use axum::{body::Body, http::Request, response::Response};
use shared_types::{constant_time_compare, Session};
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    tokens: Arc<Vec<StaffToken>>,
}

impl AuthLayer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            tokens: Arc::new(config.staff_tokens.clone()),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    tokens: Arc<Vec<StaffToken>>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let tokens = Arc::clone(&self.tokens);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if let Some(presented) = bearer_token(&req) {
                match resolve_session(&tokens, presented) {
                    Some(session) => {
                        debug!(user_id = %session.actor.user_id, "Staff session resolved");
                        req.extensions_mut().insert(session);
                    }
                    None => {
                        // Treated as anonymous; staff methods fail later with 401.
                        warn!("Unknown bearer token presented");
                    }
                }
            }

            inner.call(req).await
        })
    }
}

/// Token from the `Authorization` header, if it uses the Bearer scheme.
fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Match `presented` against every configured token.
///
/// All entries are compared so the time taken does not depend on which one
/// matched.
pub fn resolve_session(tokens: &[StaffToken], presented: &str) -> Option<Session> {
    let mut matched: Option<&StaffToken> = None;
    for entry in tokens {
        if constant_time_compare(presented, &entry.token) && matched.is_none() {
            matched = Some(entry);
        }
    }
    matched.map(|entry| Session::new(entry.actor()))
}
