//! Bearer-token gate for the `/mcp` routes.

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::GatewayError;

const BEARER_PREFIX: &str = "Bearer ";

/// Allow-list of bearer tokens.
///
/// An empty list disables authentication.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    tokens: Arc<HashSet<String>>,
}

impl AuthGate {
    /// Build from tokens; entries are trimmed and blanks dropped.
    #[must_use]
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            tokens: Arc::new(tokens),
        }
    }

    /// Build from a comma-separated list.
    #[must_use]
    pub fn from_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Check an `Authorization` header value.
    ///
    /// # Errors
    /// `Unauthenticated` when the header is absent or not a bearer
    /// credential, `Unauthorized` when the token is not allow-listed.
    pub fn check(&self, header: Option<&str>) -> Result<(), GatewayError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let token = header
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .ok_or(GatewayError::Unauthenticated)?
            .trim();

        if self.tokens.contains(token) {
            Ok(())
        } else {
            Err(GatewayError::Unauthorized)
        }
    }
}

/// Axum middleware enforcing the gate.
///
/// Use with `middleware::from_fn_with_state(gate, require_auth)`.
pub async fn require_auth(State(gate): State<AuthGate>, request: Request, next: Next) -> Response {
    // A header that is not valid UTF-8 counts as malformed.
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default());

    match gate.check(header) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request: {e}"
            );
            e.into_response()
        }
    }
}
