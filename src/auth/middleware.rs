//! Authentication Middleware
//! Mission: Run authentication, then authorization, in front of every route

use crate::auth::{
    error::AuthError,
    permissions::{authorize, Operation},
    service::{AuthService, AuthenticatedPrincipal},
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-route gate state: the shared auth service plus the operation being guarded
#[derive(Clone)]
pub struct OperationGate {
    auth: Arc<AuthService>,
    operation: Operation,
}

impl OperationGate {
    pub fn new(auth: Arc<AuthService>, operation: Operation) -> Self {
        Self { auth, operation }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

/// Pull the raw token out of `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Gate middleware. Authentication failures short-circuit before the role
/// check; role failures short-circuit before the handler.
pub async fn enforce(
    State(gate): State<OperationGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let policy = gate.operation.policy();

    let principal = if policy.requires_authentication() {
        let resolved = bearer_token(req.headers()).and_then(|token| gate.auth.authenticate(token));
        match resolved {
            Ok(principal) => Some(principal),
            Err(e) => {
                debug!(operation = %gate.operation, reason = %e, "Unauthenticated request");
                return Err(e);
            }
        }
    } else {
        None
    };

    if let Err(e) = authorize(policy.roles, principal.as_ref()) {
        if let Some(p) = &principal {
            warn!(
                operation = %gate.operation,
                principal = %p.id(),
                role = %p.role(),
                "Permission denied"
            );
        }
        return Err(e);
    }

    // Handlers read the principal back through `CurrentPrincipal`
    if let Some(principal) = principal {
        req.extensions_mut().insert(principal);
    }

    Ok(next.run(req).await)
}

/// Extractor for the principal attached by [`enforce`]
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub AuthenticatedPrincipal);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(AuthError::MissingToken)
    }
}
