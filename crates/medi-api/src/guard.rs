//! # Auth Guards
//!
//! Middleware run before resource handlers:
//!
//! 1. [`require_token`] verifies `Authorization: Bearer <token>` and attaches
//!    the decoded [`Caller`] to the request. Failure is 401.
//! 2. [`require_role`] admits the caller if their role is in the gate's set.
//!    Failure is 403.
//!
//! Safe requests trust the role stamped into the token at issuance. Mutating
//! requests, and tokens issued before the user had a stored role, re-read the
//! caller's user document instead (one lookup).

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use medi_core::{fields, Claims, Collection, DocumentStore, Filter, MarketError, MarketResult, Role};
use tracing::{debug, warn};

/// Verified token claims of the current caller
#[derive(Debug, Clone)]
pub struct Caller(pub Claims);

impl Caller {
    pub fn email(&self) -> Option<&str> {
        self.0.email.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.0.role
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .ok_or_else(|| MarketError::unauthorized().into())
    }
}

/// Extract the bearer credential from the `Authorization` header
pub fn bearer_token(headers: &HeaderMap) -> MarketResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(MarketError::unauthorized)?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(MarketError::unauthorized()),
    }
}

/// Token verification middleware
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let claims = match bearer_token(request.headers()).and_then(|t| state.tokens.verify(t)) {
        Ok(claims) => claims,
        Err(err) => {
            debug!(path = %request.uri().path(), "rejected request without valid token");
            return Err(err.into());
        }
    };

    request.extensions_mut().insert(Caller(claims));
    Ok(next.run(request).await)
}

/// The set of roles a group of routes admits
#[derive(Clone)]
pub struct RoleGate {
    state: AppState,
    admitted: &'static [Role],
}

impl RoleGate {
    pub const ADMIN: &'static [Role] = &[Role::Admin];
    pub const SELLER: &'static [Role] = &[Role::Seller];
    pub const USER: &'static [Role] = &[Role::User];
    pub const SELLER_OR_ADMIN: &'static [Role] = &[Role::Seller, Role::Admin];

    pub fn new(state: AppState, admitted: &'static [Role]) -> Self {
        Self { state, admitted }
    }

    pub fn admits(&self, role: Role) -> bool {
        self.admitted.contains(&role)
    }

    /// Decide whether the caller may proceed; returns the effective role.
    pub async fn authorize(&self, claims: &Claims, reverify: bool) -> MarketResult<Role> {
        let email = claims.email.as_deref().ok_or_else(MarketError::forbidden)?;

        let role = if reverify || claims.role.is_none() {
            stored_role(self.state.store.as_ref(), email).await?
        } else {
            claims.role
        };

        match role {
            Some(role) if self.admits(role) => Ok(role),
            other => {
                warn!(email, role = ?other, admitted = ?self.admitted, "forbidden");
                Err(MarketError::forbidden())
            }
        }
    }
}

/// Role on the caller's stored user document, if any
pub async fn stored_role(store: &dyn DocumentStore, email: &str) -> MarketResult<Option<Role>> {
    let user = store
        .find_one(Collection::Users, &Filter::all().eq(fields::EMAIL, email))
        .await?;
    Ok(user.as_ref().and_then(Role::from_document))
}

/// Requests that change state re-verify the role against storage
pub fn is_mutating(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Role verification middleware; must run after [`require_token`]
pub async fn require_role(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let claims = request
        .extensions()
        .get::<Caller>()
        .map(|c| c.0.clone())
        .ok_or_else(MarketError::unauthorized)?;

    gate.authorize(&claims, is_mutating(request.method())).await?;
    Ok(next.run(request).await)
}
