use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{extract_bearer_token, AuthError, Claims};
use crate::error::ApiError;

/// Scope each protected route requires: (method, route pattern, scope).
/// Routes not listed here are public.
pub const ROUTE_SCOPES: &[(&str, &str, &str)] = &[
    ("GET", "/actors", "get:actors"),
    ("POST", "/actors", "post:actors"),
    ("PATCH", "/actors/:id", "patch:actors"),
    ("DELETE", "/actors/:id", "delete:actors"),
    ("GET", "/movies", "get:movies"),
    ("POST", "/movies", "post:movies"),
    ("PATCH", "/movies/:id", "patch:movies"),
    ("DELETE", "/movies/:id", "delete:movies"),
];

/// Look up the scope required for `method` on the matched route pattern
pub fn required_scope(method: &Method, route: &str) -> Option<&'static str> {
    // HEAD is served by the GET handler, so it needs the same grant
    let method = if *method == Method::HEAD { "GET" } else { method.as_str() };

    ROUTE_SCOPES
        .iter()
        .find(|(m, path, _)| *m == method && *path == route)
        .map(|(_, _, scope)| *scope)
}

/// Authorization interceptor applied to every route.
///
/// Validates the bearer token and checks the route's scope, then makes the
/// decoded `Claims` available to the handler as a request extension.
pub async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let scope = request
        .extensions()
        .get::<MatchedPath>()
        .and_then(|route| required_scope(request.method(), route.as_str()));

    let Some(scope) = scope else {
        return Ok(next.run(request).await);
    };

    let claims = match check_scope(&state, request.headers(), scope).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                "Rejected {} {}: {} ({})",
                request.method(),
                request.uri().path(),
                err.code(),
                err
            );
            return Err(err.into());
        }
    };

    tracing::debug!(
        "Authorized {} for {}",
        scope,
        claims.sub.as_deref().unwrap_or("<no subject>")
    );
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

async fn check_scope(state: &AppState, headers: &HeaderMap, scope: &str) -> Result<Claims, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = state.validator.validate(token).await?;
    claims.require_permission(scope)?;
    Ok(claims)
}
