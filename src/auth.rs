//! Middleware that finds the caller's bearer token for the banking API.
//!
//! The token is taken from the `Authorization: Bearer ...` header if present,
//! otherwise from the `token` cookie set by the host application.

use std::fmt;

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    extract::CookieJar,
    headers::{Authorization, authorization::Bearer},
};

use crate::Error;

/// The name of the cookie holding the bearer token.
pub const TOKEN_COOKIE: &str = "token";

/// The caller's token, forwarded to the banking API on every call.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: &str) -> Self {
        Self(token.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep tokens out of the logs.
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(********)")
    }
}

async fn get_token(parts: &mut Parts) -> Option<BearerToken> {
    if let Ok(TypedHeader(Authorization(bearer))) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, &()).await
    {
        let token = bearer.token().trim();

        if !token.is_empty() {
            return Some(BearerToken::new(token));
        }
    }

    let jar = CookieJar::from_headers(&parts.headers);

    jar.get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().trim())
        .filter(|token| !token.is_empty())
        .map(BearerToken::new)
}

#[inline]
async fn token_guard_internal(
    request: Request,
    next: Next,
    get_rejection: impl Fn() -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let token = match get_token(&mut parts).await {
        Some(token) => token,
        None => {
            tracing::debug!("Request to {} has no bearer token", parts.uri.path());
            return get_rejection();
        }
    };

    parts.extensions.insert(token);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

/// Middleware that places the caller's [BearerToken] into the request
/// extensions, or renders the unauthorized error page if there is none.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(token): Extension<BearerToken>` to receive the token.
pub async fn token_guard(request: Request, next: Next) -> Response {
    token_guard_internal(request, next, || Error::MissingToken.into_response()).await
}

/// Like [token_guard], but responds with an alert that HTMX can swap into the
/// page instead of a full error page.
pub async fn token_guard_hx(request: Request, next: Next) -> Response {
    token_guard_internal(request, next, || Error::MissingToken.into_alert_response()).await
}
