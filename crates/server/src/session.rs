// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! This module provides Axum extractors for validating session tokens at
//! the server boundary. The token travels in the `session` cookie set at
//! login; an `Authorization: Bearer` header is accepted as an equivalent.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use tracing::{debug, warn};

use lotkeeper_api::SessionClaims;

use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Pulls the session token out of the request, cookie first.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(cookie_header) = parts
        .headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
    {
        for cookie in cookie_header.split(';') {
            if let Some(token) = cookie.trim().strip_prefix("session=") {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(ToString::to_string)
}

/// Extractor for authenticated sessions.
///
/// Validates the session token and yields its claims. Handlers using this
/// extractor reject unauthenticated requests with HTTP 401.
pub struct SessionUser(pub SessionClaims);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: String = extract_token(parts).ok_or_else(|| {
            debug!("Request carries no session token");
            SessionError::MissingToken
        })?;

        let claims: SessionClaims = state.tokens.verify(&token).map_err(|e| {
            warn!(error = %e, "Session token validation failed");
            SessionError::InvalidToken(e.to_string())
        })?;

        debug!(user_id = claims.sub, "Session validated");
        Ok(Self(claims))
    }
}

/// Extractor for optionally-authenticated sessions.
///
/// Never rejects: a missing or invalid token yields `None`, letting
/// endpoints such as `/auth/session` degrade to the unauthenticated
/// response instead of erroring.
pub struct OptionalSession(pub Option<SessionClaims>);

impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims: Option<SessionClaims> =
            extract_token(parts).and_then(|token| state.tokens.verify(&token).ok());
        Ok(Self(claims))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// No session cookie or bearer token was supplied.
    MissingToken,
    /// The supplied token failed validation.
    InvalidToken(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingToken => String::from("Authentication required"),
            Self::InvalidToken(reason) => reason,
        };

        (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": true, "message": message })),
        )
            .into_response()
    }
}
