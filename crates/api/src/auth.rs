// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Credential, session-token, and authorization services.
//!
//! Sessions are stateless: a signed JWT is the sole session state. There
//! is no server-side session table, so a token remains valid until it
//! expires.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use lotkeeper_domain::{Role, User, format_timestamp, validate_email, validate_name};
use lotkeeper_persistence::{SqlitePersistence, verify_password};

use crate::error::{ApiError, AuthError, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{LoginRequest, RegisterRequest, RegisterResponse, UserInfo};

/// Session lifetime: seven days from issue.
const SESSION_TTL: Duration = Duration::days(7);

/// Claims carried in the session token.
///
/// `sub` is the account id; `email` and `role` are snapshots taken at
/// login and are not refreshed if the account changes before expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The authenticated account id.
    pub sub: i64,
    /// The account email at login time.
    pub email: String,
    /// The account role at login time.
    pub role: Role,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl SessionClaims {
    /// Returns true if the session belongs to an admin account.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Issues and verifies signed session tokens (HS256).
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Creates a token service from a shared signing secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a session token for an authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if token encoding fails.
    pub fn issue(&self, user: &User, now: OffsetDateTime) -> Result<String, ApiError> {
        let claims = SessionClaims {
            sub: user.user_id,
            email: user.email.clone(),
            role: user.role,
            iat: now.unix_timestamp(),
            exp: (now + SESSION_TTL).unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            ApiError::Internal {
                message: format!("Failed to encode session token: {e}"),
            }
        })
    }

    /// Verifies a session token and returns its claims.
    ///
    /// Expiry is checked against the real clock during decoding.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the token is expired,
    /// malformed, or carries an invalid signature.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Session token rejected");
                AuthError::AuthenticationFailed {
                    reason: format!("Invalid session token: {e}"),
                }
            })
    }
}

/// Credential service: registration and login.
pub struct CredentialService;

impl CredentialService {
    /// Registers a new account with role `user`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the email is already registered,
    /// `InvalidInput` if a field or the password fails validation.
    pub fn register(
        persistence: &SqlitePersistence,
        request: &RegisterRequest,
        now: OffsetDateTime,
    ) -> Result<RegisterResponse, ApiError> {
        validate_name(&request.name).map_err(translate_domain_error)?;
        validate_email(&request.email).map_err(translate_domain_error)?;
        PasswordPolicy::default().validate(&request.password, &request.email)?;

        if persistence.get_user_by_email(&request.email)?.is_some() {
            return Err(ApiError::Conflict {
                message: format!("Email '{}' is already registered", request.email),
            });
        }

        let created_at: String = format_timestamp(now).map_err(translate_domain_error)?;
        let user_id: i64 = persistence.create_user(
            &request.name,
            &request.email,
            &request.password,
            Role::User,
            &created_at,
        )?;

        Ok(RegisterResponse {
            message: String::from("Registration successful"),
            user_id,
        })
    }

    /// Authenticates a user and issues a session token.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// response does not reveal which accounts exist.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` on unknown email or hash mismatch.
    pub fn login(
        persistence: &SqlitePersistence,
        tokens: &TokenService,
        request: &LoginRequest,
        now: OffsetDateTime,
    ) -> Result<(String, UserInfo), ApiError> {
        let Some(user) = persistence.get_user_by_email(&request.email)? else {
            warn!(email = %request.email, "Login attempt for unknown email");
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Invalid email or password"),
            });
        };

        if !verify_password(&request.password, &user.password_hash)? {
            warn!(user_id = user.user_id, "Login attempt with wrong password");
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Invalid email or password"),
            });
        }

        let token: String = tokens.issue(&user, now)?;
        Ok((token, UserInfo::from(&user)))
    }
}

/// Authorization policy for the whole API surface.
///
/// Every privileged operation goes through one of these two checks rather
/// than ad-hoc role tests in handlers.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Requires the admin role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if the caller is not an admin.
    pub fn require_admin(claims: &SessionClaims, action: &str) -> Result<(), AuthError> {
        if claims.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                action: action.to_string(),
            })
        }
    }

    /// Requires that the caller owns the record or is an admin.
    ///
    /// This is the single ownership rule for bookings and user profiles.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if the caller is neither the owner
    /// nor an admin.
    pub fn authorize_owner_or_admin(
        claims: &SessionClaims,
        owner_id: i64,
        action: &str,
    ) -> Result<(), AuthError> {
        if claims.sub == owner_id || claims.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                action: action.to_string(),
            })
        }
    }
}
