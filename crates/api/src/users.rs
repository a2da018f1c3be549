// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User directory operations.

use std::str::FromStr;
use tracing::info;

use lotkeeper_domain::{Role, User, validate_email, validate_name};
use lotkeeper_persistence::SqlitePersistence;

use crate::auth::{AuthorizationService, SessionClaims};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{UpdateUserRequest, UserInfo};

/// Fetches a user or fails with `NotFound`.
fn require_user(persistence: &SqlitePersistence, user_id: i64) -> Result<User, ApiError> {
    persistence
        .get_user_by_id(user_id)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        })
}

/// Updates an account profile. Self or admin.
///
/// `name` and `email` are applied when present. A `role` change is
/// applied only when the caller is an admin; for other callers the field
/// is silently ignored rather than rejected.
///
/// # Errors
///
/// Returns `Forbidden` if the caller is neither the account holder nor an
/// admin, `NotFound` if the account does not exist, `Conflict` if the new
/// email is taken.
pub fn update_user(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
    user_id: i64,
    request: &UpdateUserRequest,
) -> Result<UserInfo, ApiError> {
    AuthorizationService::authorize_owner_or_admin(claims, user_id, "update_user")?;
    require_user(persistence, user_id)?;

    if let Some(name) = &request.name {
        validate_name(name).map_err(translate_domain_error)?;
    }
    if let Some(email) = &request.email {
        validate_email(email).map_err(translate_domain_error)?;
    }

    let role: Option<Role> = match &request.role {
        Some(value) if claims.is_admin() => {
            Some(Role::from_str(value).map_err(translate_domain_error)?)
        }
        _ => None,
    };

    persistence.update_user(
        user_id,
        request.name.as_deref(),
        request.email.as_deref(),
        role,
    )?;

    info!(user_id, "User updated");

    let updated: User = require_user(persistence, user_id)?;
    Ok(UserInfo::from(&updated))
}

/// Deletes an account. Admin only, and never the admin's own account.
///
/// # Errors
///
/// Returns `Forbidden` for non-admin callers, `InvalidInput` on
/// self-deletion, `NotFound` if the account does not exist.
pub fn delete_user(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
    user_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(claims, "delete_user")?;

    if claims.sub == user_id {
        return Err(ApiError::InvalidInput {
            field: String::from("user_id"),
            message: String::from("Cannot delete your own account"),
        });
    }

    persistence.delete_user(user_id)?;
    info!(user_id, deleted_by = claims.sub, "User deleted");
    Ok(())
}

/// Lists all accounts, newest first. Admin only.
///
/// # Errors
///
/// Returns `Forbidden` for non-admin callers.
pub fn list_users(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
) -> Result<Vec<UserInfo>, ApiError> {
    AuthorizationService::require_admin(claims, "list_users")?;

    let users: Vec<User> = persistence.list_users()?;
    Ok(users.iter().map(UserInfo::from).collect())
}
