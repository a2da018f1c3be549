// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot registry operations.

use std::str::FromStr;
use time::OffsetDateTime;
use tracing::info;

use lotkeeper_domain::{
    ParkingSlot, SlotStatus, SlotType, format_timestamp, validate_hourly_rate,
    validate_slot_number,
};
use lotkeeper_persistence::SqlitePersistence;

use crate::auth::{AuthorizationService, SessionClaims};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{CreateSlotRequest, CreateSlotResponse};

/// Creates a new parking slot. Admin only.
///
/// The initial status defaults to `available` when not supplied.
///
/// # Errors
///
/// Returns `Forbidden` for non-admin callers, `Conflict` on a duplicate
/// slot number, `InvalidInput` on a bad field.
pub fn create_slot(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
    request: &CreateSlotRequest,
    now: OffsetDateTime,
) -> Result<CreateSlotResponse, ApiError> {
    AuthorizationService::require_admin(claims, "create_slot")?;

    validate_slot_number(&request.slot_number).map_err(translate_domain_error)?;
    validate_hourly_rate(request.hourly_rate).map_err(translate_domain_error)?;

    let slot_type: SlotType =
        SlotType::from_str(&request.slot_type).map_err(translate_domain_error)?;
    let status: SlotStatus = match request.status.as_deref() {
        Some(value) => SlotStatus::from_str(value).map_err(translate_domain_error)?,
        None => SlotStatus::Available,
    };

    if persistence.slot_number_exists(&request.slot_number)? {
        return Err(ApiError::Conflict {
            message: format!("Slot number '{}' already exists", request.slot_number),
        });
    }

    let created_at: String = format_timestamp(now).map_err(translate_domain_error)?;
    let slot_id: i64 = persistence.create_slot(
        &request.slot_number,
        slot_type,
        &request.floor,
        &request.section,
        request.hourly_rate,
        status,
        &created_at,
        claims.sub,
    )?;

    info!(slot_id, slot_number = %request.slot_number, "Slot created");

    Ok(CreateSlotResponse {
        message: String::from("Slot created"),
        slot_id,
    })
}

/// Lists slots currently open for booking.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_available(persistence: &SqlitePersistence) -> Result<Vec<ParkingSlot>, ApiError> {
    Ok(persistence.list_slots_by_status(SlotStatus::Available)?)
}

/// Lists every slot regardless of status.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_all(persistence: &SqlitePersistence) -> Result<Vec<ParkingSlot>, ApiError> {
    Ok(persistence.list_all_slots()?)
}
