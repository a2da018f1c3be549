// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Lotkeeper parking system.
//!
//! This crate sits between the HTTP server and persistence. It owns the
//! request/response contract, credential and session-token services, the
//! authorization policy, the booking lifecycle operations, and the error
//! taxonomy the server maps to HTTP statuses.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
pub mod bookings;
mod error;
mod password_policy;
pub mod reports;
mod request_response;
pub mod slots;
pub mod users;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthorizationService, CredentialService, SessionClaims, TokenService,
};
pub use error::{ApiError, AuthError, translate_domain_error};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AdminDashboard, BookingListResponse, CheckOutResponse, CreateBookingRequest,
    CreateBookingResponse, CreateSlotRequest, CreateSlotResponse, DailyBookingCount,
    DashboardResponse, LoginRequest, MessageResponse, MonthlyRevenue, RegisterRequest,
    RegisterResponse, RevenueResponse, SlotListResponse, UpdateUserRequest, UserDashboard,
    UserInfo, UserListResponse,
};
