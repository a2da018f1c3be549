// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};

use lotkeeper_domain::{Booking, ParkingSlot, Role, User};

/// API request to register a new account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    /// The account holder's display name.
    pub name: String,
    /// The login email (unique).
    pub email: String,
    /// The plaintext password; hashed before storage.
    pub password: String,
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// A success message.
    pub message: String,
    /// The new account id.
    pub user_id: i64,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// The login email.
    pub email: String,
    /// The plaintext password.
    pub password: String,
}

/// Public view of an account, without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at.clone(),
        }
    }
}

/// API request to create a parking slot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateSlotRequest {
    /// The slot number (unique).
    pub slot_number: String,
    /// The slot type string (compact, standard, large, handicapped,
    /// electric).
    pub slot_type: String,
    /// The floor label.
    pub floor: String,
    /// The section label.
    pub section: String,
    /// The hourly rate.
    pub hourly_rate: f64,
    /// Optional initial status; defaults to `available`.
    pub status: Option<String>,
}

/// API response for a successful slot creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSlotResponse {
    /// A success message.
    pub message: String,
    /// The new slot id.
    pub slot_id: i64,
}

/// API response carrying a list of slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotListResponse {
    pub slots: Vec<ParkingSlot>,
}

/// API request to create a booking.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateBookingRequest {
    /// The slot to book.
    pub slot_id: i64,
    /// The planned start time (ISO 8601).
    pub start_time: String,
    /// The planned duration in whole hours (1-8).
    pub duration_hours: i64,
}

/// API response for a successful booking creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    /// A success message.
    pub message: String,
    /// The new booking id.
    pub booking_id: i64,
    /// The quoted fee: `hourly_rate * duration_hours`.
    pub fee: f64,
}

/// API response carrying a list of bookings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
}

/// API response for a successful check-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutResponse {
    /// A success message.
    pub message: String,
    /// Elapsed time rounded up to whole hours.
    pub actual_duration_hours: i64,
    /// The billed fee: `hourly_rate * actual_duration_hours`.
    pub actual_fee: f64,
}

/// Generic success message response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// API request to update an account profile.
///
/// Absent fields are left unchanged. `role` is honored only when the
/// caller is an admin; otherwise it is silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// API response carrying a list of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserInfo>,
}

/// Booking count for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBookingCount {
    /// The day, as `YYYY-MM-DD`.
    pub date: String,
    /// Bookings created that day.
    pub count: i64,
}

/// Admin dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminDashboard {
    pub total_slots: i64,
    pub available_slots: i64,
    pub total_users: i64,
    pub total_bookings: i64,
    /// Sum of quoted fees across all bookings.
    pub total_revenue: f64,
    /// Trailing seven calendar days, oldest first.
    pub bookings_last_7_days: Vec<DailyBookingCount>,
    /// The five most recent bookings.
    pub recent_bookings: Vec<Booking>,
}

/// Per-user dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDashboard {
    /// The caller's total booking count.
    pub my_bookings: i64,
    /// The caller's five most recent bookings.
    pub recent_bookings: Vec<Booking>,
}

/// Dashboard response; the shape depends on the caller's role.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DashboardResponse {
    Admin(AdminDashboard),
    User(UserDashboard),
}

/// Revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// The month, as `YYYY-MM`.
    pub month: String,
    /// Sum of quoted fees for bookings created that month.
    pub revenue: f64,
}

/// Revenue report response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueResponse {
    /// Sum of quoted fees across all bookings.
    pub total_revenue: f64,
    /// Twelve buckets for the current year, January first.
    pub monthly_revenue: Vec<MonthlyRevenue>,
}
