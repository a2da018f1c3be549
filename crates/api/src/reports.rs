// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reporting and aggregation. Pure reads, no writes.
//!
//! Revenue figures sum the quoted fee, not the billed `actual_fee`: a
//! reservation is charged for what was reserved. Bookings whose stored
//! timestamps fail to parse are skipped from time-bucketed series rather
//! than failing the whole report.

use time::{Date, Duration, OffsetDateTime};

use lotkeeper_domain::{Booking, SlotStatus, parse_timestamp};
use lotkeeper_persistence::SqlitePersistence;

use crate::auth::{AuthorizationService, SessionClaims};
use crate::error::ApiError;
use crate::request_response::{
    AdminDashboard, DailyBookingCount, DashboardResponse, MonthlyRevenue, RevenueResponse,
    UserDashboard,
};

/// Number of recent bookings surfaced on the dashboard.
const RECENT_BOOKINGS: usize = 5;

/// Formats a calendar date as `YYYY-MM-DD`.
fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Buckets bookings by UTC calendar day over the trailing seven days,
/// today included, oldest first.
#[allow(clippy::cast_possible_wrap)]
fn bookings_last_7_days(bookings: &[Booking], now: OffsetDateTime) -> Vec<DailyBookingCount> {
    let today: Date = now.date();

    (0..7)
        .rev()
        .map(|offset| {
            let day: Date = today.saturating_sub(Duration::days(offset));
            let count: i64 = bookings
                .iter()
                .filter(|booking| {
                    parse_timestamp(&booking.created_at)
                        .map(|created| created.date() == day)
                        .unwrap_or(false)
                })
                .count() as i64;
            DailyBookingCount {
                date: format_date(day),
                count,
            }
        })
        .collect()
}

/// Role-aware dashboard.
///
/// Admins get fleet-wide counts, total quoted revenue, a trailing-7-day
/// booking series, and the five most recent bookings. Other callers get
/// their own booking count and recent bookings.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn dashboard(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
    now: OffsetDateTime,
) -> Result<DashboardResponse, ApiError> {
    if claims.is_admin() {
        let bookings: Vec<Booking> = persistence.list_all_bookings()?;
        let series: Vec<DailyBookingCount> = bookings_last_7_days(&bookings, now);
        let recent: Vec<Booking> = bookings.iter().take(RECENT_BOOKINGS).cloned().collect();

        Ok(DashboardResponse::Admin(AdminDashboard {
            total_slots: persistence.count_slots()?,
            available_slots: persistence.count_slots_by_status(SlotStatus::Available)?,
            total_users: persistence.count_users()?,
            total_bookings: persistence.count_bookings()?,
            total_revenue: persistence.total_revenue()?,
            bookings_last_7_days: series,
            recent_bookings: recent,
        }))
    } else {
        let my_bookings: i64 = persistence.count_bookings_by_user(claims.sub)?;
        let recent: Vec<Booking> = persistence
            .list_bookings_by_user(claims.sub)?
            .into_iter()
            .take(RECENT_BOOKINGS)
            .collect();

        Ok(DashboardResponse::User(UserDashboard {
            my_bookings,
            recent_bookings: recent,
        }))
    }
}

/// Revenue report: total quoted revenue plus twelve monthly buckets for
/// the current year, keyed by booking creation month. Admin only.
///
/// # Errors
///
/// Returns `Forbidden` for non-admin callers, or an error if a query
/// fails.
pub fn revenue(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
    now: OffsetDateTime,
) -> Result<RevenueResponse, ApiError> {
    AuthorizationService::require_admin(claims, "revenue_report")?;

    let year: i32 = now.year();
    let bookings: Vec<Booking> = persistence.list_all_bookings()?;

    let mut buckets: [f64; 12] = [0.0; 12];
    for booking in &bookings {
        if let Ok(created) = parse_timestamp(&booking.created_at) {
            if created.year() == year {
                buckets[usize::from(u8::from(created.month())) - 1] += booking.fee;
            }
        }
    }

    let monthly_revenue: Vec<MonthlyRevenue> = buckets
        .iter()
        .enumerate()
        .map(|(index, total)| MonthlyRevenue {
            month: format!("{year:04}-{:02}", index + 1),
            revenue: *total,
        })
        .collect();

    Ok(RevenueResponse {
        total_revenue: persistence.total_revenue()?,
        monthly_revenue,
    })
}
