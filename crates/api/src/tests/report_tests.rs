// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard and revenue report tests.

use super::helpers::{
    create_admin, create_booking, create_slot, create_test_persistence, create_user, test_now,
};
use crate::error::ApiError;
use crate::reports;
use crate::request_response::DashboardResponse;
use crate::bookings;

#[test]
fn test_admin_dashboard_aggregates() {
    let persistence = create_test_persistence();
    let admin = create_admin(&persistence);
    let user = create_user(&persistence, "driver@example.com");
    let slot_a = create_slot(&persistence, &admin, "A-101");
    create_slot(&persistence, &admin, "A-102");
    create_booking(&persistence, &user, slot_a);

    let response = reports::dashboard(&persistence, &admin, test_now())
        .expect("Dashboard should succeed");

    let DashboardResponse::Admin(dashboard) = response else {
        panic!("Admin caller should get the admin dashboard");
    };

    assert_eq!(dashboard.total_slots, 2);
    assert_eq!(dashboard.available_slots, 1);
    assert_eq!(dashboard.total_users, 2);
    assert_eq!(dashboard.total_bookings, 1);
    // One 3-hour booking at 5.0/hour, quoted
    assert!((dashboard.total_revenue - 15.0).abs() < f64::EPSILON);
    assert_eq!(dashboard.recent_bookings.len(), 1);
}

#[test]
fn test_trailing_week_series_buckets_by_day() {
    let persistence = create_test_persistence();
    let admin = create_admin(&persistence);
    let user = create_user(&persistence, "driver@example.com");
    let slot_id = create_slot(&persistence, &admin, "A-101");
    create_booking(&persistence, &user, slot_id);

    let response = reports::dashboard(&persistence, &admin, test_now())
        .expect("Dashboard should succeed");
    let DashboardResponse::Admin(dashboard) = response else {
        panic!("Admin caller should get the admin dashboard");
    };

    assert_eq!(dashboard.bookings_last_7_days.len(), 7);
    // Oldest first; the booking was created "today"
    assert_eq!(dashboard.bookings_last_7_days[6].date, "2026-03-01");
    assert_eq!(dashboard.bookings_last_7_days[6].count, 1);
    assert_eq!(dashboard.bookings_last_7_days[0].date, "2026-02-23");
    assert!(
        dashboard.bookings_last_7_days[..6]
            .iter()
            .all(|day| day.count == 0)
    );
}

#[test]
fn test_user_dashboard_is_scoped_to_caller() {
    let persistence = create_test_persistence();
    let admin = create_admin(&persistence);
    let first = create_user(&persistence, "first@example.com");
    let second = create_user(&persistence, "second@example.com");
    let slot_a = create_slot(&persistence, &admin, "A-101");
    let slot_b = create_slot(&persistence, &admin, "A-102");
    create_booking(&persistence, &first, slot_a);
    create_booking(&persistence, &second, slot_b);

    let response = reports::dashboard(&persistence, &first, test_now())
        .expect("Dashboard should succeed");

    let DashboardResponse::User(dashboard) = response else {
        panic!("Regular caller should get the user dashboard");
    };

    assert_eq!(dashboard.my_bookings, 1);
    assert_eq!(dashboard.recent_bookings.len(), 1);
    assert_eq!(dashboard.recent_bookings[0].user_id, first.sub);
}

#[test]
fn test_revenue_report_requires_admin() {
    let persistence = create_test_persistence();
    create_admin(&persistence);
    let user = create_user(&persistence, "driver@example.com");

    let result = reports::revenue(&persistence, &user, test_now());

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_revenue_buckets_by_creation_month() {
    let persistence = create_test_persistence();
    let admin = create_admin(&persistence);
    let user = create_user(&persistence, "driver@example.com");
    let slot_a = create_slot(&persistence, &admin, "A-101");
    let slot_b = create_slot(&persistence, &admin, "A-102");
    create_booking(&persistence, &user, slot_a);
    create_booking(&persistence, &user, slot_b);

    let response =
        reports::revenue(&persistence, &admin, test_now()).expect("Revenue should succeed");

    assert!((response.total_revenue - 30.0).abs() < f64::EPSILON);
    assert_eq!(response.monthly_revenue.len(), 12);
    assert_eq!(response.monthly_revenue[0].month, "2026-01");

    // Both bookings were created in March
    let march = &response.monthly_revenue[2];
    assert_eq!(march.month, "2026-03");
    assert!((march.revenue - 30.0).abs() < f64::EPSILON);
    assert!(
        response
            .monthly_revenue
            .iter()
            .filter(|bucket| bucket.month != "2026-03")
            .all(|bucket| bucket.revenue.abs() < f64::EPSILON)
    );
}

#[test]
fn test_cancelled_bookings_still_count_toward_revenue() {
    let persistence = create_test_persistence();
    let admin = create_admin(&persistence);
    let user = create_user(&persistence, "driver@example.com");
    let slot_id = create_slot(&persistence, &admin, "A-101");
    let booking_id = create_booking(&persistence, &user, slot_id);
    bookings::cancel_booking(&persistence, &user, booking_id, test_now())
        .expect("Cancel should succeed");

    let response =
        reports::revenue(&persistence, &admin, test_now()).expect("Revenue should succeed");

    // Quoted revenue is recognized at creation, not completion
    assert!((response.total_revenue - 15.0).abs() < f64::EPSILON);
}
