//! Service tests against a real PostgreSQL database.
//!
//! `#[sqlx::test]` creates a fresh database per test and applies `migrations/`.
//! They are ignored by default; run with `DATABASE_URL` set and `cargo test -- --ignored`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::Config,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        booking::{Booking, BookingListQuery, BookingStatus},
        lot::{CreateLotRequest, LotStatus, UpdateLotRequest},
        spot::{CreateSpotRequest, Spot, SpotStatus, UpdateSpotRequest},
        user::Role,
    },
    services::{booking_service, ledger_service, lot_service, spot_service, user_service},
};

fn test_config() -> Config {
    Config::for_tests()
}

/// Fixed "now" well before every booking window used below.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 8, 0, 0).unwrap()
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, hour, minute, 0).unwrap()
}

async fn user(pool: &PgPool, name: &str) -> AuthContext {
    let user = user_service::register(pool, name, "password1")
        .await
        .expect("register");
    AuthContext {
        session_id: Uuid::nil(),
        user_id: user.id,
        username: user.username,
        role: Role::User,
    }
}

async fn lot(pool: &PgPool, name: &str, rate: i64, spot_count: u32) -> (Uuid, Vec<Spot>) {
    let (lot, spots) = lot_service::create_lot(
        pool,
        CreateLotRequest {
            name: name.to_string(),
            address: "1 Main Street".to_string(),
            pin_code: "560001".to_string(),
            hourly_rate_cents: rate,
            spot_count,
            label_prefix: None,
        },
    )
    .await
    .expect("create lot");
    (lot.id, spots)
}

/// A lot holding a single spot labelled `{prefix}-001`.
async fn spot(pool: &PgPool, prefix: &str, rate: i64) -> Uuid {
    let (_, spots) = lot(pool, prefix, rate, 1).await;
    spots[0].id
}

async fn reserve_in_lot(
    pool: &PgPool,
    auth: &AuthContext,
    lot_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Booking, AppError> {
    booking_service::reserve_in_lot(pool, &test_config(), auth.user_id, lot_id, start, end, now())
        .await
}

async fn reserve(
    pool: &PgPool,
    auth: &AuthContext,
    spot_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Booking, AppError> {
    booking_service::reserve(pool, &test_config(), auth.user_id, spot_id, start, end, now()).await
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn reserving_an_overlapping_window_is_rejected(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;
    let spot_id = spot(&pool, "MAL", 200).await;

    let booking = reserve(&pool, &alice, spot_id, at(10, 0), at(12, 30))
        .await
        .unwrap();
    assert_eq!(booking.amount_cents, 600);
    assert_eq!(booking.rate_cents, 200);
    assert_eq!(booking.booking_status().unwrap(), BookingStatus::Active);

    let conflict = reserve(&pool, &bob, spot_id, at(11, 0), at(11, 30)).await;
    assert!(matches!(conflict, Err(AppError::SlotUnavailable)));

    // Back-to-back windows do not overlap, on either side
    reserve(&pool, &bob, spot_id, at(12, 30), at(13, 0))
        .await
        .unwrap();
    reserve(&pool, &bob, spot_id, at(9, 30), at(10, 0))
        .await
        .unwrap();
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn sub_millisecond_window_is_charged_a_full_unit(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let spot_id = spot(&pool, "MAL", 200).await;

    let start = at(10, 0);
    let booking = reserve(&pool, &alice, spot_id, start, start + Duration::microseconds(500))
        .await
        .unwrap();
    assert_eq!(booking.amount_cents, 200);
    assert_eq!(booking.end_time - booking.start_time, Duration::microseconds(500));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn reserve_validates_spot_and_window(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let spot_id = spot(&pool, "MAL", 200).await;

    assert!(matches!(
        reserve(&pool, &alice, Uuid::new_v4(), at(10, 0), at(11, 0)).await,
        Err(AppError::SlotNotFound)
    ));
    assert!(matches!(
        reserve(&pool, &alice, spot_id, at(11, 0), at(10, 0)).await,
        Err(AppError::InvalidWindow(_))
    ));
    assert!(matches!(
        reserve(&pool, &alice, spot_id, at(7, 0), at(9, 0)).await,
        Err(AppError::InvalidWindow(_))
    ));

    spot_service::update_spot(
        &pool,
        spot_id,
        UpdateSpotRequest {
            status: Some(SpotStatus::Disabled),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(matches!(
        reserve(&pool, &alice, spot_id, at(10, 0), at(11, 0)).await,
        Err(AppError::SlotUnavailable)
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_reservations_admit_exactly_one(pool: PgPool) {
    let spot_id = spot(&pool, "MAL", 200).await;
    let mut users = Vec::new();
    for i in 0..8 {
        users.push(user(&pool, &format!("user{i}")).await);
    }

    let mut handles = Vec::new();
    for auth in users {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            reserve(&pool, &auth, spot_id, at(10, 0), at(12, 0)).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::SlotUnavailable) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(successes, 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn release_is_not_repeatable(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let spot_id = spot(&pool, "MAL", 200).await;
    let booking = reserve(&pool, &alice, spot_id, at(10, 0), at(11, 0))
        .await
        .unwrap();

    let released = booking_service::release(&pool, &alice, booking.id)
        .await
        .unwrap();
    assert_eq!(released.booking_status().unwrap(), BookingStatus::Completed);
    assert!(released.released_at.is_some());
    assert_eq!(released.amount_cents, booking.amount_cents);

    assert!(matches!(
        booking_service::release(&pool, &alice, booking.id).await,
        Err(AppError::AlreadyCompleted)
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn other_users_cannot_see_or_release_a_booking(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;
    let spot_id = spot(&pool, "MAL", 200).await;
    let booking = reserve(&pool, &alice, spot_id, at(10, 0), at(11, 0))
        .await
        .unwrap();

    assert!(matches!(
        booking_service::get_booking(&pool, &bob, booking.id).await,
        Err(AppError::BookingNotFound)
    ));
    assert!(matches!(
        booking_service::release(&pool, &bob, booking.id).await,
        Err(AppError::BookingNotFound)
    ));

    let admin = AuthContext {
        role: Role::Admin,
        ..bob
    };
    booking_service::release(&pool, &admin, booking.id)
        .await
        .unwrap();
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn cancelling_frees_the_window(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;
    let spot_id = spot(&pool, "MAL", 200).await;
    let booking = reserve(&pool, &alice, spot_id, at(10, 0), at(11, 0))
        .await
        .unwrap();

    booking_service::cancel(&pool, &alice, booking.id)
        .await
        .unwrap();
    assert!(matches!(
        booking_service::release(&pool, &alice, booking.id).await,
        Err(AppError::InvalidRequest(_))
    ));

    reserve(&pool, &bob, spot_id, at(10, 0), at(11, 0))
        .await
        .unwrap();
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn rate_changes_do_not_affect_existing_bookings(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let spot_id = spot(&pool, "MAL", 200).await;
    let first = reserve(&pool, &alice, spot_id, at(10, 0), at(11, 0))
        .await
        .unwrap();

    spot_service::update_spot(
        &pool,
        spot_id,
        UpdateSpotRequest {
            hourly_rate_cents: Some(500),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let second = reserve(&pool, &alice, spot_id, at(12, 0), at(13, 0))
        .await
        .unwrap();
    let first = booking_service::get_booking(&pool, &alice, first.id)
        .await
        .unwrap();

    assert_eq!(first.amount_cents, 200);
    assert_eq!(second.amount_cents, 500);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn revenue_counts_completed_and_optionally_active(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let a = spot(&pool, "A", 200).await;
    let b = spot(&pool, "B", 300).await;

    let done = reserve(&pool, &alice, a, at(10, 0), at(12, 30)).await.unwrap();
    booking_service::release(&pool, &alice, done.id).await.unwrap();
    let cancelled = reserve(&pool, &alice, a, at(13, 0), at(14, 0)).await.unwrap();
    booking_service::cancel(&pool, &alice, cancelled.id).await.unwrap();
    reserve(&pool, &alice, b, at(10, 0), at(11, 0)).await.unwrap();

    let report = ledger_service::revenue_report(&pool, &test_config())
        .await
        .unwrap();
    assert_eq!(report.total_revenue_cents, 600);
    assert_eq!(report.by_lot.len(), 1);
    assert_eq!(report.by_lot[0].name, "A");
    assert_eq!(report.by_spot.len(), 1);
    assert_eq!(report.by_spot[0].label, "A-001");
    assert_eq!(report.by_spot[0].booking_count, 1);

    let with_active = Config {
        revenue_includes_active: true,
        ..test_config()
    };
    let report = ledger_service::revenue_report(&pool, &with_active)
        .await
        .unwrap();
    assert_eq!(report.total_revenue_cents, 900);
    assert_eq!(report.by_spot[0].label, "A-001");
    assert_eq!(report.by_spot[1].revenue_cents, 300);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn history_is_newest_first_and_per_user(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;
    let spot_id = spot(&pool, "MAL", 200).await;

    let early = reserve(&pool, &alice, spot_id, at(9, 0), at(10, 0)).await.unwrap();
    let late = reserve(&pool, &alice, spot_id, at(15, 0), at(16, 0)).await.unwrap();
    reserve(&pool, &bob, spot_id, at(12, 0), at(13, 0)).await.unwrap();

    let history = ledger_service::history(&pool, alice.user_id).await.unwrap();
    let ids: Vec<Uuid> = history.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![late.id, early.id]);

    let active_only = ledger_service::all_bookings(
        &pool,
        &BookingListQuery {
            status: Some(BookingStatus::Active),
            limit: Some(2),
        },
    )
    .await
    .unwrap();
    assert_eq!(active_only.len(), 2);
    assert_eq!(active_only[0].id, late.id);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn availability_is_derived_from_active_bookings(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let (lot_id, spots) = lot(&pool, "Mall Road", 200, 3).await;
    assert_eq!(spots[2].label, "MAL-003");

    reserve(&pool, &alice, spots[0].id, at(10, 0), at(12, 0)).await.unwrap();
    spot_service::update_spot(
        &pool,
        spots[1].id,
        UpdateSpotRequest {
            status: Some(SpotStatus::Disabled),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let window = crate::models::booking::BookingWindow::new(
        at(11, 0),
        at(11, 30),
        now(),
        Duration::hours(24),
    )
    .unwrap();
    let free = spot_service::available_spots(&pool, Some(lot_id), &window, now())
        .await
        .unwrap();
    let labels: Vec<&str> = free.iter().map(|s| s.spot.label.as_str()).collect();
    assert_eq!(labels, vec!["MAL-003"]);

    // At 11:00 the first spot is occupied
    let listing = spot_service::list_spots(&pool, None, at(11, 0)).await.unwrap();
    assert!(listing[0].occupied);
    assert!(!listing[2].occupied);

    let summary = ledger_service::summary(&pool, at(11, 0)).await.unwrap();
    assert_eq!(summary.total_lots, 1);
    assert_eq!(summary.total_spots, 3);
    assert_eq!(summary.disabled_spots, 1);
    assert_eq!(summary.occupied_spots, 1);
    assert_eq!(summary.available_spots, 1);
    assert_eq!(summary.registered_users, 1);
    assert_eq!(summary.active_bookings, 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn login_issues_a_token_that_authenticates(pool: PgPool) {
    let config = test_config();
    user_service::register(&pool, "alice", "password1").await.unwrap();

    assert!(matches!(
        user_service::register(&pool, "alice", "password2").await,
        Err(AppError::UsernameTaken)
    ));
    assert!(matches!(
        user_service::login(&pool, &config, "alice", "wrong-password").await,
        Err(AppError::AuthFailure)
    ));

    let login = user_service::login(&pool, &config, "alice", "password1")
        .await
        .unwrap();
    assert!(login.expires_at > Utc::now());

    let auth = user_service::authenticate(&pool, &login.token).await.unwrap();
    assert_eq!(auth.username, "alice");
    assert_eq!(auth.role, Role::User);

    user_service::logout(&pool, &auth).await.unwrap();
    assert!(matches!(
        user_service::authenticate(&pool, &login.token).await,
        Err(AppError::AuthFailure)
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn bootstrap_admin_is_created_once(pool: PgPool) {
    let config = Config {
        admin_username: Some("admin".to_string()),
        admin_password: Some("admin123".to_string()),
        ..test_config()
    };

    user_service::ensure_admin(&pool, &config).await.unwrap();
    user_service::ensure_admin(&pool, &config).await.unwrap();

    let login = user_service::login(&pool, &config, "admin", "admin123")
        .await
        .unwrap();
    assert_eq!(login.user.role, Role::Admin);

    // Admins are not listed as registered users
    assert!(user_service::list_users(&pool).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn lot_booking_takes_the_first_free_spot(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;
    let (lot_id, spots) = lot(&pool, "Mall Road", 200, 3).await;

    // MAL-001 is taken for the window, MAL-002 is out of service
    reserve(&pool, &alice, spots[0].id, at(10, 0), at(12, 0)).await.unwrap();
    spot_service::update_spot(
        &pool,
        spots[1].id,
        UpdateSpotRequest {
            status: Some(SpotStatus::Disabled),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let booking = reserve_in_lot(&pool, &bob, lot_id, at(11, 0), at(12, 0)).await.unwrap();
    assert_eq!(booking.spot_id, spots[2].id);
    assert_eq!(booking.amount_cents, 200);

    assert!(matches!(
        reserve_in_lot(&pool, &bob, lot_id, at(11, 30), at(13, 0)).await,
        Err(AppError::SlotUnavailable)
    ));

    // Once MAL-001's window has passed it is first in line again
    let later = reserve_in_lot(&pool, &bob, lot_id, at(12, 0), at(13, 0)).await.unwrap();
    assert_eq!(later.spot_id, spots[0].id);

    assert!(matches!(
        reserve_in_lot(&pool, &bob, Uuid::new_v4(), at(10, 0), at(11, 0)).await,
        Err(AppError::LotNotFound)
    ));
    assert!(matches!(
        reserve_in_lot(&pool, &bob, lot_id, at(11, 0), at(10, 0)).await,
        Err(AppError::InvalidWindow(_))
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_lot_bookings_fill_distinct_spots(pool: PgPool) {
    let (lot_id, _) = lot(&pool, "Mall Road", 200, 3).await;
    let mut users = Vec::new();
    for i in 0..6 {
        users.push(user(&pool, &format!("user{i}")).await);
    }

    let mut handles = Vec::new();
    for auth in users {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            reserve_in_lot(&pool, &auth, lot_id, at(10, 0), at(11, 0)).await
        }));
    }

    let mut assigned = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(booking) => assigned.push(booking.spot_id),
            Err(AppError::SlotUnavailable) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assigned.sort();
    assigned.dedup();
    assert_eq!(assigned.len(), 3);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn lot_cannot_be_disabled_while_bookings_are_active(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let (lot_id, spots) = lot(&pool, "Mall Road", 200, 2).await;
    let booking = reserve(&pool, &alice, spots[0].id, at(10, 0), at(11, 0)).await.unwrap();

    assert!(matches!(
        lot_service::disable_lot(&pool, lot_id).await,
        Err(AppError::LotInUse(1))
    ));
    assert!(matches!(
        lot_service::update_lot(
            &pool,
            lot_id,
            UpdateLotRequest {
                status: Some(LotStatus::Disabled),
                ..Default::default()
            },
        )
        .await,
        Err(AppError::LotInUse(1))
    ));

    booking_service::release(&pool, &alice, booking.id).await.unwrap();
    let disabled = lot_service::disable_lot(&pool, lot_id).await.unwrap();
    assert_eq!(disabled.status, "disabled");

    // Spots of a disabled lot are out of service without their own status changing
    assert!(matches!(
        reserve(&pool, &alice, spots[1].id, at(12, 0), at(13, 0)).await,
        Err(AppError::SlotUnavailable)
    ));
    assert!(matches!(
        reserve_in_lot(&pool, &alice, lot_id, at(12, 0), at(13, 0)).await,
        Err(AppError::SlotUnavailable)
    ));
    let listing = spot_service::list_spots(&pool, Some(lot_id), now()).await.unwrap();
    assert!(listing.iter().all(|s| s.spot.status == "disabled"));

    let overview = lot_service::get_lot(&pool, lot_id, now()).await.unwrap();
    assert_eq!(overview.total_spots, 2);
    assert_eq!(overview.available_spots, 0);

    assert!(matches!(
        lot_service::disable_lot(&pool, Uuid::new_v4()).await,
        Err(AppError::LotNotFound)
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn lot_rate_change_reaches_spots_but_not_bookings(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let (lot_id, spots) = lot(&pool, "Mall Road", 200, 1).await;
    let first = reserve(&pool, &alice, spots[0].id, at(10, 0), at(11, 0)).await.unwrap();

    let updated = lot_service::update_lot(
        &pool,
        lot_id,
        UpdateLotRequest {
            name: Some("  Mall Road East ".to_string()),
            hourly_rate_cents: Some(300),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Mall Road East");

    let second = reserve(&pool, &alice, spots[0].id, at(12, 0), at(13, 0)).await.unwrap();
    assert_eq!(second.amount_cents, 300);
    let first = booking_service::get_booking(&pool, &alice, first.id).await.unwrap();
    assert_eq!(first.amount_cents, 200);

    // New spots default to the lot's rate; labels are unique per lot only
    let added = spot_service::create_spot(
        &pool,
        lot_id,
        CreateSpotRequest {
            label: "MAL-002".to_string(),
            hourly_rate_cents: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(added.hourly_rate_cents, 300);

    assert!(matches!(
        spot_service::create_spot(
            &pool,
            lot_id,
            CreateSpotRequest {
                label: "MAL-002".to_string(),
                hourly_rate_cents: Some(100),
            },
        )
        .await,
        Err(AppError::InvalidRequest(_))
    ));
    let (other_lot, _) = lot(&pool, "Malibu", 100, 1).await;
    let twin = spot_service::create_spot(
        &pool,
        other_lot,
        CreateSpotRequest {
            label: "MAL-002".to_string(),
            hourly_rate_cents: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(twin.hourly_rate_cents, 100);

    assert!(matches!(
        spot_service::create_spot(
            &pool,
            Uuid::new_v4(),
            CreateSpotRequest {
                label: "X-1".to_string(),
                hourly_rate_cents: None,
            },
        )
        .await,
        Err(AppError::LotNotFound)
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn revenue_is_broken_down_per_lot(pool: PgPool) {
    let alice = user(&pool, "alice").await;
    let (mall, mall_spots) = lot(&pool, "Mall Road", 200, 2).await;
    let (_, park_spots) = lot(&pool, "Park Street", 100, 1).await;

    for (spot_id, hour) in [(mall_spots[0].id, 10), (mall_spots[1].id, 10), (park_spots[0].id, 10)] {
        let booking = reserve(&pool, &alice, spot_id, at(hour, 0), at(hour + 1, 0)).await.unwrap();
        booking_service::release(&pool, &alice, booking.id).await.unwrap();
    }

    let report = ledger_service::revenue_report(&pool, &test_config()).await.unwrap();
    assert_eq!(report.total_revenue_cents, 500);
    assert_eq!(report.by_lot.len(), 2);
    assert_eq!(report.by_lot[0].lot_id, mall);
    assert_eq!(report.by_lot[0].booking_count, 2);
    assert_eq!(report.by_lot[0].revenue_cents, 400);
    assert_eq!(report.by_lot[1].name, "Park Street");
    assert_eq!(report.by_spot.len(), 3);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn lot_creation_validates_input(pool: PgPool) {
    let request = |name: &str, count: u32, prefix: Option<&str>| CreateLotRequest {
        name: name.to_string(),
        address: "1 Main Street".to_string(),
        pin_code: "560001".to_string(),
        hourly_rate_cents: 200,
        spot_count: count,
        label_prefix: prefix.map(str::to_string),
    };

    assert!(matches!(
        lot_service::create_lot(&pool, request("Mall Road", 0, None)).await,
        Err(AppError::InvalidRequest(_))
    ));
    assert!(matches!(
        lot_service::create_lot(&pool, request("  ", 1, None)).await,
        Err(AppError::InvalidRequest(_))
    ));
    let long_prefix = "P".repeat(48);
    assert!(matches!(
        lot_service::create_lot(&pool, request("Mall Road", 1, Some(long_prefix.as_str()))).await,
        Err(AppError::InvalidRequest(_))
    ));

    let (_, spots) = lot_service::create_lot(&pool, request("Mall Road", 2, Some("vip")))
        .await
        .unwrap();
    assert_eq!(spots[1].label, "VIP-002");

    let lots = lot_service::list_lots(&pool, now()).await.unwrap();
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].total_spots, 2);
    assert_eq!(lots[0].available_spots, 2);
}
