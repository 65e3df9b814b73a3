use hotel_marketplace_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        contact::SendMessageRequest,
        hotels::{CreateHotelRequest, RoomTypeInput},
        reservations::{CreateReservationRequest, UpdateReservationRequest},
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{HotelStatus, ReservationStatus},
    routes::params::{HotelListQuery, Pagination},
    services::{admin_service, auth_service, contact_service, hotel_service, reservation_service},
    state::AppState,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use uuid::Uuid;

// Integration flow: owner lists a hotel -> admin approves -> guest books,
// edits and cancels -> owner deletes the hotel -> admin moderates users.
#[tokio::test]
async fn listing_booking_and_moderation_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Register the three roles through the real signup path.
    let owner = register(&state, "owner@example.com", "Owner").await?;
    let guest = register(&state, "guest@example.com", "Guest").await?;
    let admin = register(&state, "admin@example.com", "Admin").await?;
    make_admin(&state, admin.user_id).await?;

    // Both login failure modes must be indistinguishable to the caller.
    let unknown_email = auth_service::login_user(
        &state,
        LoginRequest {
            email: "nobody@example.com".into(),
            password: "whatever1".into(),
        },
    )
    .await
    .unwrap_err();
    let wrong_password = auth_service::login_user(
        &state,
        LoginRequest {
            email: "guest@example.com".into(),
            password: "not-the-password".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(unknown_email, AppError::Unauthorized(_)));
    assert!(matches!(wrong_password, AppError::Unauthorized(_)));
    assert_eq!(unknown_email.to_string(), wrong_password.to_string());

    // Owner submits a listing; a bad room type rolls the whole thing back.
    let bad = hotel_service::create_hotel(
        &state,
        &owner,
        CreateHotelRequest {
            name: "Broken Hotel".into(),
            location: None,
            description: None,
            image: None,
            amenities: None,
            room_types: vec![room_type_input("", 10000, 3)],
        },
    )
    .await;
    assert!(matches!(bad, Err(AppError::Validation(_))));

    let created = hotel_service::create_hotel(
        &state,
        &owner,
        CreateHotelRequest {
            name: "Hotel Aurora".into(),
            location: Some("Porto Alegre, RS".into()),
            description: Some("City-center rooms".into()),
            image: None,
            amenities: Some(vec!["wifi".into(), "breakfast".into()]),
            room_types: vec![room_type_input("Standard", 10000, 3)],
        },
    )
    .await?;
    let detail = created.data.unwrap();
    let hotel_id = detail.hotel.id;
    let room_type_id = detail.room_types[0].id;
    assert_eq!(detail.hotel.status, HotelStatus::Pending);

    // Pending listings are invisible to the public catalog.
    let public = hotel_service::list_public_hotels(&state, default_page()).await?;
    assert!(public.data.unwrap().items.is_empty());

    // Guests cannot book an unapproved hotel.
    let premature = reservation_service::create_reservation(
        &state,
        &guest,
        booking(hotel_id, room_type_id, "2026-09-10", "2026-09-12", 1),
    )
    .await;
    assert!(matches!(premature, Err(AppError::Validation(_))));

    // Moderation is admin-only.
    let denied = admin_service::approve_hotel(&state, &guest, hotel_id).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let pending = admin_service::list_pending_hotels(&state, &admin).await?;
    assert_eq!(pending.data.unwrap().items.len(), 1);

    admin_service::approve_hotel(&state, &admin, hotel_id).await?;

    let public = hotel_service::list_public_hotels(&state, default_page()).await?;
    let items = public.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].hotel.status, HotelStatus::Approved);

    // Guest books one room for two nights at 10000 per night.
    let booked = reservation_service::create_reservation(
        &state,
        &guest,
        booking(hotel_id, room_type_id, "2026-09-10", "2026-09-12", 1),
    )
    .await?;
    let reservation = booked.data.unwrap().reservation;
    assert_eq!(reservation.total_amount, 20000);
    assert_eq!(reservation.status, ReservationStatus::Active);
    assert_eq!(available_units(&state, room_type_id).await?, 2);

    // Overbooking is rejected and leaves inventory untouched.
    let overbooked = reservation_service::create_reservation(
        &state,
        &guest,
        booking(hotel_id, room_type_id, "2026-09-10", "2026-09-12", 5),
    )
    .await;
    assert!(matches!(overbooked, Err(AppError::Capacity(_))));
    assert_eq!(available_units(&state, room_type_id).await?, 2);

    // Stretching the stay to three nights recomputes the total.
    let updated = reservation_service::update_reservation(
        &state,
        &guest,
        reservation.id,
        UpdateReservationRequest {
            check_in: None,
            check_out: Some(date("2026-09-13")),
            room_count: None,
            guest_count: None,
            notes: None,
            guest_name: None,
            guest_email: None,
            guest_phone: None,
        },
    )
    .await?;
    assert_eq!(updated.data.unwrap().reservation.total_amount, 30000);

    // Cancel restores the units and hides the row from the guest's list.
    reservation_service::cancel_reservation(&state, &guest, reservation.id).await?;
    assert_eq!(available_units(&state, room_type_id).await?, 3);
    let mine = reservation_service::list_my_reservations(&state, &guest).await?;
    assert!(mine.data.unwrap().items.is_empty());

    // Canceling again must not restore the units a second time.
    reservation_service::cancel_reservation(&state, &guest, reservation.id).await?;
    assert_eq!(available_units(&state, room_type_id).await?, 3);

    // Book again, then have the owner delete the hotel out from under it.
    let rebooked = reservation_service::create_reservation(
        &state,
        &guest,
        booking(hotel_id, room_type_id, "2026-10-01", "2026-10-03", 2),
    )
    .await?;
    let rebooked = rebooked.data.unwrap().reservation;
    assert_eq!(rebooked.total_amount, 40000);

    // The guest raises a question tied to that booking.
    contact_service::send_message(
        &state,
        &guest,
        SendMessageRequest {
            reservation_id: Some(rebooked.id),
            subject: "Early check-in".into(),
            body: "Can we arrive before noon?".into(),
        },
    )
    .await?;

    hotel_service::delete_hotel(&state, &owner, hotel_id).await?;

    // The booking survives as a soft-canceled row carrying the hotel name.
    let mine = reservation_service::list_my_reservations(&state, &guest).await?;
    let items = mine.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].reservation.status,
        ReservationStatus::CanceledHotelRemoved
    );
    assert_eq!(
        items[0].reservation.hotel_name_backup.as_deref(),
        Some("Hotel Aurora")
    );
    assert_eq!(items[0].hotel_name, "Hotel Aurora");

    // Message listing falls back to the snapshot name as well.
    let messages = contact_service::list_my_messages(&state, &guest).await?;
    let messages = messages.data.unwrap().items;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].hotel_name.as_deref(), Some("Hotel Aurora"));

    // A second listing exercises the rejection path.
    let second = hotel_service::create_hotel(
        &state,
        &owner,
        CreateHotelRequest {
            name: "Hotel Borealis".into(),
            location: None,
            description: None,
            image: None,
            amenities: None,
            room_types: vec![room_type_input("Suite", 30000, 2)],
        },
    )
    .await?;
    let second_id = second.data.unwrap().hotel.id;
    admin_service::reprove_hotel(&state, &admin, second_id).await?;
    let rejected = hotel_service::get_hotel(&state, second_id).await?;
    assert_eq!(rejected.data.unwrap().hotel.status, HotelStatus::Rejected);

    let filtered = admin_service::list_all_hotels(
        &state,
        &admin,
        HotelListQuery {
            page: None,
            per_page: None,
            status: Some("rejected".into()),
        },
    )
    .await?;
    assert_eq!(filtered.data.unwrap().items.len(), 1);

    // Admins cannot demote or delete themselves.
    let self_demote = admin_service::demote_user(&state, &admin, admin.user_id).await;
    assert!(matches!(self_demote, Err(AppError::Forbidden)));
    let self_delete = admin_service::delete_user(&state, &admin, admin.user_id).await;
    assert!(matches!(self_delete, Err(AppError::Forbidden)));

    // Promotion takes effect on the promoted user's next request.
    admin_service::promote_user(&state, &admin, owner.user_id).await?;
    admin_service::list_pending_hotels(&state, &owner).await?;
    admin_service::demote_user(&state, &admin, owner.user_id).await?;
    let demoted = admin_service::list_pending_hotels(&state, &owner).await;
    assert!(matches!(demoted, Err(AppError::Forbidden)));

    let stats = admin_service::dashboard_stats(&state, &admin).await?;
    let stats = stats.data.unwrap();
    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.total_hotels, 1);
    assert_eq!(stats.approved_hotels, 0);
    assert_eq!(stats.pending_hotels, 0);
    assert_eq!(stats.total_reservations, 2);
    assert_eq!(stats.active_reservations, 0);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE contact_messages, reservations, room_types, hotels, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn register(state: &AppState, email: &str, name: &str) -> anyhow::Result<AuthUser> {
    let resp = auth_service::register_user(
        state,
        RegisterRequest {
            email: email.into(),
            password: "secret123".into(),
            name: Some(name.into()),
            phone: None,
            address: None,
        },
    )
    .await?;
    let user = resp.data.unwrap().user;
    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
    })
}

async fn make_admin(state: &AppState, user_id: Uuid) -> anyhow::Result<()> {
    let record = hotel_marketplace_api::entity::Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .expect("user exists");
    let mut active: hotel_marketplace_api::entity::users::ActiveModel = record.into();
    active.is_admin = Set(true);
    active.update(&state.orm).await?;
    Ok(())
}

async fn available_units(state: &AppState, room_type_id: Uuid) -> anyhow::Result<i32> {
    let room_type = hotel_marketplace_api::entity::RoomTypes::find_by_id(room_type_id)
        .one(&state.orm)
        .await?
        .expect("room type exists");
    Ok(room_type.available_units)
}

fn room_type_input(name: &str, nightly_price: i64, available_units: i32) -> RoomTypeInput {
    RoomTypeInput {
        id: None,
        name: name.into(),
        description: None,
        nightly_price,
        max_occupancy: Some(2),
        available_units: Some(available_units),
    }
}

fn booking(
    hotel_id: Uuid,
    room_type_id: Uuid,
    check_in: &str,
    check_out: &str,
    room_count: i32,
) -> CreateReservationRequest {
    CreateReservationRequest {
        hotel_id,
        room_type_id,
        check_in: date(check_in),
        check_out: date(check_out),
        room_count: Some(room_count),
        guest_count: Some(2),
        notes: None,
        guest_name: "Guest Example".into(),
        guest_email: "guest@example.com".into(),
        guest_phone: None,
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn default_page() -> Pagination {
    Pagination {
        page: None,
        per_page: None,
    }
}
