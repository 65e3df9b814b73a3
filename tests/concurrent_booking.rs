use hotel_marketplace_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::reservations::CreateReservationRequest,
    error::AppError,
    middleware::auth::AuthUser,
    models::HotelStatus,
    services::reservation_service,
    state::AppState,
};
use chrono::NaiveDate;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use uuid::Uuid;

// Six guests race for three units of the same room type; the row lock must
// admit exactly three and never drive the inventory negative.
#[tokio::test]
async fn concurrent_bookings_never_oversell() -> anyhow::Result<()> {
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

    let owner_id = create_user(&state, "owner@example.com").await?;
    let hotel_id = create_approved_hotel(&state, owner_id).await?;
    let room_type_id = create_room_type(&state, hotel_id, 3).await?;

    let mut handles = Vec::new();
    for n in 0..6 {
        let state = state.clone();
        let guest_email = format!("guest{n}@example.com");
        handles.push(tokio::spawn(async move {
            let guest_id = create_user(&state, &guest_email).await?;
            let guest = AuthUser {
                user_id: guest_id,
                email: guest_email.clone(),
            };
            let result = reservation_service::create_reservation(
                &state,
                &guest,
                CreateReservationRequest {
                    hotel_id,
                    room_type_id,
                    check_in: date("2026-11-01"),
                    check_out: date("2026-11-03"),
                    room_count: Some(1),
                    guest_count: Some(1),
                    notes: None,
                    guest_name: "Racing Guest".into(),
                    guest_email,
                    guest_phone: None,
                },
            )
            .await;
            Ok::<_, anyhow::Error>(result)
        }));
    }

    let mut succeeded = 0;
    let mut capacity_errors = 0;
    for handle in handles {
        match handle.await?? {
            Ok(_) => succeeded += 1,
            Err(AppError::Capacity(_)) => capacity_errors += 1,
            Err(err) => panic!("unexpected booking error: {err}"),
        }
    }

    assert_eq!(succeeded, 3);
    assert_eq!(capacity_errors, 3);

    let room_type = hotel_marketplace_api::entity::RoomTypes::find_by_id(room_type_id)
        .one(&state.orm)
        .await?
        .expect("room type exists");
    assert_eq!(room_type.available_units, 0);

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

async fn create_user(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let user = hotel_marketplace_api::entity::users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        name: Set("Test User".into()),
        phone: Set(None),
        address: Set(None),
        is_admin: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(user.id)
}

async fn create_approved_hotel(state: &AppState, owner_id: Uuid) -> anyhow::Result<Uuid> {
    let hotel = hotel_marketplace_api::entity::hotels::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner_id),
        name: Set("Hotel Contention".into()),
        location: Set(None),
        description: Set(None),
        image: Set(None),
        amenities: Set(serde_json::json!([])),
        status: Set(HotelStatus::Approved.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(hotel.id)
}

async fn create_room_type(
    state: &AppState,
    hotel_id: Uuid,
    available_units: i32,
) -> anyhow::Result<Uuid> {
    let room_type = hotel_marketplace_api::entity::room_types::ActiveModel {
        id: Set(Uuid::new_v4()),
        hotel_id: Set(hotel_id),
        name: Set("Standard".into()),
        description: Set(None),
        nightly_price: Set(10000),
        max_occupancy: Set(2),
        available_units: Set(available_units),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(room_type.id)
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}
