use hotel_marketplace_api::{config::AppConfig, db::create_pool, services::auth_service};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "Admin", true).await?;
    let owner_id = ensure_user(&pool, "owner@example.com", "owner123", "Hotel Owner", false).await?;
    let guest_id = ensure_user(&pool, "guest@example.com", "guest123", "Guest", false).await?;
    seed_hotel(&pool, owner_id).await?;

    println!("Seed completed. Admin: {admin_id}, Owner: {owner_id}, Guest: {guest_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    name: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let password_hash = auth_service::hash_password(password)?;

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, name, is_admin)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET is_admin = EXCLUDED.is_admin
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(is_admin)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (admin={is_admin})");
    Ok(user_id)
}

async fn seed_hotel(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<()> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM hotels WHERE name = $1 AND user_id = $2")
            .bind("Pousada do Mar")
            .bind(owner_id)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        println!("Sample hotel already present");
        return Ok(());
    }

    let hotel_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO hotels (id, user_id, name, description, location, image, amenities, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'approved')
        "#,
    )
    .bind(hotel_id)
    .bind(owner_id)
    .bind("Pousada do Mar")
    .bind("Beachfront guesthouse with a quiet garden")
    .bind("Florianopolis, SC")
    .bind("https://example.com/pousada.jpg")
    .bind(serde_json::json!(["wifi", "breakfast", "pool"]))
    .execute(pool)
    .await?;

    let room_types = [
        ("Standard", "Queen bed, garden view", 25000_i64, 2, 6),
        ("Suite", "King bed, ocean view, balcony", 45000_i64, 3, 3),
    ];
    for (name, desc, price, occupancy, units) in room_types {
        sqlx::query(
            r#"
            INSERT INTO room_types (id, hotel_id, name, description, nightly_price, max_occupancy, available_units)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(hotel_id)
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(occupancy)
        .bind(units)
        .execute(pool)
        .await?;
    }

    println!("Seeded sample hotel with room types");
    Ok(())
}
