use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use seabasket_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user_with_role(&pool, "admin@seabasket.ph", "admin123", "admin").await?;
    let customer_id =
        ensure_user_with_role(&pool, "customer@seabasket.ph", "customer123", "customer").await?;
    let courier_id =
        ensure_user_with_role(&pool, "courier@seabasket.ph", "courier123", "delivery").await?;
    seed_products(&pool).await?;

    println!("Seed completed. Admin: {admin_id}, Customer: {customer_id}, Courier: {courier_id}");
    Ok(())
}

async fn ensure_user_with_role(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    // DO UPDATE guarantees a returned row whether the user is new or not.
    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // Prices are centavos. Weight products are priced per kilogram and
    // stocked in whole kilograms.
    let products = vec![
        ("Bangus (Milkfish)", "Fresh whole bangus, gutted", 18500, 40, "kg", "fish"),
        ("Tilapia", "Live-harvested tilapia", 14000, 60, "kg", "fish"),
        ("Tiger Prawns", "Large suahe-grade prawns", 65000, 25, "kg", "shellfish"),
        ("Blue Crab", "Alimasag, netted daily", 48000, 15, "kg", "shellfish"),
        ("Canned Sardines", "In tomato sauce, 155g tin", 3500, 200, "piece", "pantry"),
        ("Dried Danggit", "Crispy-fry breakfast fish, 100g pack", 12000, 80, "piece", "dried"),
        ("Squid Rings", "Cleaned and sliced, 500g tray", 22000, 45, "piece", "frozen"),
    ];

    for (name, desc, price, stock, unit_type, category) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, stock_quantity, unit_type, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(stock)
        .bind(unit_type)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
