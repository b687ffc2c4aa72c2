//! Table definitions used by the PostgreSQL repositories.

use sqlx::PgPool;

use crate::PersistenceResult;

const CREATE_STATEMENTS: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS application_users (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        phone_number VARCHAR(50)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        description TEXT,
        price NUMERIC(18, 2) NOT NULL,
        category_id INTEGER NOT NULL REFERENCES categories(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_headers (
        id SERIAL PRIMARY KEY,
        application_user_id UUID NOT NULL REFERENCES application_users(id),
        date_of_order TIMESTAMPTZ NOT NULL,
        date_of_shipping TIMESTAMPTZ,
        order_total NUMERIC(18, 2) NOT NULL,
        order_status VARCHAR(50) NOT NULL,
        payment_status VARCHAR(50) NOT NULL,
        carrier VARCHAR(255),
        tracking_number VARCHAR(255),
        date_of_payment TIMESTAMPTZ,
        session_id VARCHAR(255),
        payment_intent_id VARCHAR(255),
        name VARCHAR(255) NOT NULL,
        phone VARCHAR(50) NOT NULL,
        address VARCHAR(255) NOT NULL,
        city VARCHAR(255) NOT NULL,
        state VARCHAR(255) NOT NULL,
        postal_code VARCHAR(50) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_details (
        id SERIAL PRIMARY KEY,
        order_header_id INTEGER NOT NULL REFERENCES order_headers(id) ON DELETE CASCADE,
        product_id INTEGER NOT NULL REFERENCES products(id),
        count INTEGER NOT NULL,
        price NUMERIC(18, 2) NOT NULL
    )
    "#,
];

const DROP_STATEMENTS: [&str; 5] = [
    "DROP TABLE IF EXISTS order_details CASCADE",
    "DROP TABLE IF EXISTS order_headers CASCADE",
    "DROP TABLE IF EXISTS products CASCADE",
    "DROP TABLE IF EXISTS application_users CASCADE",
    "DROP TABLE IF EXISTS categories CASCADE",
];

/// Create every table the repositories use, if missing.
pub async fn ensure_schema(pool: &PgPool) -> PersistenceResult<()> {
    for statement in CREATE_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("storefront schema ready");
    Ok(())
}

/// Drop every table created by [`ensure_schema`].
pub async fn drop_schema(pool: &PgPool) -> PersistenceResult<()> {
    for statement in DROP_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
