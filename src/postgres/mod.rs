//! PostgreSQL repositories. All of them run inside the transaction held by
//! the session's [`Executor`](crate::Executor).

mod category;
mod order_detail;
mod order_header;
pub mod schema;

pub use category::PgCategoryRepository;
pub use order_detail::PgOrderDetailRepository;
pub use order_header::PgOrderHeaderRepository;

use sqlx::postgres::PgQueryResult;
use sqlx::{PgConnection, Row};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{ApplicationUser, Product};
use crate::{PersistenceError, PersistenceResult};

/// Fails with `EntityMissing` when a keyed write touched no row.
pub(crate) fn ensure_affected(
    result: PgQueryResult,
    entity: &'static str,
    id: i32,
) -> PersistenceResult<()> {
    if result.rows_affected() == 0 {
        return Err(PersistenceError::EntityMissing {
            entity,
            id: id.to_string(),
        });
    }
    Ok(())
}

pub(crate) async fn load_users(
    conn: &mut PgConnection,
    ids: Vec<Uuid>,
) -> PersistenceResult<HashMap<Uuid, ApplicationUser>> {
    let rows = sqlx::query(
        "SELECT id, name, email, phone_number FROM application_users WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|r| -> PersistenceResult<(Uuid, ApplicationUser)> {
            let user = ApplicationUser {
                id: r.try_get("id")?,
                name: r.try_get("name")?,
                email: r.try_get("email")?,
                phone_number: r.try_get("phone_number")?,
            };
            Ok((user.id, user))
        })
        .collect()
}

pub(crate) async fn load_products(
    conn: &mut PgConnection,
    ids: Vec<i32>,
) -> PersistenceResult<HashMap<i32, Product>> {
    let rows = sqlx::query(
        "SELECT id, name, description, price, category_id FROM products WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|r| -> PersistenceResult<(i32, Product)> {
            let product = Product {
                id: r.try_get("id")?,
                name: r.try_get("name")?,
                description: r.try_get("description")?,
                price: r.try_get("price")?,
                category_id: r.try_get("category_id")?,
            };
            Ok((product.id, product))
        })
        .collect()
}
