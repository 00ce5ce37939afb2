//! Postgres-backed beer store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / Io / Tls / other | N/A | `Backend` |
//!
//! Rows that decode but violate the quantity invariant surface as `Corrupt`.

use std::sync::Arc;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use beerstock_core::{BeerId, Entity};
use beerstock_inventory::{Beer, BeerType, NewBeer};

use super::{BeerStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS beers (
    id           BIGSERIAL PRIMARY KEY,
    name         TEXT      NOT NULL UNIQUE,
    brand        TEXT      NOT NULL,
    max_quantity BIGINT    NOT NULL CHECK (max_quantity > 0),
    quantity     BIGINT    NOT NULL CHECK (quantity >= 0 AND quantity <= max_quantity),
    beer_type    TEXT      NOT NULL
)
"#;

/// Postgres-backed beer store.
///
/// Uses a SQLx connection pool, so the store is `Send + Sync` and cheap to
/// clone. The `UNIQUE(name)` constraint backs up the manager's duplicate
/// check when several processes share one database.
#[derive(Debug, Clone)]
pub struct PostgresBeerStore {
    pool: Arc<PgPool>,
}

impl PostgresBeerStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `beers` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl BeerStore for PostgresBeerStore {
    #[instrument(skip(self), fields(beer_id = %id))]
    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, brand, max_quantity, quantity, beer_type
            FROM beers
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(row_to_beer).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, brand, max_quantity, quantity, beer_type
            FROM beers
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_name", e))?;

        row.as_ref().map(row_to_beer).transpose()
    }

    #[instrument(skip(self, beer), fields(name = %beer.name()))]
    async fn insert(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO beers (name, brand, max_quantity, quantity, beer_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(beer.name())
        .bind(beer.brand())
        .bind(beer.max())
        .bind(beer.quantity())
        .bind(beer.beer_type().as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("insert", e))?;
        Ok(Beer::from_new(BeerId::new(id), beer))
    }

    #[instrument(skip(self, beer), fields(beer_id = %beer.id()))]
    async fn update(&self, beer: Beer) -> Result<Beer, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE beers
            SET name = $2, brand = $3, max_quantity = $4, quantity = $5, beer_type = $6
            WHERE id = $1
            "#,
        )
        .bind(beer.id().get())
        .bind(beer.name())
        .bind(beer.brand())
        .bind(beer.max())
        .bind(beer.quantity())
        .bind(beer.beer_type().as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Backend(format!(
                "cannot update beer {}: no such record",
                beer.id()
            )));
        }
        Ok(beer)
    }

    #[instrument(skip(self), fields(beer_id = %id))]
    async fn delete_by_id(&self, id: BeerId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Beer>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, brand, max_quantity, quantity, beer_type
            FROM beers
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_all", e))?;

        rows.iter().map(row_to_beer).collect()
    }
}

fn row_to_beer(row: &PgRow) -> Result<Beer, StoreError> {
    let id: i64 = row.try_get("id").map_err(|e| map_sqlx_error("decode", e))?;
    let name: String = row.try_get("name").map_err(|e| map_sqlx_error("decode", e))?;
    let brand: String = row.try_get("brand").map_err(|e| map_sqlx_error("decode", e))?;
    let max: i64 = row
        .try_get("max_quantity")
        .map_err(|e| map_sqlx_error("decode", e))?;
    let quantity: i64 = row
        .try_get("quantity")
        .map_err(|e| map_sqlx_error("decode", e))?;
    let beer_type: String = row
        .try_get("beer_type")
        .map_err(|e| map_sqlx_error("decode", e))?;

    let beer_type: BeerType = beer_type.parse()?;
    Beer::restore(BeerId::new(id), name, brand, max, quantity, beer_type).map_err(StoreError::from)
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
