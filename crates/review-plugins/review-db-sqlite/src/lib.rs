//! # review-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `review-core` domain models.
//!
//! Concurrency is handled by the database: every operation runs in one
//! transaction, updates are guarded by the `version` column, and the
//! `(pos_id, author_id)` unique index rejects a second review by the same author.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use review_core::error::{AppError, Result};
use review_core::models::{Pos, PosId, Review, ReviewId, User, UserId};
use review_core::traits::{PosRegistry, ReviewRepo, ReviewStore, ReviewTx, UserDirectory};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use uuid::Uuid;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BLOB PRIMARY KEY,
        login_name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS pos (
        id BLOB PRIMARY KEY,
        name TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS reviews (
        id BLOB PRIMARY KEY,
        pos_id BLOB NOT NULL REFERENCES pos(id),
        author_id BLOB NOT NULL REFERENCES users(id),
        review TEXT NOT NULL,
        approval_count INTEGER NOT NULL DEFAULT 0 CHECK (approval_count >= 0),
        approved BOOLEAN NOT NULL DEFAULT FALSE,
        version INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (pos_id, author_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_reviews_pos_approved ON reviews (pos_id, approved)",
];

pub struct SqliteReviewRepo {
    pool: SqlitePool,
}

impl SqliteReviewRepo {
    /// Connects (creating the file if needed) and applies the schema.
    ///
    /// `sqlite::memory:` databases live per connection, so they get a single
    /// connection that is never recycled.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await.map_err(db_err)?;

        for statement in SCHEMA {
            sqlx::query(*statement).execute(&pool).await.map_err(db_err)?;
        }
        log::info!("SQLite review store ready at {url}");
        Ok(Self { pool })
    }

    /// Registers a user so reviews and approvals can reference it.
    pub async fn create_user(&self, login_name: &str) -> Result<User> {
        let user = User {
            id: UserId::new(),
            login_name: login_name.to_string(),
            created_at: Utc::now(),
        };
        sqlx::query("INSERT INTO users (id, login_name, created_at) VALUES (?, ?, ?)")
            .bind(user.id.0)
            .bind(&user.login_name)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(user)
    }

    /// Registers a point of sale.
    pub async fn create_pos(&self, name: &str) -> Result<Pos> {
        let pos = Pos {
            id: PosId::new(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        sqlx::query("INSERT INTO pos (id, name, created_at) VALUES (?, ?, ?)")
            .bind(pos.id.0)
            .bind(&pos.name)
            .bind(pos.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(pos)
    }
}

/// Maps driver failures onto the domain taxonomy.
///
/// Unique violations and lock contention surface as `Conflict` so callers can
/// tell a lost race from an outage.
fn db_err(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::Conflict("duplicate review".into());
        }
        // SQLITE_BUSY and its extended codes (BUSY_SNAPSHOT, BUSY_TIMEOUT, ...)
        let primary = db.code().and_then(|c| c.parse::<i32>().ok()).map(|c| c & 0xff);
        if primary == Some(5) {
            return AppError::Conflict("review store is busy, retry the request".into());
        }
    }
    log::error!("SQLite failure: {e}");
    AppError::Internal(e.to_string())
}

fn review_from_row(row: &SqliteRow) -> Result<Review> {
    let approval_count: i64 = row.try_get("approval_count").map_err(db_err)?;
    Ok(Review {
        id: Some(ReviewId(row.try_get::<Uuid, _>("id").map_err(db_err)?)),
        created_at: Some(row.try_get("created_at").map_err(db_err)?),
        updated_at: Some(row.try_get("updated_at").map_err(db_err)?),
        pos_id: PosId(row.try_get::<Uuid, _>("pos_id").map_err(db_err)?),
        author_id: UserId(row.try_get::<Uuid, _>("author_id").map_err(db_err)?),
        text: row.try_get("review").map_err(db_err)?,
        approval_count: u32::try_from(approval_count)
            .map_err(|_| AppError::Internal(format!("corrupt approval count {approval_count}")))?,
        approved: row.try_get("approved").map_err(db_err)?,
        version: row.try_get("version").map_err(db_err)?,
    })
}

#[async_trait]
impl ReviewRepo for SqliteReviewRepo {
    async fn begin(&self) -> Result<Box<dyn ReviewTx>> {
        let tx = self.pool.begin().await.map_err(db_err)?;
        Ok(Box::new(SqliteReviewTx { tx }))
    }
}

/// An open SQLite transaction. Dropping it rolls back.
pub struct SqliteReviewTx {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl UserDirectory for SqliteReviewTx {
    async fn get_user_by_id(&mut self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, login_name, created_at FROM users WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_err)?;

        row.map(|row| {
            Ok(User {
                id: UserId(row.try_get::<Uuid, _>("id").map_err(db_err)?),
                login_name: row.try_get("login_name").map_err(db_err)?,
                created_at: row.try_get("created_at").map_err(db_err)?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl PosRegistry for SqliteReviewTx {
    async fn get_pos_by_id(&mut self, id: PosId) -> Result<Option<Pos>> {
        let row = sqlx::query("SELECT id, name, created_at FROM pos WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_err)?;

        row.map(|row| {
            Ok(Pos {
                id: PosId(row.try_get::<Uuid, _>("id").map_err(db_err)?),
                name: row.try_get("name").map_err(db_err)?,
                created_at: row.try_get("created_at").map_err(db_err)?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl ReviewStore for SqliteReviewTx {
    async fn get_review_by_id(&mut self, id: ReviewId) -> Result<Option<Review>> {
        sqlx::query("SELECT * FROM reviews WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_err)?
            .as_ref()
            .map(review_from_row)
            .transpose()
    }

    async fn find_reviews_by_pos_and_author(
        &mut self,
        pos_id: PosId,
        author_id: UserId,
    ) -> Result<Vec<Review>> {
        sqlx::query("SELECT * FROM reviews WHERE pos_id = ? AND author_id = ?")
            .bind(pos_id.0)
            .bind(author_id.0)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_err)?
            .iter()
            .map(review_from_row)
            .collect()
    }

    async fn find_reviews_by_pos_and_approved(
        &mut self,
        pos_id: PosId,
        approved: bool,
    ) -> Result<Vec<Review>> {
        sqlx::query("SELECT * FROM reviews WHERE pos_id = ? AND approved = ?")
            .bind(pos_id.0)
            .bind(approved)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_err)?
            .iter()
            .map(review_from_row)
            .collect()
    }

    async fn upsert_review(&mut self, review: Review) -> Result<Review> {
        let now = Utc::now();

        let Some(id) = review.id else {
            let row = sqlx::query(
                "INSERT INTO reviews
                     (id, pos_id, author_id, review, approval_count, approved, version,
                      created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
                 RETURNING *",
            )
            .bind(ReviewId::new().0)
            .bind(review.pos_id.0)
            .bind(review.author_id.0)
            .bind(&review.text)
            .bind(i64::from(review.approval_count))
            .bind(review.approved)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(db_err)?;
            return review_from_row(&row);
        };

        let row = sqlx::query(
            "UPDATE reviews
             SET pos_id = ?, review = ?, approval_count = ?, approved = ?,
                 version = version + 1, updated_at = ?
             WHERE id = ? AND version = ?
             RETURNING *",
        )
        .bind(review.pos_id.0)
        .bind(&review.text)
        .bind(i64::from(review.approval_count))
        .bind(review.approved)
        .bind(now)
        .bind(id.0)
        .bind(review.version)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => review_from_row(&row),
            None if self.get_review_by_id(id).await?.is_some() => Err(AppError::Conflict(
                format!("review {id} was modified concurrently"),
            )),
            None => Err(AppError::not_found("Review", id)),
        }
    }
}

#[async_trait]
impl ReviewTx for SqliteReviewTx {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(db_err)
    }
}
