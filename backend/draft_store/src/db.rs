//! Database layer — migrations, draft and hackathon queries.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use hackathon_wizard::hackathon::{DRAFT_STATUS, PUBLISHED_STATUS};
use hackathon_wizard::{DraftRecord, Hackathon, HackathonData, PublishPayload};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::errors::{Result, StoreError};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);

    // An in-memory database lives and dies with its single connection.
    let pool = if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?
    };

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Rows
// ─────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct DraftRow {
    id: i64,
    organization_id: String,
    status: String,
    data: String,
    created_at: String,
    updated_at: String,
}

impl DraftRow {
    fn into_record(self) -> Result<DraftRecord> {
        Ok(DraftRecord {
            id: self.id.to_string(),
            organization_id: self.organization_id,
            status: self.status,
            data: serde_json::from_str(&self.data)?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

/// Draft ids are stringified row ids; anything else cannot exist.
fn parse_draft_id(draft_id: &str) -> Result<i64> {
    draft_id
        .parse()
        .map_err(|_| StoreError::NotFound(format!("Draft {draft_id} not found")))
}

async fn load_draft_row(
    conn: &mut SqliteConnection,
    organization_id: &str,
    draft_id: &str,
) -> Result<DraftRow> {
    let id = parse_draft_id(draft_id)?;
    sqlx::query_as::<_, DraftRow>(
        r#"
        SELECT id, organization_id, status, data, created_at, updated_at
        FROM   drafts
        WHERE  id = ?1 AND organization_id = ?2
        "#,
    )
    .bind(id)
    .bind(organization_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StoreError::NotFound(format!("Draft {draft_id} not found")))
}

// ─────────────────────────────────────────────────────────
// Drafts
// ─────────────────────────────────────────────────────────

/// Insert a new draft holding whichever sections were supplied.
pub async fn create_draft(
    pool: &SqlitePool,
    organization_id: &str,
    sections: &HackathonData,
) -> Result<DraftRecord> {
    let now = Utc::now().to_rfc3339();
    let id = sqlx::query(
        r#"
        INSERT INTO drafts (organization_id, status, data, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        "#,
    )
    .bind(organization_id)
    .bind(DRAFT_STATUS)
    .bind(serde_json::to_string(sections)?)
    .bind(&now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    info!("Created draft {id} for organization {organization_id}");
    get_draft(pool, organization_id, &id.to_string()).await
}

pub async fn get_draft(
    pool: &SqlitePool,
    organization_id: &str,
    draft_id: &str,
) -> Result<DraftRecord> {
    let mut conn = pool.acquire().await?;
    load_draft_row(&mut conn, organization_id, draft_id)
        .await?
        .into_record()
}

/// Merge `update` into an existing, still-editable draft.
pub async fn update_draft(
    pool: &SqlitePool,
    organization_id: &str,
    draft_id: &str,
    update: HackathonData,
) -> Result<DraftRecord> {
    let mut tx = pool.begin().await?;
    let mut record = load_draft_row(&mut tx, organization_id, draft_id)
        .await?
        .into_record()?;

    if record.status != DRAFT_STATUS {
        return Err(StoreError::Conflict(format!(
            "Draft {draft_id} has already been published"
        )));
    }

    record.data.merge(update);
    let now = Utc::now();
    sqlx::query("UPDATE drafts SET data = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(serde_json::to_string(&record.data)?)
        .bind(now.to_rfc3339())
        .bind(parse_draft_id(draft_id)?)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("Updated draft {draft_id}");
    record.updated_at = now;
    Ok(record)
}

// ─────────────────────────────────────────────────────────
// Publish
// ─────────────────────────────────────────────────────────

/// Create a published hackathon and retire the draft it came from.
pub async fn publish(
    pool: &SqlitePool,
    organization_id: &str,
    payload: PublishPayload,
) -> Result<Hackathon> {
    let mut tx = pool.begin().await?;

    if let Some(draft_id) = payload.draft_id.as_deref() {
        let draft = load_draft_row(&mut tx, organization_id, draft_id).await?;
        if draft.status != DRAFT_STATUS {
            return Err(StoreError::Conflict(format!(
                "Draft {draft_id} has already been published"
            )));
        }
        sqlx::query("UPDATE drafts SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(PUBLISHED_STATUS)
            .bind(Utc::now().to_rfc3339())
            .bind(draft.id)
            .execute(&mut *tx)
            .await?;
    }

    let draft_id = payload.draft_id.clone();
    let data = payload.into_data();
    let created_at = Utc::now();
    let id = sqlx::query(
        r#"
        INSERT INTO hackathons (organization_id, draft_id, status, data, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(organization_id)
    .bind(draft_id.as_deref())
    .bind(PUBLISHED_STATUS)
    .bind(serde_json::to_string(&data)?)
    .bind(created_at.to_rfc3339())
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();
    tx.commit().await?;

    info!("Published hackathon {id} for organization {organization_id}");
    Ok(Hackathon {
        id: id.to_string(),
        organization_id: organization_id.to_string(),
        status: PUBLISHED_STATUS.to_string(),
        draft_id,
        data,
        created_at,
    })
}
