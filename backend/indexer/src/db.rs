//! Database layer: migrations, queries and cursor management.

use sqlx::{sqlite::SqlitePoolOptions, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::errors::Result;
use crate::events::{ApplicationRecord, ApplicationStatus, EventRecord, RegistryEvent};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    // Make sure the file is created if it doesn't exist yet.
    let url = if url.contains("mode=") || url.contains(":memory:") {
        url
    } else if url.contains('?') {
        format!("{url}&mode=rwc")
    } else {
        format!("{url}?mode=rwc")
    };

    // An in-memory database lives and dies with its single connection.
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Read the last-seen ledger from the cursor row.
/// Returns `0` when no cursor has been persisted yet.
pub async fn get_last_ledger(pool: &SqlitePool) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT last_ledger FROM indexer_cursor WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v).unwrap_or(0))
}

/// Persist the last-seen ledger (and optionally a pagination cursor string).
pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(last_ledger)
        .bind(last_cursor)
        .execute(pool)
        .await?;
    Ok(())
}

/// Read back the raw cursor string (used to resume pagination mid-ledger).
pub async fn get_cursor_string(pool: &SqlitePool) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(v,)| v))
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events and fold them into the applications
/// projection, all in one transaction.
///
/// Events whose RPC `event_id` is already stored are silently ignored, and
/// only newly stored events touch the projection, so replaying a page is
/// harmless.
pub async fn insert_events(pool: &SqlitePool, events: &[RegistryEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for ev in events {
        let status = ev.status().map(|s| s.as_str());
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, scholarship_id, actor, amount, metadata_uri,
                 status, ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&ev.event_id)
        .bind(ev.kind.as_str())
        .bind(&ev.scholarship_id)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(&ev.metadata_uri)
        .bind(status)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if rows_affected > 0 {
            apply_to_applications(&mut tx, ev).await?;
        }
        count += rows_affected as usize;
    }

    tx.commit().await?;
    Ok(count)
}

/// Update the applications projection for one newly stored event.
async fn apply_to_applications(tx: &mut Transaction<'_, Sqlite>, ev: &RegistryEvent) -> Result<()> {
    let (Some(status), Some(scholarship_id), Some(applicant)) =
        (ev.status(), ev.scholarship_id.as_deref(), ev.actor.as_deref())
    else {
        return Ok(());
    };

    if status == ApplicationStatus::Pending {
        sqlx::query(
            r#"
            INSERT INTO applications
                (scholarship_id, applicant, metadata_uri, status, submitted_ledger, updated_ledger)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT (scholarship_id, applicant) DO UPDATE SET
                metadata_uri   = excluded.metadata_uri,
                status         = excluded.status,
                updated_ledger = excluded.updated_ledger
            "#,
        )
        .bind(scholarship_id)
        .bind(applicant)
        .bind(ev.metadata_uri.as_deref().unwrap_or_default())
        .bind(status.as_str())
        .bind(ev.ledger)
        .execute(&mut **tx)
        .await?;
    } else {
        let updated = sqlx::query(
            r#"
            UPDATE applications
            SET    status = ?3, updated_ledger = ?4
            WHERE  scholarship_id = ?1 AND applicant = ?2
            "#,
        )
        .bind(scholarship_id)
        .bind(applicant)
        .bind(status.as_str())
        .bind(ev.ledger)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        if updated == 0 {
            debug!(
                "No indexed application for scholarship {scholarship_id} / {applicant}; \
                 `{}` event predates the indexed range",
                ev.kind.as_str()
            );
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

/// Fetch all events for a given scholarship, ordered by ledger ascending.
pub async fn get_events_for_scholarship(
    pool: &SqlitePool,
    scholarship_id: &str,
) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_id, event_type, scholarship_id, actor, amount, metadata_uri, status,
               ledger, timestamp, contract_id, tx_hash, created_at
        FROM   events
        WHERE  scholarship_id = ?1
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .bind(scholarship_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch all events, ordered by ledger ascending.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_id, event_type, scholarship_id, actor, amount, metadata_uri, status,
               ledger, timestamp, contract_id, tx_hash, created_at
        FROM   events
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Application reads
// ─────────────────────────────────────────────────────────

/// Fetch every indexed application for a scholarship in submission order.
pub async fn get_applications(
    pool: &SqlitePool,
    scholarship_id: &str,
) -> Result<Vec<ApplicationRecord>> {
    let rows = sqlx::query_as::<_, ApplicationRecord>(
        r#"
        SELECT scholarship_id, applicant, metadata_uri, status, submitted_ledger, updated_ledger
        FROM   applications
        WHERE  scholarship_id = ?1
        ORDER  BY submitted_ledger ASC, applicant ASC
        "#,
    )
    .bind(scholarship_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch one application; `None` if the applicant never applied.
pub async fn get_application(
    pool: &SqlitePool,
    scholarship_id: &str,
    applicant: &str,
) -> Result<Option<ApplicationRecord>> {
    let row = sqlx::query_as::<_, ApplicationRecord>(
        r#"
        SELECT scholarship_id, applicant, metadata_uri, status, submitted_ledger, updated_ledger
        FROM   applications
        WHERE  scholarship_id = ?1 AND applicant = ?2
        "#,
    )
    .bind(scholarship_id)
    .bind(applicant)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
