use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Audit, Journal, Subsection, SubsectionKind};
use crate::database::store::{JournalStore, Store, SubsectionStore};
use crate::pagination::{PageRequest, SortField};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS journals (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        created_by UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        last_modified_by UUID NOT NULL,
        last_modified_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS subsections (
        id UUID PRIMARY KEY,
        journal_id UUID REFERENCES journals (id),
        position INTEGER NOT NULL DEFAULT 0,
        title TEXT NOT NULL,
        subsection_type TEXT NOT NULL,
        details JSONB NOT NULL,
        created_by UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        last_modified_by UUID NOT NULL,
        last_modified_at TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS subsections_journal_id_idx ON subsections (journal_id)",
    "CREATE INDEX IF NOT EXISTS journals_created_by_idx ON journals (created_by)",
];

const JOURNAL_COLUMNS: &str = r#"
    j.id, j.title, j.description, j.created_by, j.created_at, j.last_modified_by, j.last_modified_at,
    ARRAY(SELECT s.id FROM subsections s WHERE s.journal_id = j.id ORDER BY s.position, s.created_at) AS subsection_ids
"#;

const SUBSECTION_COLUMNS: &str = r#"
    s.id, s.journal_id, s.title, s.details, s.created_by, s.created_at, s.last_modified_by, s.last_modified_at
"#;

#[derive(Debug, FromRow)]
struct JournalRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    last_modified_by: Uuid,
    last_modified_at: DateTime<Utc>,
    subsection_ids: Vec<Uuid>,
}

impl From<JournalRow> for Journal {
    fn from(row: JournalRow) -> Self {
        Journal {
            id: row.id,
            title: row.title,
            description: row.description,
            audit: Audit {
                created_by: row.created_by,
                created_at: row.created_at,
                last_modified_by: row.last_modified_by,
                last_modified_at: row.last_modified_at,
            },
            subsection_ids: row.subsection_ids,
        }
    }
}

#[derive(Debug, FromRow)]
struct SubsectionRow {
    id: Uuid,
    journal_id: Option<Uuid>,
    title: String,
    details: Json<serde_json::Value>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    last_modified_by: Uuid,
    last_modified_at: DateTime<Utc>,
}

impl TryFrom<SubsectionRow> for Subsection {
    type Error = DatabaseError;

    fn try_from(row: SubsectionRow) -> Result<Self, Self::Error> {
        let kind: SubsectionKind = serde_json::from_value(row.details.0)
            .map_err(|e| DatabaseError::Corrupt(format!("subsection {} details: {}", row.id, e)))?;

        Ok(Subsection {
            id: row.id,
            title: row.title,
            journal_id: row.journal_id,
            audit: Audit {
                created_by: row.created_by,
                created_at: row.created_at,
                last_modified_by: row.last_modified_by,
                last_modified_at: row.last_modified_at,
            },
            kind,
        })
    }
}

fn subsections_from(rows: Vec<SubsectionRow>) -> Result<Vec<Subsection>, DatabaseError> {
    rows.into_iter().map(Subsection::try_from).collect()
}

/// Foreign key and unique violations become `Constraint`, everything else stays `Sqlx`.
fn map_write_error(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(db_err.code().as_deref(), Some("23503") | Some("23505")) {
            return DatabaseError::Constraint(db_err.message().to_string());
        }
    }
    DatabaseError::Sqlx(err)
}

fn journal_sort_column(field: SortField) -> &'static str {
    match field {
        // Journals have no discriminator; fall back to title
        SortField::Type => "title",
        other => other.column(),
    }
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they are missing
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl JournalStore for PgStore {
    async fn find_journal(&self, id: Uuid) -> Result<Option<Journal>, DatabaseError> {
        let sql = format!("SELECT {} FROM journals j WHERE j.id = $1", JOURNAL_COLUMNS);
        let row = sqlx::query_as::<_, JournalRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Journal::from))
    }

    async fn find_journals_by_creator(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Vec<Journal>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM journals j WHERE j.created_by = $1 ORDER BY j.\"{}\" {} LIMIT $2 OFFSET $3",
            JOURNAL_COLUMNS,
            journal_sort_column(page.sort_by),
            page.sort_dir.to_sql()
        );
        let rows = sqlx::query_as::<_, JournalRow>(&sql)
            .bind(user_id)
            .bind(i64::from(page.page_size))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Journal::from).collect())
    }

    async fn save_journal(&self, journal: Journal) -> Result<Journal, DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO journals (id, title, description, created_by, created_at, last_modified_by, last_modified_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                last_modified_by = EXCLUDED.last_modified_by,
                last_modified_at = EXCLUDED.last_modified_at
            "#,
        )
        .bind(journal.id)
        .bind(&journal.title)
        .bind(&journal.description)
        .bind(journal.audit.created_by)
        .bind(journal.audit.created_at)
        .bind(journal.audit.last_modified_by)
        .bind(journal.audit.last_modified_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        self.find_journal(journal.id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("journal {}", journal.id)))
    }

    async fn delete_journal(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Serializes against attach_subsection on the same journal
        let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM journals WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(DatabaseError::NotFound(format!("journal {}", id)));
        }

        let detached: Vec<(Uuid,)> =
            sqlx::query_as("UPDATE subsections SET journal_id = NULL WHERE journal_id = $1 RETURNING id")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        let detached: Vec<Uuid> = detached.into_iter().map(|(sid,)| sid).collect();

        sqlx::query("DELETE FROM subsections WHERE id = ANY($1)")
            .bind(&detached)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM journals WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("Deleted journal {} with {} subsections", id, detached.len());
        Ok(())
    }
}

#[async_trait]
impl SubsectionStore for PgStore {
    async fn find_subsection(&self, id: Uuid) -> Result<Option<Subsection>, DatabaseError> {
        let sql = format!("SELECT {} FROM subsections s WHERE s.id = $1", SUBSECTION_COLUMNS);
        let row = sqlx::query_as::<_, SubsectionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Subsection::try_from).transpose()
    }

    async fn find_subsections_by_journal_creator(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Vec<Subsection>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM subsections s JOIN journals j ON j.id = s.journal_id \
             WHERE j.created_by = $1 ORDER BY s.\"{}\" {} LIMIT $2 OFFSET $3",
            SUBSECTION_COLUMNS,
            page.sort_by.column(),
            page.sort_dir.to_sql()
        );
        let rows = sqlx::query_as::<_, SubsectionRow>(&sql)
            .bind(user_id)
            .bind(i64::from(page.page_size))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;
        subsections_from(rows)
    }

    async fn find_subsections_by_journal(&self, journal_id: Uuid) -> Result<Vec<Subsection>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM subsections s WHERE s.journal_id = $1 ORDER BY s.position, s.created_at",
            SUBSECTION_COLUMNS
        );
        let rows = sqlx::query_as::<_, SubsectionRow>(&sql)
            .bind(journal_id)
            .fetch_all(&self.pool)
            .await?;
        subsections_from(rows)
    }

    async fn attach_subsection(&self, subsection: Subsection) -> Result<Subsection, DatabaseError> {
        let journal_id = subsection
            .journal_id
            .ok_or_else(|| DatabaseError::Constraint(format!("subsection {} has no journal", subsection.id)))?;

        let mut tx = self.pool.begin().await?;

        // Concurrent attaches to one journal queue here, so positions stay distinct
        let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM journals WHERE id = $1 FOR UPDATE")
            .bind(journal_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(DatabaseError::NotFound(format!("journal {}", journal_id)));
        }

        sqlx::query(
            r#"
            INSERT INTO subsections (id, journal_id, position, title, subsection_type, details,
                                     created_by, created_at, last_modified_by, last_modified_at)
            VALUES ($1, $2,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM subsections WHERE journal_id = $2),
                    $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(subsection.id)
        .bind(journal_id)
        .bind(&subsection.title)
        .bind(subsection.subsection_type().as_str())
        .bind(Json(&subsection.kind))
        .bind(subsection.audit.created_by)
        .bind(subsection.audit.created_at)
        .bind(subsection.audit.last_modified_by)
        .bind(subsection.audit.last_modified_at)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(subsection)
    }

    async fn save_subsection(&self, mut subsection: Subsection) -> Result<Subsection, DatabaseError> {
        let stored: Option<(Option<Uuid>,)> = sqlx::query_as(
            r#"
            UPDATE subsections SET
                title = $2,
                subsection_type = $3,
                details = $4,
                last_modified_by = $5,
                last_modified_at = $6
            WHERE id = $1
            RETURNING journal_id
            "#,
        )
        .bind(subsection.id)
        .bind(&subsection.title)
        .bind(subsection.subsection_type().as_str())
        .bind(Json(&subsection.kind))
        .bind(subsection.audit.last_modified_by)
        .bind(subsection.audit.last_modified_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        let (journal_id,) = stored.ok_or_else(|| DatabaseError::NotFound(format!("subsection {}", subsection.id)))?;
        subsection.journal_id = journal_id;
        Ok(subsection)
    }

    async fn detach_and_delete_subsection(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let detached: Option<(Uuid,)> =
            sqlx::query_as("UPDATE subsections SET journal_id = NULL WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if detached.is_none() {
            return Err(DatabaseError::NotFound(format!("subsection {}", id)));
        }

        sqlx::query("DELETE FROM subsections WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
