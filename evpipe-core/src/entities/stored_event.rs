use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

/// Schema of the append-only `events` table.
///
/// Every statement is `IF NOT EXISTS`, so running it against an existing
/// database neither fails nor touches rows or the `AUTOINCREMENT` sequence.
pub(crate) const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_type TEXT NOT NULL,
    event_payload TEXT NOT NULL,
    received_at TIMESTAMP,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
";

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredEvent {
    pub id: i64,
    pub event_type: String,
    pub event_payload: String,
    pub received_at: time::OffsetDateTime,
    pub created_at: time::PrimitiveDateTime,
}

/// Create the `events` table if it does not exist yet.
#[derive(Debug, Clone, Copy)]
pub struct InitEventSchema;

impl Processor<InitEventSchema> for DatabaseProcessor {
    type Output = ();
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InitEventSchema")]
    async fn process(&self, _: InitEventSchema) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

/// Insert one accepted event.
///
/// The id and `received_at` are assigned here, never by the caller.
#[derive(Debug, Clone)]
pub struct SaveEvent {
    pub event_type: String,
    pub event_payload: String,
}

impl Processor<SaveEvent> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SaveEvent")]
    async fn process(&self, event: SaveEvent) -> Result<i64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let received_at = time::OffsetDateTime::now_utc();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events (event_type, event_payload, received_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(event.event_type)
        .bind(event.event_payload)
        .bind(received_at)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetStoredEventById {
    pub id: i64,
}

impl Processor<GetStoredEventById> for DatabaseProcessor {
    type Output = Option<StoredEvent>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetStoredEventById")]
    async fn process(&self, query: GetStoredEventById) -> Result<Option<StoredEvent>, sqlx::Error> {
        sqlx::query_as::<_, StoredEvent>(
            r#"
            SELECT id, event_type, event_payload, received_at, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await
    }
}

/// List events with an id greater than `after_id`, oldest first.
#[derive(Debug, Clone, Copy)]
pub struct ListStoredEvents {
    pub after_id: i64,
    pub limit: i64,
}

impl Processor<ListStoredEvents> for DatabaseProcessor {
    type Output = Vec<StoredEvent>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListStoredEvents")]
    async fn process(&self, query: ListStoredEvents) -> Result<Vec<StoredEvent>, sqlx::Error> {
        sqlx::query_as::<_, StoredEvent>(
            r#"
            SELECT id, event_type, event_payload, received_at, created_at
            FROM events
            WHERE id > $1
            ORDER BY id ASC
            LIMIT $2
            "#,
        )
        .bind(query.after_id)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CountStoredEvents;

impl Processor<CountStoredEvents> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountStoredEvents")]
    async fn process(&self, _: CountStoredEvents) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
    }
}
