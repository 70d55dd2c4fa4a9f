use async_trait::async_trait;
use sqlx::{FromRow, query, query_as, query_scalar};
use time::OffsetDateTime;

use crate::application::repos::{LookupError, RecordLookup};
use crate::domain::{entities::MessageRecord, key::ContentKey};

use super::{PostgresRepositories, map_sqlx_error};

// A project without a message row still renders, with an empty payload.
const FIND_ACTIVE_SQL: &str = "\
    SELECT p.slug, COALESCE(m.message, '') AS payload, p.created_at, p.expires_at \
    FROM projects p \
    LEFT JOIN project_messages m ON m.project_id = p.id \
    WHERE p.slug = $1 AND p.expires_at > $2";

const EXISTS_SQL: &str = "SELECT EXISTS (SELECT 1 FROM projects WHERE slug = $1)";

#[derive(Debug, FromRow)]
struct MessageRow {
    slug: String,
    payload: String,
    created_at: OffsetDateTime,
    expires_at: OffsetDateTime,
}

impl From<MessageRow> for MessageRecord {
    fn from(row: MessageRow) -> Self {
        Self {
            key: ContentKey::new(row.slug),
            payload: row.payload,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl RecordLookup for PostgresRepositories {
    async fn find_active(
        &self,
        key: &ContentKey,
        now: OffsetDateTime,
    ) -> Result<Option<MessageRecord>, LookupError> {
        let row = query_as::<_, MessageRow>(FIND_ACTIVE_SQL)
            .bind(key.as_str())
            .bind(now)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(MessageRecord::from))
    }

    async fn exists(&self, key: &ContentKey) -> Result<bool, LookupError> {
        query_scalar::<_, bool>(EXISTS_SQL)
            .bind(key.as_str())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn probe(&self) -> Result<(), LookupError> {
        query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}
