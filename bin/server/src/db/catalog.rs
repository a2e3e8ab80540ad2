//! Postgres implementation of the catalog store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reunion_catalog::{CatalogError, CatalogStore, Event, TicketType};
use reunion_core::{EventId, Result, TicketTypeId};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

fn store_error(e: sqlx::Error) -> CatalogError {
    CatalogError::Store {
        details: e.to_string(),
    }
}

/// Postgres `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION))
}

fn parse_id<T: FromStr>(raw: &str) -> std::result::Result<T, CatalogError>
where
    T::Err: std::fmt::Display,
{
    T::from_str(raw).map_err(|e| CatalogError::Store {
        details: format!("corrupt id '{raw}': {e}"),
    })
}

/// Row type for event queries.
#[derive(FromRow)]
struct EventRow {
    id: String,
    name: String,
    description: Option<String>,
    location: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EventRow {
    fn try_into_event(self) -> std::result::Result<Event, CatalogError> {
        Ok(Event {
            id: parse_id(&self.id)?,
            name: self.name,
            description: self.description,
            location: self.location,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row type for ticket type queries.
#[derive(FromRow)]
struct TicketTypeRow {
    id: String,
    event_id: String,
    name: String,
    description: Option<String>,
    price_cents: i64,
    quantity: Option<i64>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TicketTypeRow {
    fn try_into_ticket_type(self) -> std::result::Result<TicketType, CatalogError> {
        Ok(TicketType {
            id: parse_id(&self.id)?,
            event_id: parse_id(&self.event_id)?,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            quantity: self.quantity,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const EVENT_COLUMNS: &str =
    "id, name, description, location, starts_at, ends_at, is_active, created_at, updated_at";

const TICKET_TYPE_COLUMNS: &str = "id, event_id, name, description, price_cents, quantity, \
                                   is_active, created_at, updated_at";

/// Catalog store over the `events` and `ticket_types` tables.
///
/// IDs are stored as bare ULID strings. Ticket types reference their event
/// with `ON DELETE CASCADE`.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_events(&self) -> Result<Vec<Event>, CatalogError> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY starts_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(EventRow::try_into_event)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, CatalogError> {
        let row: Option<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id.as_ulid().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        match row {
            Some(r) => Ok(Some(r.try_into_event()?)),
            None => Ok(None),
        }
    }

    async fn insert_event(&self, event: &Event) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            INSERT INTO events (id, name, description, location, starts_at, ends_at,
                                is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id.as_ulid().to_string())
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(event.is_active)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<(), CatalogError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = $2, description = $3, location = $4, starts_at = $5, ends_at = $6,
                is_active = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(event.id.as_ulid().to_string())
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(event.is_active)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound {
                kind: "event",
                id: event.id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, CatalogError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_ulid().to_string())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_ticket_types(&self, event_id: EventId) -> Result<Vec<TicketType>, CatalogError> {
        let rows: Vec<TicketTypeRow> = sqlx::query_as(&format!(
            "SELECT {TICKET_TYPE_COLUMNS} FROM ticket_types WHERE event_id = $1"
        ))
        .bind(event_id.as_ulid().to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(TicketTypeRow::try_into_ticket_type)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn find_ticket_type(
        &self,
        id: TicketTypeId,
    ) -> Result<Option<TicketType>, CatalogError> {
        let row: Option<TicketTypeRow> = sqlx::query_as(&format!(
            "SELECT {TICKET_TYPE_COLUMNS} FROM ticket_types WHERE id = $1"
        ))
        .bind(id.as_ulid().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        match row {
            Some(r) => Ok(Some(r.try_into_ticket_type()?)),
            None => Ok(None),
        }
    }

    async fn insert_ticket_type(&self, ticket_type: &TicketType) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            INSERT INTO ticket_types (id, event_id, name, description, price_cents, quantity,
                                      is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(ticket_type.id.as_ulid().to_string())
        .bind(ticket_type.event_id.as_ulid().to_string())
        .bind(&ticket_type.name)
        .bind(&ticket_type.description)
        .bind(ticket_type.price_cents)
        .bind(ticket_type.quantity)
        .bind(ticket_type.is_active)
        .bind(ticket_type.created_at)
        .bind(ticket_type.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                CatalogError::NotFound {
                    kind: "event",
                    id: ticket_type.event_id.to_string(),
                }
            } else {
                store_error(e)
            }
        })?;

        Ok(())
    }

    async fn update_ticket_type(&self, ticket_type: &TicketType) -> Result<(), CatalogError> {
        let result = sqlx::query(
            r#"
            UPDATE ticket_types
            SET name = $2, description = $3, price_cents = $4, quantity = $5,
                is_active = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(ticket_type.id.as_ulid().to_string())
        .bind(&ticket_type.name)
        .bind(&ticket_type.description)
        .bind(ticket_type.price_cents)
        .bind(ticket_type.quantity)
        .bind(ticket_type.is_active)
        .bind(ticket_type.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound {
                kind: "ticket type",
                id: ticket_type.id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn delete_ticket_type(&self, id: TicketTypeId) -> Result<bool, CatalogError> {
        let result = sqlx::query("DELETE FROM ticket_types WHERE id = $1")
            .bind(id.as_ulid().to_string())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }
}
