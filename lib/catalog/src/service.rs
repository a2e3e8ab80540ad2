//! Catalog operations: validation, partial updates, and lookups.

use crate::error::CatalogError;
use crate::event::{Event, EventPatch, NewEvent};
use crate::store::CatalogStore;
use crate::ticket_type::{NewTicketType, TicketType, TicketTypePatch};
use chrono::Utc;
use reunion_core::{EventId, TicketTypeId};
use rootcause::Report;
use std::sync::Arc;

/// Converts a store report into a plain error.
///
/// `NotFound` passes through; anything else is logged and replaced.
fn store_fault(report: Report<CatalogError>) -> CatalogError {
    if let not_found @ CatalogError::NotFound { .. } = report.current_context() {
        return not_found.clone();
    }
    tracing::error!(error = %report, "Catalog store operation failed");
    CatalogError::store("catalog store unavailable")
}

fn event_not_found(id: EventId) -> CatalogError {
    CatalogError::NotFound {
        kind: "event",
        id: id.to_string(),
    }
}

fn ticket_type_not_found(id: TicketTypeId) -> CatalogError {
    CatalogError::NotFound {
        kind: "ticket type",
        id: id.to_string(),
    }
}

/// Event and ticket type operations over a [`CatalogStore`].
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn CatalogStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Lists all events, earliest first.
    pub async fn list_events(&self) -> Result<Vec<Event>, CatalogError> {
        let mut events = self.store.list_events().await.map_err(store_fault)?;
        events.sort_by_key(|event| (event.starts_at, event.id.as_ulid()));
        Ok(events)
    }

    pub async fn get_event(&self, id: EventId) -> Result<Event, CatalogError> {
        self.store
            .find_event(id)
            .await
            .map_err(store_fault)?
            .ok_or_else(|| event_not_found(id))
    }

    pub async fn create_event(&self, new: NewEvent) -> Result<Event, CatalogError> {
        let event = new.into_event(Utc::now());
        event.validate()?;
        self.store.insert_event(&event).await.map_err(store_fault)?;
        tracing::info!(event_id = %event.id, name = %event.name, "Created event");
        Ok(event)
    }

    pub async fn update_event(&self, id: EventId, patch: EventPatch) -> Result<Event, CatalogError> {
        let mut event = self.get_event(id).await?;
        event.apply(patch, Utc::now());
        event.validate()?;
        self.store.update_event(&event).await.map_err(store_fault)?;
        tracing::info!(event_id = %id, "Updated event");
        Ok(event)
    }

    /// Deletes an event together with its ticket types.
    pub async fn delete_event(&self, id: EventId) -> Result<(), CatalogError> {
        if !self.store.delete_event(id).await.map_err(store_fault)? {
            return Err(event_not_found(id));
        }
        tracing::info!(event_id = %id, "Deleted event");
        Ok(())
    }

    /// Lists the ticket types of an existing event, cheapest first.
    pub async fn list_ticket_types(&self, event_id: EventId) -> Result<Vec<TicketType>, CatalogError> {
        self.get_event(event_id).await?;
        let mut ticket_types = self
            .store
            .list_ticket_types(event_id)
            .await
            .map_err(store_fault)?;
        ticket_types.sort_by(|a, b| a.price_cents.cmp(&b.price_cents).then(a.name.cmp(&b.name)));
        Ok(ticket_types)
    }

    pub async fn get_ticket_type(&self, id: TicketTypeId) -> Result<TicketType, CatalogError> {
        self.store
            .find_ticket_type(id)
            .await
            .map_err(store_fault)?
            .ok_or_else(|| ticket_type_not_found(id))
    }

    /// Creates a ticket type. The referenced event must exist.
    pub async fn create_ticket_type(&self, new: NewTicketType) -> Result<TicketType, CatalogError> {
        self.get_event(new.event_id).await?;
        let ticket_type = new.into_ticket_type(Utc::now());
        ticket_type.validate()?;
        self.store
            .insert_ticket_type(&ticket_type)
            .await
            .map_err(store_fault)?;
        tracing::info!(
            ticket_type_id = %ticket_type.id,
            event_id = %ticket_type.event_id,
            "Created ticket type"
        );
        Ok(ticket_type)
    }

    pub async fn update_ticket_type(
        &self,
        id: TicketTypeId,
        patch: TicketTypePatch,
    ) -> Result<TicketType, CatalogError> {
        let mut ticket_type = self.get_ticket_type(id).await?;
        ticket_type.apply(patch, Utc::now());
        ticket_type.validate()?;
        self.store
            .update_ticket_type(&ticket_type)
            .await
            .map_err(store_fault)?;
        tracing::info!(ticket_type_id = %id, "Updated ticket type");
        Ok(ticket_type)
    }

    pub async fn delete_ticket_type(&self, id: TicketTypeId) -> Result<(), CatalogError> {
        if !self
            .store
            .delete_ticket_type(id)
            .await
            .map_err(store_fault)?
        {
            return Err(ticket_type_not_found(id));
        }
        tracing::info!(ticket_type_id = %id, "Deleted ticket type");
        Ok(())
    }
}
