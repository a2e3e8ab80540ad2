//! In-process catalog store.
//!
//! Used for local development without Postgres and as the store behind the
//! server's API tests.

use crate::error::CatalogError;
use crate::event::Event;
use crate::store::CatalogStore;
use crate::ticket_type::TicketType;
use async_trait::async_trait;
use reunion_core::{EventId, Result, TicketTypeId};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    events: HashMap<EventId, Event>,
    ticket_types: HashMap<TicketTypeId, TicketType>,
}

/// Catalog store backed by hash maps behind a lock.
#[derive(Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl MemoryCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_events(&self) -> Result<Vec<Event>, CatalogError> {
        Ok(self.tables.read().await.events.values().cloned().collect())
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, CatalogError> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn insert_event(&self, event: &Event) -> Result<(), CatalogError> {
        self.tables
            .write()
            .await
            .events
            .insert(event.id, event.clone());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<(), CatalogError> {
        let mut tables = self.tables.write().await;
        match tables.events.get_mut(&event.id) {
            Some(stored) => {
                *stored = event.clone();
                Ok(())
            }
            None => Err(CatalogError::NotFound {
                kind: "event",
                id: event.id.to_string(),
            }
            .into()),
        }
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, CatalogError> {
        let mut tables = self.tables.write().await;
        let existed = tables.events.remove(&id).is_some();
        tables
            .ticket_types
            .retain(|_, ticket_type| ticket_type.event_id != id);
        Ok(existed)
    }

    async fn list_ticket_types(&self, event_id: EventId) -> Result<Vec<TicketType>, CatalogError> {
        Ok(self
            .tables
            .read()
            .await
            .ticket_types
            .values()
            .filter(|ticket_type| ticket_type.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn find_ticket_type(
        &self,
        id: TicketTypeId,
    ) -> Result<Option<TicketType>, CatalogError> {
        Ok(self.tables.read().await.ticket_types.get(&id).cloned())
    }

    async fn insert_ticket_type(&self, ticket_type: &TicketType) -> Result<(), CatalogError> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&ticket_type.event_id) {
            return Err(CatalogError::NotFound {
                kind: "event",
                id: ticket_type.event_id.to_string(),
            }
            .into());
        }
        tables.ticket_types.insert(ticket_type.id, ticket_type.clone());
        Ok(())
    }

    async fn update_ticket_type(&self, ticket_type: &TicketType) -> Result<(), CatalogError> {
        let mut tables = self.tables.write().await;
        match tables.ticket_types.get_mut(&ticket_type.id) {
            Some(stored) => {
                *stored = ticket_type.clone();
                Ok(())
            }
            None => Err(CatalogError::NotFound {
                kind: "ticket type",
                id: ticket_type.id.to_string(),
            }
            .into()),
        }
    }

    async fn delete_ticket_type(&self, id: TicketTypeId) -> Result<bool, CatalogError> {
        Ok(self
            .tables
            .write()
            .await
            .ticket_types
            .remove(&id)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NewEvent;
    use crate::ticket_type::NewTicketType;
    use chrono::Utc;

    fn ticket_for(event_id: EventId) -> TicketType {
        NewTicketType {
            event_id,
            name: "Adult".to_string(),
            description: None,
            price_cents: 4500,
            quantity: None,
            is_active: true,
        }
        .into_ticket_type(Utc::now())
    }

    #[tokio::test]
    async fn ticket_type_for_unknown_event_is_rejected() {
        let store = MemoryCatalogStore::new();
        let event_id = EventId::new();

        let err = store.insert_ticket_type(&ticket_for(event_id)).await.unwrap_err();

        assert!(err.to_string().contains("not found"));
        assert!(store.list_ticket_types(event_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ticket_type_for_stored_event_is_kept() {
        let store = MemoryCatalogStore::new();
        let event = NewEvent {
            name: "Picnic".to_string(),
            description: None,
            location: None,
            starts_at: Utc::now(),
            ends_at: None,
            is_active: true,
        }
        .into_event(Utc::now());
        store.insert_event(&event).await.unwrap();

        store.insert_ticket_type(&ticket_for(event.id)).await.unwrap();

        assert_eq!(store.list_ticket_types(event.id).await.unwrap().len(), 1);
    }
}
