//! Persistence seam for the catalog.

use crate::error::CatalogError;
use crate::event::Event;
use crate::ticket_type::TicketType;
use async_trait::async_trait;
use reunion_core::{EventId, Result, TicketTypeId};

/// Storage for events and ticket types.
///
/// Implementations store whole records; validation and patching happen in
/// [`Catalog`](crate::Catalog) before anything reaches the store.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, CatalogError>;

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, CatalogError>;

    async fn insert_event(&self, event: &Event) -> Result<(), CatalogError>;

    /// Fails with [`CatalogError::NotFound`] when the event no longer exists.
    async fn update_event(&self, event: &Event) -> Result<(), CatalogError>;

    /// Deletes an event and its ticket types. Returns false if it did not exist.
    async fn delete_event(&self, id: EventId) -> Result<bool, CatalogError>;

    async fn list_ticket_types(&self, event_id: EventId) -> Result<Vec<TicketType>, CatalogError>;

    async fn find_ticket_type(&self, id: TicketTypeId)
    -> Result<Option<TicketType>, CatalogError>;

    /// Fails with [`CatalogError::NotFound`] when the referenced event is gone.
    async fn insert_ticket_type(&self, ticket_type: &TicketType) -> Result<(), CatalogError>;

    async fn update_ticket_type(&self, ticket_type: &TicketType) -> Result<(), CatalogError>;

    /// Returns false if the ticket type did not exist.
    async fn delete_ticket_type(&self, id: TicketTypeId) -> Result<bool, CatalogError>;
}
