//! Events and ticket types for the reunion ticketing site.
//!
//! The catalog is plain CRUD: [`Catalog`] validates and patches records and
//! hands whole records to a [`CatalogStore`]. The only cross-record rules
//! are that a ticket type must belong to an existing event and that
//! deleting an event deletes its ticket types.

pub mod error;
pub mod event;
pub mod memory;
pub mod service;
pub mod store;
pub mod ticket_type;

pub use error::CatalogError;
pub use event::{Event, EventPatch, NewEvent};
pub use memory::MemoryCatalogStore;
pub use service::Catalog;
pub use store::CatalogStore;
pub use ticket_type::{NewTicketType, TicketType, TicketTypePatch};
