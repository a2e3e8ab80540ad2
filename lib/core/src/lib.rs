//! Core domain types and utilities for the reunion ticketing platform.
//!
//! This crate provides the error handling foundation and the strongly-typed
//! identifiers shared by the catalog, platform-access, and server crates.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{EventId, ParseIdError, TicketTypeId};
