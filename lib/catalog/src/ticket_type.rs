//! Ticket types offered for an event.

use crate::error::CatalogError;
use chrono::{DateTime, Utc};
use reunion_core::{EventId, TicketTypeId};
use serde::{Deserialize, Serialize};

/// A kind of ticket (adult, child, family pass, ...) sold for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub id: TicketTypeId,
    pub event_id: EventId,
    pub name: String,
    pub description: Option<String>,
    /// Price in cents of the site currency.
    pub price_cents: i64,
    /// Number of tickets available; `None` means unlimited.
    pub quantity: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a ticket type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicketType {
    pub event_id: EventId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial update. The owning event cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTypePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl NewTicketType {
    #[must_use]
    pub fn into_ticket_type(self, now: DateTime<Utc>) -> TicketType {
        TicketType {
            id: TicketTypeId::new(),
            event_id: self.event_id,
            name: self.name.trim().to_string(),
            description: self.description,
            price_cents: self.price_cents,
            quantity: self.quantity,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TicketType {
    /// Applies a partial update and bumps `updated_at`.
    pub fn apply(&mut self, patch: TicketTypePatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(price_cents) = patch.price_cents {
            self.price_cents = price_cents;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = Some(quantity);
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.is_empty() {
            return Err(CatalogError::invalid("name", "must not be empty"));
        }
        if self.price_cents < 0 {
            return Err(CatalogError::invalid("priceCents", "must not be negative"));
        }
        if self.quantity.is_some_and(|quantity| quantity < 0) {
            return Err(CatalogError::invalid("quantity", "must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_ticket() -> NewTicketType {
        NewTicketType {
            event_id: EventId::new(),
            name: "Adult".to_string(),
            description: None,
            price_cents: 4500,
            quantity: Some(120),
            is_active: true,
        }
    }

    #[test]
    fn valid_ticket_type() {
        let ticket = new_ticket().into_ticket_type(Utc::now());
        assert!(ticket.validate().is_ok());
    }

    #[test]
    fn free_tickets_are_allowed() {
        let mut new = new_ticket();
        new.price_cents = 0;
        assert!(new.into_ticket_type(Utc::now()).validate().is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut new = new_ticket();
        new.price_cents = -1;
        assert!(matches!(
            new.into_ticket_type(Utc::now()).validate(),
            Err(CatalogError::Invalid { field: "priceCents", .. })
        ));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let mut ticket = new_ticket().into_ticket_type(Utc::now());
        ticket.apply(
            TicketTypePatch {
                quantity: Some(-5),
                ..TicketTypePatch::default()
            },
            Utc::now(),
        );
        assert!(matches!(
            ticket.validate(),
            Err(CatalogError::Invalid { field: "quantity", .. })
        ));
    }

    #[test]
    fn patch_keeps_event_and_untouched_fields() {
        let mut ticket = new_ticket().into_ticket_type(Utc::now());
        let event_id = ticket.event_id;

        ticket.apply(
            TicketTypePatch {
                price_cents: Some(3000),
                ..TicketTypePatch::default()
            },
            Utc::now(),
        );

        assert_eq!(ticket.event_id, event_id);
        assert_eq!(ticket.name, "Adult");
        assert_eq!(ticket.price_cents, 3000);
        assert_eq!(ticket.quantity, Some(120));
    }

    #[test]
    fn deserializes_camel_case() {
        let json = format!(
            r#"{{"eventId":"{}","name":"Child","priceCents":1500}}"#,
            EventId::new().as_ulid()
        );
        let new: NewTicketType = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(new.price_cents, 1500);
        assert!(new.quantity.is_none());
        assert!(new.is_active);
    }
}
