//! `booking://all`: JSON snapshot of every booking.

use crate::booking::{Booking, BookingRegistry};
use crate::error::{ProtocolError, ProtocolResult};
use crate::protocol::{Resource, ResourceContent};
use crate::provider::registry::ResourceHandler;
use serde_json::{Map, Value};
use std::sync::Arc;

pub const ALL_BOOKINGS_URI: &str = "booking://all";

pub struct AllBookingsResource {
    registry: Arc<BookingRegistry>,
}

impl AllBookingsResource {
    pub fn new(registry: Arc<BookingRegistry>) -> Self {
        Self { registry }
    }
}

/// Object mapping each booking id to its fields.
pub fn bookings_by_id(bookings: &[Booking]) -> serde_json::Result<Value> {
    let mut map = Map::with_capacity(bookings.len());
    for booking in bookings {
        map.insert(booking.id.clone(), serde_json::to_value(booking)?);
    }
    Ok(Value::Object(map))
}

impl ResourceHandler for AllBookingsResource {
    fn definition(&self) -> Resource {
        Resource {
            uri: ALL_BOOKINGS_URI.into(),
            name: "All Bookings".into(),
            description: Some("Complete list of all cab bookings".into()),
            mime_type: Some("application/json".into()),
        }
    }

    fn read(&self) -> ProtocolResult<ResourceContent> {
        let snapshot = self.registry.list();
        let text = bookings_by_id(&snapshot)
            .and_then(|value| serde_json::to_string_pretty(&value))
            .map_err(|e| ProtocolError::InternalError(e.to_string().into()))?;

        Ok(ResourceContent {
            uri: ALL_BOOKINGS_URI.into(),
            mime_type: Some("application/json".into()),
            text: Some(text),
            blob: None,
        })
    }
}
