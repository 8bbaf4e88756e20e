//! Read-only resources and prompt templates.

pub mod assistant;
pub mod bookings;
pub mod registry;

pub use assistant::{BOOKING_ASSISTANT, BookingAssistantPrompt};
pub use bookings::{ALL_BOOKINGS_URI, AllBookingsResource, bookings_by_id};
pub use registry::{PromptHandler, PromptRegistry, ResourceHandler, ResourceRegistry};

use crate::booking::BookingRegistry;
use std::sync::Arc;

/// Create and register all resources.
pub fn create_resources(bookings: Arc<BookingRegistry>) -> ResourceRegistry {
    let registry = ResourceRegistry::new();
    registry.register(AllBookingsResource::new(bookings));
    registry
}

/// Create and register all prompts.
pub fn create_prompts() -> PromptRegistry {
    let registry = PromptRegistry::new();
    registry.register(BookingAssistantPrompt);
    registry
}
