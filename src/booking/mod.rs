//! Booking domain: records, registry, pricing and fleet availability.

pub mod fleet;
pub mod pricing;
pub mod registry;
pub mod types;

pub use fleet::{CabAvailability, FleetAvailability, StaticFleet};
pub use pricing::{FlatFare, PricingStrategy};
pub use registry::BookingRegistry;
pub use types::{
    Booking, BookingRequest, BookingStatus, CabClass, ValidatedBooking, parse_pickup_time,
};
