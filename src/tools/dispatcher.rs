//! Turns tool calls into registry operations and human-readable replies.

use crate::booking::{Booking, BookingRegistry, CabAvailability, FleetAvailability};
use crate::error::{BookingError, ToolError};
use crate::protocol::{CallToolResult, Content};
use crate::tools::action::BookingAction;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Text segments produced by one action.
///
/// `is_error` marks rejections (bad input, unknown tool). A booking that does
/// not exist is an ordinary answer and leaves it unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReply {
    pub segments: Vec<String>,
    pub is_error: bool,
}

impl ActionReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            segments: vec![text.into()],
            is_error: false,
        }
    }

    pub fn rejected(error: &ToolError) -> Self {
        let text = match error {
            ToolError::Rejected(BookingError::InvalidInput { .. }) => {
                format!("Booking rejected: {}", error)
            }
            _ => error.to_string(),
        };
        Self {
            segments: vec![text],
            is_error: true,
        }
    }
}

impl From<ActionReply> for CallToolResult {
    fn from(reply: ActionReply) -> Self {
        Self {
            content: reply.segments.into_iter().map(Content::text).collect(),
            is_error: reply.is_error.then_some(true),
        }
    }
}

pub struct RequestDispatcher {
    registry: Arc<BookingRegistry>,
    fleet: Arc<dyn FleetAvailability>,
    currency_symbol: String,
}

impl RequestDispatcher {
    pub fn new(
        registry: Arc<BookingRegistry>,
        fleet: Arc<dyn FleetAvailability>,
        currency_symbol: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            fleet,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn registry(&self) -> &Arc<BookingRegistry> {
        &self.registry
    }

    /// Decode and run one tool call. Never fails; problems come back as text.
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub fn dispatch(&self, name: &str, arguments: Value) -> ActionReply {
        match BookingAction::decode(name, arguments) {
            Ok(action) => self.execute(action),
            Err(e) => {
                warn!("Rejected tool call: {}", e);
                ActionReply::rejected(&e)
            }
        }
    }

    pub fn execute(&self, action: BookingAction) -> ActionReply {
        debug!("Executing action: {}", action.name());
        match action {
            BookingAction::BookCab(request) => match self.registry.create(request) {
                Ok(booking) => ActionReply::text(self.render_confirmation(&booking)),
                Err(e) => {
                    warn!("Booking rejected: {}", e);
                    ActionReply::rejected(&ToolError::Rejected(e))
                }
            },
            BookingAction::CheckStatus { booking_id } => match self.registry.get(&booking_id) {
                Ok(booking) => ActionReply::text(self.render_status(&booking)),
                Err(_) => ActionReply::text(format!(
                    "Booking {} not found. Please check the booking ID.",
                    booking_id
                )),
            },
            BookingAction::ListCabs { location } => {
                ActionReply::text(render_availability(&location, &self.fleet.available(&location)))
            }
        }
    }

    /// Inputs are echoed as given, except the cab type, which shows the
    /// normalized class name (`luxury` reads back as `Luxury`).
    fn render_confirmation(&self, booking: &Booking) -> String {
        format!(
            "Cab Booking Confirmed!\n\n\
            Booking ID: {}\n\
            Pickup: {}\n\
            Drop-off: {}\n\
            Time: {}\n\
            Cab Type: {}\n\
            Status: {}\n\
            Estimated Fare: {}\n\n\
            Your driver details will be sent 30 minutes before pickup.",
            booking.id,
            booking.pickup_location,
            booking.dropoff_location,
            booking.pickup_time,
            booking.cab_class,
            booking.status.as_str().to_uppercase(),
            self.format_fare(booking.fare),
        )
    }

    fn render_status(&self, booking: &Booking) -> String {
        format!(
            "Booking Status\n\n\
            Booking ID: {}\n\
            Status: {}\n\
            Pickup: {}\n\
            Drop-off: {}\n\
            Time: {}\n\
            Cab Type: {}\n\
            Fare: {}",
            booking.id,
            booking.status.as_str().to_uppercase(),
            booking.pickup_location,
            booking.dropoff_location,
            booking.pickup_time,
            booking.cab_class,
            self.format_fare(booking.fare),
        )
    }

    fn format_fare(&self, fare: Decimal) -> String {
        let mut amount = fare.round_dp(2);
        amount.rescale(2);
        format!("{}{}", self.currency_symbol, amount)
    }
}

fn render_availability(location: &str, cabs: &[CabAvailability]) -> String {
    let mut out = format!("Available Cabs near {}:\n\n", location);
    for cab in cabs {
        out.push_str(&format!(
            "• {}: {} available (ETA: {} mins)\n",
            cab.cab_class, cab.count, cab.eta_minutes
        ));
    }
    out
}
