//! MCP tool definitions and the request dispatcher behind them.

pub mod action;
pub mod dispatcher;

pub use action::{BOOK_CAB, BookingAction, CHECK_BOOKING_STATUS, LIST_AVAILABLE_CABS};
pub use dispatcher::{ActionReply, RequestDispatcher};

use crate::protocol::Tool;

#[macro_export]
macro_rules! define_tool {
    (
        name: $name:expr,
        description: $desc:expr,
        schema: $schema:tt
    ) => {
        $crate::protocol::Tool {
            name: $name.into(),
            description: Some($desc.into()),
            input_schema: serde_json::json!($schema),
        }
    };
}

/// Definitions of every tool the dispatcher understands.
pub fn definitions() -> Vec<Tool> {
    vec![
        define_tool! {
            name: BOOK_CAB,
            description: "Books a cab with specified details. Returns booking confirmation.",
            schema: {
                "type": "object",
                "title": "BookCabInput",
                "properties": {
                    "pickup_location": {
                        "type": "string",
                        "title": "Pickup Location",
                        "description": "Pickup location"
                    },
                    "dropoff_location": {
                        "type": "string",
                        "title": "Dropoff Location",
                        "description": "Drop-off location"
                    },
                    "pickup_datetime": {
                        "type": "string",
                        "title": "Pickup Datetime",
                        "description": "Pickup date and time (ISO format)"
                    },
                    "cab_type": {
                        "type": "string",
                        "title": "Cab Type",
                        "description": "Type of cab (Standard/Premium/Luxury)",
                        "enum": ["Standard", "Premium", "Luxury"]
                    }
                },
                "required": ["pickup_location", "dropoff_location", "pickup_datetime", "cab_type"]
            }
        },
        define_tool! {
            name: CHECK_BOOKING_STATUS,
            description: "Checks the status of a booking by booking ID",
            schema: {
                "type": "object",
                "properties": {
                    "booking_id": {
                        "type": "string",
                        "description": "The booking reference ID (e.g., CAB1001)"
                    }
                },
                "required": ["booking_id"]
            }
        },
        define_tool! {
            name: LIST_AVAILABLE_CABS,
            description: "Lists all available cabs in a specific area",
            schema: {
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "Location to search for cabs"
                    }
                },
                "required": ["location"]
            }
        },
    ]
}
