//! Typed tool calls.
//!
//! Each tool call is decoded once, at the boundary, into one variant of
//! [`BookingAction`]. Everything past this point works with typed fields.

use crate::booking::BookingRequest;
use crate::error::{ToolError, ToolResult};
use serde_json::{Map, Value};

pub const BOOK_CAB: &str = "book_cab";
pub const CHECK_BOOKING_STATUS: &str = "check_booking_status";
pub const LIST_AVAILABLE_CABS: &str = "list_available_cabs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingAction {
    BookCab(BookingRequest),
    CheckStatus { booking_id: String },
    ListCabs { location: String },
}

impl BookingAction {
    /// Decode a tool name and its JSON arguments.
    pub fn decode(name: &str, arguments: Value) -> ToolResult<Self> {
        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ToolError::InvalidArguments(format!(
                    "arguments must be an object, got {}",
                    json_type(&other)
                )));
            }
        };

        match name {
            BOOK_CAB => Ok(Self::BookCab(BookingRequest {
                pickup_location: required_str(&args, "pickup_location")?,
                dropoff_location: required_str(&args, "dropoff_location")?,
                pickup_datetime: required_str(&args, "pickup_datetime")?,
                cab_type: required_str(&args, "cab_type")?,
            })),
            CHECK_BOOKING_STATUS => Ok(Self::CheckStatus {
                booking_id: required_str(&args, "booking_id")?,
            }),
            LIST_AVAILABLE_CABS => Ok(Self::ListCabs {
                location: required_str(&args, "location")?,
            }),
            unknown => Err(ToolError::UnknownAction(unknown.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BookCab(_) => BOOK_CAB,
            Self::CheckStatus { .. } => CHECK_BOOKING_STATUS,
            Self::ListCabs { .. } => LIST_AVAILABLE_CABS,
        }
    }

    /// Whether executing this action can change booking state.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::BookCab(_))
    }
}

fn required_str(args: &Map<String, Value>, field: &'static str) -> ToolResult<String> {
    match args.get(field) {
        None | Some(Value::Null) => Err(ToolError::MissingArgument(field.into())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ToolError::InvalidArguments(format!(
            "{} must be a string, got {}",
            field,
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
