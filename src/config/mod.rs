//! Configuration types and builders.

use crate::error::{ConfigError, McpError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;

/// Largest accepted starting counter value, leaving room to issue ids.
pub const MAX_FIRST_ID: u64 = u64::MAX / 2;

/// Booking registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Prefix of every issued booking id.
    pub id_prefix: String,
    /// Counter value of the first booking.
    pub first_id: u64,
    /// Fare charged by the default flat pricing.
    pub base_fare: Decimal,
    /// Symbol used when rendering fares as text.
    pub currency_symbol: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            id_prefix: "CAB".into(),
            first_id: 1000,
            base_fare: Decimal::new(5000, 2),
            currency_symbol: "$".into(),
        }
    }
}

/// Builder for BookingConfig with fluent API.
#[derive(Default)]
pub struct BookingConfigBuilder {
    config: BookingConfig,
}

impl BookingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.id_prefix = prefix.into();
        self
    }

    pub fn first_id(mut self, first_id: u64) -> Self {
        self.config.first_id = first_id;
        self
    }

    pub fn base_fare(mut self, fare: Decimal) -> Self {
        self.config.base_fare = fare;
        self
    }

    pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.config.currency_symbol = symbol.into();
        self
    }

    /// Build from environment variables.
    pub fn from_env(mut self) -> Result<Self> {
        if let Ok(prefix) = env::var("CAB_BOOKING_ID_PREFIX") {
            self.config.id_prefix = prefix;
        }

        if let Ok(start) = env::var("CAB_BOOKING_ID_START") {
            self.config.first_id = start.trim().parse().map_err(|_| {
                McpError::Config(ConfigError::InvalidValue {
                    field: "CAB_BOOKING_ID_START".into(),
                    message: format!("Not a non-negative integer: {}", start).into(),
                })
            })?;
        }

        if let Ok(fare) = env::var("CAB_BOOKING_BASE_FARE") {
            self.config.base_fare = fare.trim().parse().map_err(|_| {
                McpError::Config(ConfigError::InvalidValue {
                    field: "CAB_BOOKING_BASE_FARE".into(),
                    message: format!("Not a decimal amount: {}", fare).into(),
                })
            })?;
        }

        if let Ok(symbol) = env::var("CAB_BOOKING_CURRENCY_SYMBOL") {
            self.config.currency_symbol = symbol;
        }

        Ok(self)
    }

    pub fn build(self) -> Result<BookingConfig> {
        self.validate()?;
        Ok(self.config)
    }

    fn validate(&self) -> Result<()> {
        let prefix = &self.config.id_prefix;
        if prefix.is_empty() {
            return Err(ConfigError::MissingField("id_prefix".into()).into());
        }
        // Ids are parsed back by stripping the prefix, so it must not end in a digit.
        if prefix.ends_with(|c: char| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidValue {
                field: "id_prefix".into(),
                message: "Prefix must not end with a digit".into(),
            }
            .into());
        }
        if self.config.first_id > MAX_FIRST_ID {
            return Err(ConfigError::InvalidValue {
                field: "first_id".into(),
                message: format!("Must be at most {}", MAX_FIRST_ID).into(),
            }
            .into());
        }
        if self.config.base_fare.is_sign_negative() {
            return Err(ConfigError::InvalidValue {
                field: "base_fare".into(),
                message: "Fare must not be negative".into(),
            }
            .into());
        }
        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub booking: BookingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "cab-booking-mcp".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            booking: BookingConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Server config from `CAB_BOOKING_*` environment variables, defaults elsewhere.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder().booking(BookingConfigBuilder::new().from_env()?.build()?);
        if let Ok(name) = env::var("CAB_BOOKING_SERVER_NAME") {
            builder = builder.name(name);
        }
        Ok(builder.build())
    }
}

/// Builder for ServerConfig.
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<Cow<'static, str>>) -> Self {
        self.config.version = version.into();
        self
    }

    pub fn booking(mut self, booking: BookingConfig) -> Self {
        self.config.booking = booking;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}
