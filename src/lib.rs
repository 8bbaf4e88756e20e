//! MCP server for booking cabs.
//!
//! Exposes three tools (`book_cab`, `check_booking_status`,
//! `list_available_cabs`), the `booking://all` resource and the
//! `booking_assistant` prompt over JSON-RPC on stdio. Bookings live in an
//! in-memory [`BookingRegistry`] that is safe to share between callers.
//!
//! # Example
//!
//! ```no_run
//! use cab_booking_mcp::{
//!     config::ServerConfig,
//!     protocol::McpServerBuilder,
//!     server::{McpHandler, ServerStateBuilder},
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let state = Arc::new(
//!         ServerStateBuilder::new()
//!             .config(ServerConfig::default())
//!             .build()
//!             .map_err(|e| anyhow::anyhow!(e))?,
//!     );
//!
//!     let server = McpServerBuilder::new()
//!         .handler(McpHandler::new(state))
//!         .with_tools()
//!         .with_resources()
//!         .with_prompts()
//!         .build()?;
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod booking;
pub mod config;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod server;
pub mod tools;

pub use booking::{
    Booking, BookingRegistry, BookingRequest, BookingStatus, CabClass, FlatFare, PricingStrategy,
};
pub use config::{BookingConfig, BookingConfigBuilder, ServerConfig};
pub use error::{BookingError, McpError, Result};
pub use protocol::{McpServer, McpServerBuilder};
pub use server::{McpHandler, ServerState, ServerStateBuilder};
pub use tools::{BookingAction, RequestDispatcher};
