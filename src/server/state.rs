//! Server state management.

use crate::booking::{
    BookingRegistry, FleetAvailability, FlatFare, PricingStrategy, StaticFleet,
};
use crate::config::ServerConfig;
use crate::protocol::ClientInfo;
use crate::provider::{PromptRegistry, ResourceRegistry, create_prompts, create_resources};
use crate::tools::RequestDispatcher;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub struct ServerState {
    pub config: ServerConfig,
    pub bookings: Arc<BookingRegistry>,
    pub dispatcher: RequestDispatcher,
    pub resources: ResourceRegistry,
    pub prompts: PromptRegistry,
    initialized: AtomicBool,
    client_info: RwLock<Option<ClientInfo>>,
    tool_calls: AtomicU64,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        bookings: Arc<BookingRegistry>,
        dispatcher: RequestDispatcher,
        resources: ResourceRegistry,
        prompts: PromptRegistry,
    ) -> Self {
        Self {
            config,
            bookings,
            dispatcher,
            resources,
            prompts,
            initialized: AtomicBool::new(false),
            client_info: RwLock::new(None),
            tool_calls: AtomicU64::new(0),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn set_initialized(&self, client_info: ClientInfo) {
        *self.client_info.write() = Some(client_info);
        self.initialized.store(true, Ordering::SeqCst);
    }

    pub fn client_info(&self) -> Option<ClientInfo> {
        self.client_info.read().clone()
    }

    /// Count a tool call and return its zero-based sequence number.
    pub fn record_tool_call(&self) -> u64 {
        self.tool_calls.fetch_add(1, Ordering::SeqCst)
    }

    pub fn tool_calls(&self) -> u64 {
        self.tool_calls.load(Ordering::SeqCst)
    }
}

pub struct ServerStateBuilder {
    config: Option<ServerConfig>,
    pricing: Option<Arc<dyn PricingStrategy>>,
    fleet: Option<Arc<dyn FleetAvailability>>,
}

impl ServerStateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            pricing: None,
            fleet: None,
        }
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the flat base fare with another pricing strategy.
    pub fn pricing(mut self, pricing: Arc<dyn PricingStrategy>) -> Self {
        self.pricing = Some(pricing);
        self
    }

    /// Replace the static availability table.
    pub fn fleet(mut self, fleet: Arc<dyn FleetAvailability>) -> Self {
        self.fleet = Some(fleet);
        self
    }

    pub fn build(self) -> Result<ServerState, &'static str> {
        let config = self.config.ok_or("Config is required")?;
        let pricing = self
            .pricing
            .unwrap_or_else(|| Arc::new(FlatFare::new(config.booking.base_fare)));
        let fleet = self
            .fleet
            .unwrap_or_else(|| Arc::new(StaticFleet::default()));

        let bookings = Arc::new(BookingRegistry::with_pricing(&config.booking, pricing));
        let dispatcher = RequestDispatcher::new(
            Arc::clone(&bookings),
            fleet,
            config.booking.currency_symbol.clone(),
        );
        let resources = create_resources(Arc::clone(&bookings));
        let prompts = create_prompts();

        Ok(ServerState::new(
            config,
            bookings,
            dispatcher,
            resources,
            prompts,
        ))
    }
}

impl Default for ServerStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
