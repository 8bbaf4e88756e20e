//! Cab availability source.

use crate::booking::types::CabClass;
use serde::{Deserialize, Serialize};

/// Number of free cabs of one class and how soon the nearest one arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CabAvailability {
    pub cab_class: CabClass,
    pub count: u32,
    pub eta_minutes: u32,
}

/// Anything that can report cab availability near a location.
pub trait FleetAvailability: Send + Sync {
    fn available(&self, location: &str) -> Vec<CabAvailability>;
}

/// Fixed availability table, the same for every location.
#[derive(Debug, Clone)]
pub struct StaticFleet {
    entries: Vec<CabAvailability>,
}

impl StaticFleet {
    pub fn new(entries: Vec<CabAvailability>) -> Self {
        Self { entries }
    }
}

impl Default for StaticFleet {
    fn default() -> Self {
        Self::new(vec![
            CabAvailability {
                cab_class: CabClass::Standard,
                count: 5,
                eta_minutes: 3,
            },
            CabAvailability {
                cab_class: CabClass::Premium,
                count: 3,
                eta_minutes: 5,
            },
            CabAvailability {
                cab_class: CabClass::Luxury,
                count: 1,
                eta_minutes: 8,
            },
        ])
    }
}

impl FleetAvailability for StaticFleet {
    // TODO: filter by location once a live inventory source exists
    fn available(&self, _location: &str) -> Vec<CabAvailability> {
        self.entries.clone()
    }
}
