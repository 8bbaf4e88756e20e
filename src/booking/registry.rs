//! Concurrency-safe booking store with atomic id allocation.
//!
//! The counter and the map live behind one `parking_lot::RwLock`, so taking the
//! next id and publishing the booking happen in a single critical section.
//! Readers clone what they need and never hold a reference into storage.

use crate::booking::pricing::{FlatFare, PricingStrategy};
use crate::booking::types::{Booking, BookingRequest, BookingStatus};
use crate::config::BookingConfig;
use crate::error::{BookingError, BookingResult};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

struct RegistryInner {
    /// `None` once the last representable id has been issued.
    next_seq: Option<u64>,
    /// Keyed by sequence number, so iteration order is creation order.
    bookings: BTreeMap<u64, Booking>,
}

pub struct BookingRegistry {
    id_prefix: String,
    pricing: Arc<dyn PricingStrategy>,
    inner: RwLock<RegistryInner>,
}

impl BookingRegistry {
    /// Registry with flat pricing at the configured base fare.
    pub fn new(config: &BookingConfig) -> Self {
        Self::with_pricing(config, Arc::new(FlatFare::new(config.base_fare)))
    }

    pub fn with_pricing(config: &BookingConfig, pricing: Arc<dyn PricingStrategy>) -> Self {
        Self {
            id_prefix: config.id_prefix.clone(),
            pricing,
            inner: RwLock::new(RegistryInner {
                next_seq: Some(config.first_id),
                bookings: BTreeMap::new(),
            }),
        }
    }

    /// Validate, price and store a new booking.
    ///
    /// Nothing is stored and no id is consumed when validation fails.
    #[instrument(skip(self, request), fields(pickup = %request.pickup_location))]
    pub fn create(&self, request: BookingRequest) -> BookingResult<Booking> {
        let validated = request.validate()?;
        let fare = self.pricing.fare(&validated);

        let booking = {
            let mut inner = self.inner.write();
            let Some(seq) = inner.next_seq else {
                warn!("Refusing booking: id counter exhausted");
                return Err(BookingError::IdsExhausted);
            };
            let booking = Booking {
                id: format!("{}{}", self.id_prefix, seq),
                pickup_location: validated.pickup_location,
                dropoff_location: validated.dropoff_location,
                pickup_time: validated.pickup_time,
                pickup_at: validated.pickup_at,
                cab_class: validated.cab_class,
                status: BookingStatus::Confirmed,
                fare,
            };
            inner.next_seq = seq.checked_add(1);
            inner.bookings.insert(seq, booking.clone());
            booking
        };

        info!(
            "Created booking {} ({}, fare {})",
            booking.id, booking.cab_class, booking.fare
        );
        Ok(booking)
    }

    /// Look up a booking by its id.
    pub fn get(&self, id: &str) -> BookingResult<Booking> {
        let not_found = || BookingError::NotFound(id.to_string());
        let seq = self.parse_seq(id).ok_or_else(not_found)?;

        let inner = self.inner.read();
        match inner.bookings.get(&seq) {
            // "CAB01000" parses to the same sequence as "CAB1000" but is not that id.
            Some(booking) if booking.id == id => Ok(booking.clone()),
            _ => {
                debug!("Booking lookup miss: {}", id);
                Err(not_found())
            }
        }
    }

    /// All bookings in creation order.
    pub fn list(&self) -> Vec<Booking> {
        self.inner.read().bookings.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().bookings.is_empty()
    }

    fn parse_seq(&self, id: &str) -> Option<u64> {
        let digits = id.strip_prefix(self.id_prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl Default for BookingRegistry {
    fn default() -> Self {
        Self::new(&BookingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::types::{CabClass, ValidatedBooking};
    use rust_decimal::Decimal;
    use std::collections::HashSet;

    fn request(pickup: &str) -> BookingRequest {
        BookingRequest::new(pickup, "Downtown", "2024-01-01T10:00:00", "Premium")
    }

    #[test]
    fn test_create_issues_sequential_ids() {
        let registry = BookingRegistry::default();

        let first = registry.create(request("Airport")).unwrap();
        assert_eq!(first.id, "CAB1000");
        assert_eq!(first.fare, Decimal::new(5000, 2));
        assert_eq!(first.status, BookingStatus::Confirmed);
        assert_eq!(first.cab_class, CabClass::Premium);

        let second = registry.create(request("Station")).unwrap();
        assert_eq!(second.id, "CAB1001");
    }

    #[test]
    fn test_get_after_create() {
        let registry = BookingRegistry::default();
        let created = registry.create(request("Airport")).unwrap();

        let fetched = registry.get(&created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_unknown() {
        let registry = BookingRegistry::default();
        assert_eq!(
            registry.get("CAB9999"),
            Err(BookingError::NotFound("CAB9999".into()))
        );

        registry.create(request("Airport")).unwrap();
        assert!(registry.get("CAB01000").is_err());
        assert!(registry.get("cab1000").is_err());
        assert!(registry.get("CAB").is_err());
        assert!(registry.get("CAB+1000").is_err());
        assert!(registry.get("CAB99999999999999999999999").is_err());
    }

    #[test]
    fn test_counter_exhaustion_is_an_error_not_a_wrap() {
        let config = BookingConfig {
            first_id: u64::MAX,
            ..BookingConfig::default()
        };
        let registry = BookingRegistry::new(&config);

        let last = registry.create(request("Airport")).unwrap();
        assert_eq!(last.id, format!("CAB{}", u64::MAX));

        assert_eq!(
            registry.create(request("Station")),
            Err(BookingError::IdsExhausted)
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list(), vec![last.clone()]);
        assert_eq!(registry.get(&last.id), Ok(last));
    }

    #[test]
    fn test_invalid_input_leaves_registry_unchanged() {
        let registry = BookingRegistry::default();

        let err = registry.create(request("")).unwrap_err();
        assert!(matches!(err, BookingError::InvalidInput { .. }));
        assert!(registry.is_empty());

        // The failed call must not have consumed an id.
        let booking = registry.create(request("Airport")).unwrap();
        assert_eq!(booking.id, "CAB1000");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_in_creation_order() {
        let registry = BookingRegistry::default();
        assert!(registry.list().is_empty());

        for pickup in ["A", "B", "C"] {
            registry.create(request(pickup)).unwrap();
        }

        let listed = registry.list();
        let pickups: Vec<_> = listed.iter().map(|b| b.pickup_location.as_str()).collect();
        assert_eq!(pickups, ["A", "B", "C"]);
    }

    #[test]
    fn test_list_orders_numerically_across_digit_boundary() {
        let config = BookingConfig {
            first_id: 9998,
            ..BookingConfig::default()
        };
        let registry = BookingRegistry::new(&config);
        for pickup in ["A", "B", "C"] {
            registry.create(request(pickup)).unwrap();
        }

        let ids: Vec<_> = registry.list().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, ["CAB9998", "CAB9999", "CAB10000"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let registry = BookingRegistry::default();
        registry.create(request("Airport")).unwrap();

        let mut snapshot = registry.get("CAB1000").unwrap();
        snapshot.pickup_location = "Elsewhere".into();
        assert_eq!(registry.get("CAB1000").unwrap().pickup_location, "Airport");
    }

    #[test]
    fn test_injected_pricing() {
        let pricing = |booking: &ValidatedBooking| match booking.cab_class {
            CabClass::Luxury => Decimal::new(9900, 2),
            _ => Decimal::new(2500, 2),
        };
        let registry = BookingRegistry::with_pricing(&BookingConfig::default(), Arc::new(pricing));

        let luxury = registry
            .create(BookingRequest::new("A", "B", "2024-01-01T10:00:00", "Luxury"))
            .unwrap();
        let standard = registry
            .create(BookingRequest::new("A", "B", "2024-01-01T10:00:00", "Standard"))
            .unwrap();

        assert_eq!(luxury.fare.to_string(), "99.00");
        assert_eq!(standard.fare.to_string(), "25.00");
    }

    #[test]
    fn test_concurrent_creates_get_distinct_ids() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 50;

        let registry = Arc::new(BookingRegistry::default());

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..PER_THREAD)
                        .map(|i| {
                            registry
                                .create(request(&format!("pickup-{}-{}", t, i)))
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            let issued = handle.join().unwrap();
            // Within one caller, ids are strictly increasing.
            let seqs: Vec<u64> = issued
                .iter()
                .map(|id| id.strip_prefix("CAB").unwrap().parse().unwrap())
                .collect();
            assert!(seqs.windows(2).all(|w| w[0] < w[1]));
            ids.extend(issued);
        }

        let total = THREADS * PER_THREAD;
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), total);
        assert_eq!(registry.len(), total);

        let listed: Vec<u64> = registry
            .list()
            .iter()
            .map(|b| b.id.strip_prefix("CAB").unwrap().parse().unwrap())
            .collect();
        let expected: Vec<u64> = (1000..1000 + total as u64).collect();
        assert_eq!(listed, expected);
    }
}
