//! Fare computation seam.

use crate::booking::types::ValidatedBooking;
use rust_decimal::Decimal;

/// Computes the fare of a booking before it is stored.
///
/// Closures of the right shape implement this too, so tests and callers can
/// inject ad hoc pricing without a new type.
pub trait PricingStrategy: Send + Sync {
    fn fare(&self, booking: &ValidatedBooking) -> Decimal;
}

impl<F> PricingStrategy for F
where
    F: Fn(&ValidatedBooking) -> Decimal + Send + Sync,
{
    fn fare(&self, booking: &ValidatedBooking) -> Decimal {
        self(booking)
    }
}

/// Same fare for every booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatFare {
    amount: Decimal,
}

impl FlatFare {
    pub fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Default for FlatFare {
    fn default() -> Self {
        Self::new(Decimal::new(5000, 2))
    }
}

impl PricingStrategy for FlatFare {
    fn fare(&self, _booking: &ValidatedBooking) -> Decimal {
        self.amount
    }
}
