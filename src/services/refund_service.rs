use chrono::{DateTime, Utc};

use crate::models::bookings::RefundQuote;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Cancellation refund bands keyed by whole days until the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundTier {
    Full,
    Half,
    NoRefund,
}

impl RefundTier {
    /// 7+ days is a full refund, 4-6 days half, anything closer (or past) nothing.
    pub fn for_days(days_until_trip: i64) -> Self {
        if days_until_trip >= 7 {
            RefundTier::Full
        } else if days_until_trip >= 4 {
            RefundTier::Half
        } else {
            RefundTier::NoRefund
        }
    }

    pub fn from_percentage(percentage: u8) -> Option<Self> {
        match percentage {
            100 => Some(RefundTier::Full),
            50 => Some(RefundTier::Half),
            0 => Some(RefundTier::NoRefund),
            _ => None,
        }
    }

    pub fn percentage(&self) -> u8 {
        match self {
            RefundTier::Full => 100,
            RefundTier::Half => 50,
            RefundTier::NoRefund => 0,
        }
    }

    /// Refund owed on `amount` under this tier, i.e. `amount * percentage / 100`.
    pub fn apply(&self, amount: f64) -> f64 {
        match self {
            RefundTier::Full => amount,
            RefundTier::Half => amount / 2.0,
            RefundTier::NoRefund => 0.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RefundTier::Full => "100% refund (7+ days before trip)",
            RefundTier::Half => "50% refund (4-6 days before trip)",
            RefundTier::NoRefund => "No refund (0-3 days before trip)",
        }
    }
}

/// Whole days from `now` until `trip_date`, rounded up. Negative once the trip has passed.
pub fn days_until_trip(trip_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (trip_date - now).num_milliseconds();
    let days = millis / MILLIS_PER_DAY;
    if millis % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Compute the cancellation refund for a booking relative to `now`.
///
/// The amount is returned unrounded; callers round with [`round_to_minor_units`]
/// when presenting it. `amount` is expected to be non-negative.
pub fn evaluate_refund(trip_date: DateTime<Utc>, amount: f64, now: DateTime<Utc>) -> RefundQuote {
    let days_until_trip = days_until_trip(trip_date, now);
    let tier = RefundTier::for_days(days_until_trip);

    RefundQuote {
        days_until_trip,
        refund_percentage: tier.percentage(),
        refund_amount: tier.apply(amount),
    }
}

pub fn evaluate_refund_now(trip_date: DateTime<Utc>, amount: f64) -> RefundQuote {
    evaluate_refund(trip_date, amount, Utc::now())
}

pub fn round_to_minor_units(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
