use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::bookings::{Booking, BookingError, BookingQuery, BookingStatus, RefundQuote};
use crate::services::refund_service::{evaluate_refund, round_to_minor_units};

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub search: Option<String>,
}

impl BookingFilter {
    /// Build a filter from query parameters. An empty or `all` status means no status filter.
    pub fn from_query(query: &BookingQuery) -> Result<Self, BookingError> {
        let status = match query.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(s) => Some(BookingStatus::parse(s)?),
        };
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(Self { status, search })
    }

    fn matches(&self, booking: &Booking) -> bool {
        if let Some(status) = self.status {
            if booking.status != status {
                return false;
            }
        }

        match &self.search {
            None => true,
            Some(term) => [
                booking.customer_name.clone(),
                booking.package_name.clone(),
                booking.id_hex(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(term.as_str())),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RevenueSummary {
    pub gross: f64,
    pub refunded: f64,
    pub pending_refunds: f64,
    pub net: f64,
    pub booking_counts: BTreeMap<&'static str, usize>,
}

pub struct BookingService;

impl BookingService {
    /// Move a booking to `new_status`, returning the updated record.
    ///
    /// Entering a cancellation status stamps the request time once and freezes the
    /// refund quote against that instant, so later admin visits see the same tier.
    /// Bookings cancelled from `pending_payment` collected nothing: they are marked
    /// as such, get no quote, and can never be moved into the refund flow.
    pub fn apply_status_change(
        booking: &Booking,
        new_status: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        booking.status.validate_transition(new_status)?;
        if booking.cancelled_before_payment && new_status == BookingStatus::YetToRefund {
            return Err(BookingError::NothingToRefund);
        }

        let mut updated = booking.clone();
        if new_status.is_refund_bearing() {
            let requested_at = *updated.cancellation_requested_at.get_or_insert(now);
            if booking.status == BookingStatus::PendingPayment {
                updated.cancelled_before_payment = true;
            } else if updated.stored_quote().is_none() {
                updated.set_quote(evaluate_refund(updated.date, updated.amount, requested_at));
            }
        }
        updated.status = new_status;
        updated.updated_at = Some(now);

        log::debug!(
            "Booking {} moved from {} to {}",
            booking.id_hex().unwrap_or_default(),
            booking.status,
            new_status
        );

        Ok(updated)
    }

    /// Customer-initiated cancellation.
    ///
    /// Unpaid bookings are simply cancelled. Paid bookings go to `yet_to_refund`
    /// when the quote owes money and to `cancelled` otherwise.
    pub fn request_cancellation(
        booking: &Booking,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        let target = match booking.status {
            BookingStatus::PendingPayment => BookingStatus::Cancelled,
            BookingStatus::Confirmed => {
                let quote = booking.stored_quote().unwrap_or_else(|| {
                    evaluate_refund(
                        booking.date,
                        booking.amount,
                        booking.cancellation_requested_at.unwrap_or(now),
                    )
                });
                if quote.refund_amount > 0.0 {
                    BookingStatus::YetToRefund
                } else {
                    BookingStatus::Cancelled
                }
            }
            other => {
                return Err(BookingError::InvalidTransition {
                    from: other,
                    to: BookingStatus::Cancelled,
                })
            }
        };

        Self::apply_status_change(booking, target, now)
    }

    /// Quote to show an admin: the frozen one if stored, otherwise computed for
    /// cancellation statuses from the request time (or `now` if it was never recorded).
    /// Unpaid cancellations have nothing to quote.
    pub fn display_quote(booking: &Booking, now: DateTime<Utc>) -> Option<RefundQuote> {
        if booking.cancelled_before_payment {
            return None;
        }

        booking.stored_quote().or_else(|| {
            booking.status.is_refund_bearing().then(|| {
                evaluate_refund(
                    booking.date,
                    booking.amount,
                    booking.cancellation_requested_at.unwrap_or(now),
                )
            })
        })
    }

    /// Filter for the admin booking history, soonest trip first.
    pub fn filter_bookings(bookings: Vec<Booking>, filter: &BookingFilter) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = bookings
            .into_iter()
            .filter(|booking| filter.matches(booking))
            .collect();
        bookings.sort_by_key(|booking| booking.date);
        bookings
    }

    pub fn revenue_summary(bookings: &[Booking]) -> RevenueSummary {
        let mut booking_counts: BTreeMap<&'static str, usize> = BookingStatus::ALL
            .iter()
            .map(|status| (status.as_str(), 0))
            .collect();

        let mut gross = 0.0;
        let mut refunded = 0.0;
        let mut pending_refunds = 0.0;

        for booking in bookings {
            *booking_counts.entry(booking.status.as_str()).or_insert(0) += 1;

            let refund_amount = booking.refund_amount.unwrap_or(0.0);
            match booking.status {
                BookingStatus::Confirmed | BookingStatus::Completed => gross += booking.amount,
                BookingStatus::YetToRefund => {
                    gross += booking.amount;
                    pending_refunds += refund_amount;
                }
                BookingStatus::Refunded => {
                    gross += booking.amount;
                    refunded += refund_amount;
                }
                // A cancelled booking with a frozen quote was paid for.
                BookingStatus::Cancelled if booking.stored_quote().is_some() => {
                    gross += booking.amount
                }
                BookingStatus::Cancelled | BookingStatus::PendingPayment => {}
            }
        }

        RevenueSummary {
            gross: round_to_minor_units(gross),
            refunded: round_to_minor_units(refunded),
            pending_refunds: round_to_minor_units(pending_refunds),
            net: round_to_minor_units(gross - refunded),
            booking_counts,
        }
    }
}
