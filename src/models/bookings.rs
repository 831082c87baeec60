use std::fmt;

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::services::refund_service::RefundTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    PendingPayment,
    Confirmed,
    Completed,
    YetToRefund,
    Refunded,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::PendingPayment,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::YetToRefund,
        BookingStatus::Refunded,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PendingPayment => "pending_payment",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::YetToRefund => "yet_to_refund",
            BookingStatus::Refunded => "refunded",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, BookingError> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| BookingError::UnknownStatus(s.to_string()))
    }

    /// Statuses that carry a cancellation refund quote.
    pub fn is_refund_bearing(&self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::YetToRefund | BookingStatus::Refunded
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Refunded)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;

        matches!(
            (self, next),
            (PendingPayment, Confirmed)
                | (PendingPayment, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Confirmed, YetToRefund)
                | (Cancelled, YetToRefund)
                | (YetToRefund, Refunded)
        )
    }

    pub fn validate_transition(&self, next: BookingStatus) -> Result<(), BookingError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(BookingError::InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Refund owed on cancellation, derived from the trip date and amount paid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefundQuote {
    pub days_until_trip: i64,
    pub refund_percentage: u8,
    pub refund_amount: f64,
}

impl RefundQuote {
    pub fn tier(&self) -> RefundTier {
        RefundTier::from_percentage(self.refund_percentage)
            .unwrap_or_else(|| RefundTier::for_days(self.days_until_trip))
    }
}

/// Optional timestamps stored as native BSON dates.
mod optional_bson_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => bson::DateTime::from_chrono(*dt).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(Option::<bson::DateTime>::deserialize(deserializer)?.map(|dt| dt.to_chrono()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub package_id: ObjectId,
    pub customer_name: Option<String>,
    pub package_name: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub status: BookingStatus,
    /// Set when the booking was cancelled while still awaiting payment.
    #[serde(default)]
    pub cancelled_before_payment: bool,
    #[serde(default, with = "optional_bson_datetime")]
    pub cancellation_requested_at: Option<DateTime<Utc>>,
    pub days_until_trip: Option<i64>,
    pub refund_percentage: Option<u8>,
    pub refund_amount: Option<f64>,
    #[serde(default, with = "optional_bson_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "optional_bson_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// The quote persisted on the record, if all three refund fields are present.
    pub fn stored_quote(&self) -> Option<RefundQuote> {
        Some(RefundQuote {
            days_until_trip: self.days_until_trip?,
            refund_percentage: self.refund_percentage?,
            refund_amount: self.refund_amount?,
        })
    }

    pub fn set_quote(&mut self, quote: RefundQuote) {
        self.days_until_trip = Some(quote.days_until_trip);
        self.refund_percentage = Some(quote.refund_percentage);
        self.refund_amount = Some(quote.refund_amount);
    }

    pub fn id_hex(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid booking ID format: {0}")]
    InvalidId(String),
    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),
    #[error("Booking not found")]
    NotFound,
    #[error("Cannot change booking status from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("Booking was cancelled before payment; there is nothing to refund")]
    NothingToRefund,
    #[error("Database error: {0}")]
    Database(String),
}

impl From<mongodb::error::Error> for BookingError {
    fn from(err: mongodb::error::Error) -> Self {
        BookingError::Database(err.to_string())
    }
}
