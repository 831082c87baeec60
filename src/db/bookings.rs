use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use std::sync::Arc;

use crate::models::bookings::{Booking, BookingError};

const BOOKINGS_COLLECTION: &str = "Bookings";

/// Persistence for booking records used by the admin and cancellation routes.
#[allow(async_fn_in_trait)]
pub trait BookingStore {
    async fn find_all(&self) -> Result<Vec<Booking>, BookingError>;

    async fn find_by_id(&self, id: &str) -> Result<Booking, BookingError>;

    /// Persist the status, cancellation request time and frozen refund quote of `booking`.
    async fn update_status(&self, booking: &Booking) -> Result<(), BookingError>;

    async fn ping(&self) -> Result<(), BookingError>;
}

#[derive(Clone)]
pub struct MongoBookingStore {
    client: Arc<Client>,
    database: String,
}

impl MongoBookingStore {
    pub fn new(client: Arc<Client>, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }

    fn collection(&self) -> Collection<Booking> {
        self.client
            .database(&self.database)
            .collection(BOOKINGS_COLLECTION)
    }
}

fn parse_id(id: &str) -> Result<ObjectId, BookingError> {
    ObjectId::parse_str(id).map_err(|_| BookingError::InvalidId(id.to_string()))
}

/// `$set` update carrying the workflow fields of `booking`, with timestamps as BSON dates.
fn status_update(booking: &Booking) -> Document {
    doc! {
        "$set": {
            "status": booking.status.as_str(),
            "cancelled_before_payment": booking.cancelled_before_payment,
            "cancellation_requested_at": booking
                .cancellation_requested_at
                .map(bson::DateTime::from_chrono),
            "days_until_trip": booking.days_until_trip,
            "refund_percentage": booking.refund_percentage.map(i32::from),
            "refund_amount": booking.refund_amount,
            "updated_at": booking.updated_at.map(bson::DateTime::from_chrono),
        }
    }
}

impl BookingStore for MongoBookingStore {
    async fn find_all(&self) -> Result<Vec<Booking>, BookingError> {
        let cursor = self.collection().find(doc! {}).await?;
        let bookings = cursor.try_collect::<Vec<Booking>>().await?;
        Ok(bookings)
    }

    async fn find_by_id(&self, id: &str) -> Result<Booking, BookingError> {
        let object_id = parse_id(id)?;
        self.collection()
            .find_one(doc! { "_id": object_id })
            .await?
            .ok_or(BookingError::NotFound)
    }

    async fn update_status(&self, booking: &Booking) -> Result<(), BookingError> {
        let object_id = booking.id.ok_or(BookingError::NotFound)?;
        let update = status_update(booking);

        let result = self
            .collection()
            .update_one(doc! { "_id": object_id }, update)
            .await?;
        if result.matched_count == 0 {
            return Err(BookingError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), BookingError> {
        self.client
            .database(&self.database)
            .run_command(doc! {"ping": 1})
            .await?;
        Ok(())
    }
}
