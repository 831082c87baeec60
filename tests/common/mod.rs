use actix_web::{web, App};
use chrono::{Duration, Utc};
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use safarigo_api::db::bookings::BookingStore;
use safarigo_api::models::bookings::{Booking, BookingError, BookingStatus};
use safarigo_api::routes;

#[derive(Clone, Default)]
pub struct InMemoryBookingStore {
    bookings: Arc<Mutex<HashMap<String, Booking>>>,
    offline: bool,
}

impl InMemoryBookingStore {
    /// A store whose every call fails as an unreachable database would.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, booking: Booking) -> String {
        let id = booking.id_hex().expect("test bookings carry an id");
        self.bookings.lock().unwrap().insert(id.clone(), booking);
        id
    }

    pub fn get(&self, id: &str) -> Booking {
        self.bookings.lock().unwrap()[id].clone()
    }

    fn check_online(&self) -> Result<(), BookingError> {
        if self.offline {
            Err(BookingError::Database("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl BookingStore for InMemoryBookingStore {
    async fn find_all(&self) -> Result<Vec<Booking>, BookingError> {
        self.check_online()?;
        Ok(self.bookings.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Booking, BookingError> {
        self.check_online()?;
        ObjectId::parse_str(id).map_err(|_| BookingError::InvalidId(id.to_string()))?;
        self.bookings
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(BookingError::NotFound)
    }

    async fn update_status(&self, booking: &Booking) -> Result<(), BookingError> {
        self.check_online()?;
        let id = booking.id_hex().ok_or(BookingError::NotFound)?;
        let mut bookings = self.bookings.lock().unwrap();
        let stored = bookings.get_mut(&id).ok_or(BookingError::NotFound)?;
        stored.status = booking.status;
        stored.cancelled_before_payment = booking.cancelled_before_payment;
        stored.cancellation_requested_at = booking.cancellation_requested_at;
        stored.days_until_trip = booking.days_until_trip;
        stored.refund_percentage = booking.refund_percentage;
        stored.refund_amount = booking.refund_amount;
        stored.updated_at = booking.updated_at;
        Ok(())
    }

    async fn ping(&self) -> Result<(), BookingError> {
        self.check_online()
    }
}

pub fn create_app(
    store: &InMemoryBookingStore,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(store.clone()))
        .configure(routes::config::<InMemoryBookingStore>)
}

/// A booking whose trip is `days_out` days away, less an hour so the count rounds up to exactly `days_out`.
pub fn test_booking(status: BookingStatus, days_out: i64, amount: f64) -> Booking {
    let now = Utc::now();
    Booking {
        id: Some(ObjectId::new()),
        user_id: ObjectId::new(),
        package_id: ObjectId::new(),
        customer_name: Some("Test Customer".to_string()),
        package_name: Some("Serengeti Migration Safari".to_string()),
        date: now + Duration::days(days_out) - Duration::hours(1),
        amount,
        status,
        cancelled_before_payment: false,
        cancellation_requested_at: None,
        days_until_trip: None,
        refund_percentage: None,
        refund_amount: None,
        created_at: Some(now),
        updated_at: Some(now),
    }
}
