use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::db::bookings::BookingStore;
use crate::models::bookings::BookingError;

pub mod admin;
pub mod bookings;
pub mod health;

pub fn config<S: BookingStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check::<S>))
        .service(
            web::scope("/api")
                .configure(admin::config::<S>)
                .configure(bookings::config::<S>),
        );
}

pub(crate) fn error_response(err: &BookingError) -> HttpResponse {
    let body = json!({
        "success": false,
        "message": err.to_string(),
    });

    match err {
        BookingError::InvalidId(_) | BookingError::UnknownStatus(_) => {
            HttpResponse::BadRequest().json(body)
        }
        BookingError::NotFound => HttpResponse::NotFound().json(body),
        BookingError::InvalidTransition { .. } | BookingError::NothingToRefund => {
            HttpResponse::Conflict().json(body)
        }
        BookingError::Database(e) => {
            log::error!("Booking store failure: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}
