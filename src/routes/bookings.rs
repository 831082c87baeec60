use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::Serialize;

use crate::db::bookings::BookingStore;
use crate::models::bookings::BookingStatus;
use crate::routes::admin::bookings::QuoteView;
use crate::routes::error_response;
use crate::services::booking_service::BookingService;

#[derive(Debug, Serialize)]
pub struct CancellationResponse {
    pub success: bool,
    pub booking_id: String,
    pub status: BookingStatus,
    pub refund_quote: Option<QuoteView>,
}

pub fn config<S: BookingStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings").route("/{id}/cancel", web::post().to(cancel_booking::<S>)),
    );
}

pub async fn cancel_booking<S: BookingStore>(
    store: web::Data<S>,
    path: web::Path<String>,
) -> impl Responder {
    let booking_id = path.into_inner();

    let booking = match store.find_by_id(&booking_id).await {
        Ok(booking) => booking,
        Err(err) => return error_response(&err),
    };

    let cancelled = match BookingService::request_cancellation(&booking, Utc::now()) {
        Ok(cancelled) => cancelled,
        Err(err) => return error_response(&err),
    };

    if let Err(err) = store.update_status(&cancelled).await {
        return error_response(&err);
    }

    log::info!(
        "Booking {} cancelled by customer, now {}",
        booking_id,
        cancelled.status
    );

    HttpResponse::Ok().json(CancellationResponse {
        success: true,
        booking_id,
        status: cancelled.status,
        refund_quote: cancelled.stored_quote().map(QuoteView::from),
    })
}
