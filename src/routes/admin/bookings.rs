use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::Serialize;

use crate::db::bookings::BookingStore;
use crate::models::bookings::{Booking, BookingQuery, BookingStatus, RefundQuote, UpdateStatusRequest};
use crate::routes::error_response;
use crate::services::booking_service::{BookingFilter, BookingService};
use crate::services::refund_service::{evaluate_refund_now, round_to_minor_units};

/// Refund quote as shown to an admin, with the amount rounded to cents.
#[derive(Debug, Serialize)]
pub struct QuoteView {
    pub days_until_trip: i64,
    pub refund_percentage: u8,
    pub refund_amount: f64,
    pub policy: &'static str,
}

impl From<RefundQuote> for QuoteView {
    fn from(quote: RefundQuote) -> Self {
        Self {
            days_until_trip: quote.days_until_trip,
            refund_percentage: quote.refund_percentage,
            refund_amount: round_to_minor_units(quote.refund_amount),
            policy: quote.tier().description(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingDetails {
    pub booking: Booking,
    pub refund_quote: Option<QuoteView>,
}

#[derive(Debug, Serialize)]
pub struct RefundPreview {
    pub booking_id: String,
    pub status: BookingStatus,
    pub amount: f64,
    pub quote: QuoteView,
    pub frozen_quote: Option<QuoteView>,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub message: String,
    pub booking: Booking,
    pub refund_quote: Option<QuoteView>,
}

pub async fn list_bookings<S: BookingStore>(
    store: web::Data<S>,
    query: web::Query<BookingQuery>,
) -> impl Responder {
    let filter = match BookingFilter::from_query(&query) {
        Ok(filter) => filter,
        Err(err) => return error_response(&err),
    };

    match store.find_all().await {
        Ok(bookings) => {
            let bookings = BookingService::filter_bookings(bookings, &filter);
            log::info!("Listing {} bookings", bookings.len());
            HttpResponse::Ok().json(bookings)
        }
        Err(err) => error_response(&err),
    }
}

pub async fn get_booking<S: BookingStore>(
    store: web::Data<S>,
    path: web::Path<String>,
) -> impl Responder {
    let booking_id = path.into_inner();

    match store.find_by_id(&booking_id).await {
        Ok(booking) => {
            let refund_quote =
                BookingService::display_quote(&booking, Utc::now()).map(QuoteView::from);
            HttpResponse::Ok().json(BookingDetails {
                booking,
                refund_quote,
            })
        }
        Err(err) => error_response(&err),
    }
}

/// Live preview of what cancelling right now would refund.
pub async fn get_refund_quote<S: BookingStore>(
    store: web::Data<S>,
    path: web::Path<String>,
) -> impl Responder {
    let booking_id = path.into_inner();

    match store.find_by_id(&booking_id).await {
        Ok(booking) => HttpResponse::Ok().json(RefundPreview {
            booking_id,
            status: booking.status,
            amount: booking.amount,
            quote: evaluate_refund_now(booking.date, booking.amount).into(),
            frozen_quote: booking.stored_quote().map(QuoteView::from),
        }),
        Err(err) => error_response(&err),
    }
}

pub async fn update_booking_status<S: BookingStore>(
    store: web::Data<S>,
    path: web::Path<String>,
    input: web::Json<UpdateStatusRequest>,
) -> impl Responder {
    let booking_id = path.into_inner();

    let new_status = match BookingStatus::parse(&input.status) {
        Ok(status) => status,
        Err(err) => return error_response(&err),
    };

    let booking = match store.find_by_id(&booking_id).await {
        Ok(booking) => booking,
        Err(err) => return error_response(&err),
    };

    let updated = match BookingService::apply_status_change(&booking, new_status, Utc::now()) {
        Ok(updated) => updated,
        Err(err) => {
            log::warn!("Rejected status change for booking {}: {}", booking_id, err);
            return error_response(&err);
        }
    };

    if let Err(err) = store.update_status(&updated).await {
        return error_response(&err);
    }

    log::info!(
        "Booking {} status updated from {} to {}",
        booking_id,
        booking.status,
        updated.status
    );

    HttpResponse::Ok().json(UpdateStatusResponse {
        success: true,
        message: format!("Booking status updated to {}", updated.status),
        refund_quote: updated.stored_quote().map(QuoteView::from),
        booking: updated,
    })
}

pub async fn get_revenue<S: BookingStore>(store: web::Data<S>) -> impl Responder {
    match store.find_all().await {
        Ok(bookings) => HttpResponse::Ok().json(BookingService::revenue_summary(&bookings)),
        Err(err) => error_response(&err),
    }
}
