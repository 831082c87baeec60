use actix_web::web;

use crate::db::bookings::BookingStore;

pub mod bookings;

pub fn config<S: BookingStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/bookings", web::get().to(bookings::list_bookings::<S>))
            .route("/bookings/{id}", web::get().to(bookings::get_booking::<S>))
            .route(
                "/bookings/{id}/refund-quote",
                web::get().to(bookings::get_refund_quote::<S>),
            )
            .route(
                "/bookings/{id}/status",
                web::put().to(bookings::update_booking_status::<S>),
            )
            .route("/revenue", web::get().to(bookings::get_revenue::<S>)),
    );
}
