pub mod booking_service;
pub mod refund_service;
