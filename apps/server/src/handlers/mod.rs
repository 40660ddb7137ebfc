//! # HTTP Handlers
//!
//! One module per API surface. Handlers decode the request, call the
//! engine or a repository, and encode the response; errors funnel
//! through [`crate::error::ApiError`].

pub mod auth;
pub mod bookings;
pub mod customers;
pub mod rooms;
pub mod transactions;
