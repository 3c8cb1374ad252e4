//! # Tour Booking Backend
//!
//! Catalog, date availability and checkout logic for a tour-package booking
//! app, plus an optional REST server.
//!
//! ## Architecture
//!
//! - [`models`]: Records shared by every layer (packages, date ranges, bookings)
//! - [`availability`]: Date-range ingestion, membership queries and selection
//! - [`calendar`]: Month grids for the booking calendar
//! - [`inclusions`]: Normalisation of loosely-typed "what's included" data
//! - [`session`]: Explicit signed-in session values
//! - [`services`]: Catalog filtering, booking intents and the checkout flow
//! - [`db`]: Repository traits, local and remote backends, service layer
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod availability;
pub mod calendar;
pub mod db;
pub mod inclusions;
pub mod models;
pub mod services;
pub mod session;

#[cfg(feature = "http-server")]
pub mod http;
