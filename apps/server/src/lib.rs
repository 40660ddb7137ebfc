//! # Lodge Server
//!
//! REST API for the Lodge hotel management system.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Lodge Server                          │
//! │                                                             │
//! │  Client ───► HTTP (8000) ───► Handlers ───► Engine ───► DB │
//! │                  │                                          │
//! │                  ├── /api/auth/*          register, login  │
//! │                  ├── /api/rooms/*         inventory        │
//! │                  ├── /api/customers/*     directory        │
//! │                  ├── /api/bookings/*      lifecycle + PDF  │
//! │                  └── /api/transactions/*  ledger           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers marshal HTTP to engine and repository calls; no business
//! rules live in this crate.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use lodge_db::{Database, SqliteStore};
use lodge_engine::BookingEngine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub engine: Arc<BookingEngine<SqliteStore>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let engine = Arc::new(BookingEngine::new(db.store()));
        AppState { db, engine }
    }
}

/// Builds the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/rooms",
            get(handlers::rooms::list).post(handlers::rooms::create),
        )
        .route("/api/rooms/available", get(handlers::rooms::available))
        .route(
            "/api/rooms/:id",
            get(handlers::rooms::get)
                .put(handlers::rooms::update)
                .delete(handlers::rooms::delete),
        )
        .route("/api/customers", get(handlers::customers::list))
        .route("/api/customers/:id", get(handlers::customers::get))
        .route(
            "/api/bookings",
            get(handlers::bookings::list).post(handlers::bookings::create),
        )
        .route(
            "/api/bookings/:id",
            get(handlers::bookings::get).delete(handlers::bookings::cancel),
        )
        .route("/api/bookings/:id/receipt", get(handlers::bookings::receipt))
        .route("/api/transactions", get(handlers::transactions::list))
        .route("/api/transactions/:id", get(handlers::transactions::get))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
