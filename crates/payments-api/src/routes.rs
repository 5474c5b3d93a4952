//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - POST /payments/create-payment-session - Create checkout session
/// - GET  /payments/success - Success landing
/// - GET  /payments/cancel - Cancel landing
/// - POST /payments/webhook - Stripe webhook handler (raw body)
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Browser-facing routes
    let checkout_routes = Router::new()
        .route(
            "/create-payment-session",
            post(handlers::create_payment_session),
        )
        .route("/success", get(handlers::payment_success))
        .route("/cancel", get(handlers::payment_cancel))
        .layer(cors);

    // Provider callbacks: no CORS, body must stay raw
    let webhook_routes = Router::new().route("/webhook", post(handlers::stripe_webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/payments", checkout_routes.merge(webhook_routes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
