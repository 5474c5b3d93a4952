//! # payments-api
//!
//! HTTP API layer for the payments gateway.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Checkout session endpoint
//! - Stripe webhook endpoint with downstream notification
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/payments/create-payment-session` | Create checkout session |
//! | GET | `/payments/success` | Success landing |
//! | GET | `/payments/cancel` | Cancel landing |
//! | POST | `/payments/webhook` | Stripe webhook |

pub mod handlers;
pub mod notifier;
pub mod routes;
pub mod state;

pub use notifier::{ChannelNotifier, HttpNotifier, LoggingNotifier};
pub use routes::create_router;
pub use state::{AppConfig, AppState, LogFormat};
