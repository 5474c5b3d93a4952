//! # Payments Gateway
//!
//! Stripe checkout sessions and webhook relay.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_ENDPOINT_SECRET=whsec_...
//! export STRIPE_SUCCESS_URL=http://localhost:3003/payments/success
//! export STRIPE_CANCEL_URL=http://localhost:3003/payments/cancel
//!
//! # Optional: forward payment.succeeded downstream
//! export NOTIFY_URL=http://localhost:3002/events
//!
//! # Run the server
//! payments-gateway
//! ```

use payments_api::{routes, state::AppState, LogFormat};
use payments_stripe::REQUIRED_WEBHOOK_EVENTS;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = AppState::new();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    let log_format = state
        .as_ref()
        .map(|s| s.config.log_format)
        .unwrap_or(LogFormat::Pretty);
    match log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
    }

    let state = state?;
    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.gateway.provider_name());
    info!("Notification transport: {}", state.notifier.transport());

    let app = routes::create_router(state);

    info!("Payments gateway starting on http://{}", addr);

    if !is_prod {
        info!("Checkout: POST http://{}/payments/create-payment-session", addr);
        info!(
            "Webhook: POST http://{}/payments/webhook (events: {})",
            addr,
            REQUIRED_WEBHOOK_EVENTS.join(", ")
        );
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
