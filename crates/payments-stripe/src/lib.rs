//! # payments-stripe
//!
//! Stripe gateway for the payments gateway.
//!
//! - **StripeGateway** opens Checkout Sessions for an order, embedding the
//!   order id as payment-intent metadata, and verifies webhook deliveries.
//! - **signature** implements `Stripe-Signature` verification over the raw body.
//! - **webhook** turns a verified `charge.succeeded` event into a
//!   `PaymentSucceeded` payload.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use payments_stripe::StripeGateway;
//! use payments_core::PaymentGateway;
//!
//! let gateway = StripeGateway::from_env()?;
//! let session = gateway.create_session(&request).await?;
//! // Redirect user to session.url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use payments_stripe::{dispatch_webhook_event, WebhookDispatch};
//!
//! let event = gateway.construct_event(&raw_body, signature_header)?;
//! if let WebhookDispatch::PaymentSucceeded(payload) = dispatch_webhook_event(&event)? {
//!     notifier.emit(&Notification::payment_succeeded(payload)).await?;
//! }
//! ```

pub mod checkout;
pub mod config;
pub mod signature;
pub mod webhook;

// Re-exports
pub use checkout::StripeGateway;
pub use config::StripeConfig;
pub use signature::{construct_event, generate_test_header, verify_signature, SignatureHeader};
pub use webhook::{
    dispatch_webhook_event, ChargeSucceededData, WebhookDispatch, ORDER_ID_METADATA_KEY,
    REQUIRED_WEBHOOK_EVENTS,
};
