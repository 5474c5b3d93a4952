//! # payments-core
//!
//! Core types and traits for the payments gateway.
//!
//! This crate provides:
//! - `PaymentGateway` trait for payment providers
//! - `PaymentNotifier` trait for downstream notification transports
//! - `PaymentSessionRequest` and `CheckoutSession` for the checkout flow
//! - `WebhookEvent`, `PaymentSucceeded` and `Notification` for the webhook flow
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use payments_core::{Currency, PaymentSessionRequest, SessionItem};
//!
//! let request = PaymentSessionRequest::new(Currency::new("usd")?, "order-42")
//!     .with_item(SessionItem::new("Widget", 19.99, 2));
//!
//! let session = gateway.create_session(&request).await?;
//!
//! // Redirect user to session.url
//! ```

pub mod error;
pub mod event;
pub mod gateway;
pub mod session;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use event::{Notification, PaymentSucceeded, WebhookEvent, CHARGE_SUCCEEDED, PAYMENT_SUCCEEDED};
pub use gateway::{BoxedPaymentGateway, BoxedPaymentNotifier, PaymentGateway, PaymentNotifier};
pub use session::{
    to_minor_units, CheckoutSession, Currency, PaymentSessionRequest, SessionItem, MAX_UNIT_AMOUNT,
};
