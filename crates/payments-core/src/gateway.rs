//! # Gateway Traits
//!
//! Seams between the HTTP layer and the outside world: the payment
//! provider on one side, the downstream notification consumer on the other.
//!
//! ```text
//!   handlers ──► PaymentGateway ──► provider API (Stripe)
//!       │
//!       └──────► PaymentNotifier ──► log / HTTP / in-process channel
//! ```

use crate::error::PaymentResult;
use crate::event::{Notification, WebhookEvent};
use crate::session::{CheckoutSession, PaymentSessionRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// A payment provider able to open hosted checkouts and authenticate its webhooks.
///
/// Implementations own their API client and secrets; they are built once at
/// startup and shared behind an `Arc`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted checkout session for the order.
    ///
    /// The order id is attached to the resulting payment as metadata so the
    /// provider echoes it back on later webhook events.
    async fn create_session(&self, request: &PaymentSessionRequest)
        -> PaymentResult<CheckoutSession>;

    /// Verify a webhook signature against the raw body and parse the event.
    ///
    /// `payload` must be the exact bytes received; re-serialized JSON will
    /// not verify.
    fn construct_event(&self, payload: &[u8], signature: &str) -> PaymentResult<WebhookEvent>;

    /// Get the provider name (for logging and routing).
    fn provider_name(&self) -> &'static str;
}

/// Delivers notifications to whichever component consumes them.
///
/// Delivery is best-effort: callers do not retry on error.
#[async_trait]
pub trait PaymentNotifier: Send + Sync {
    async fn emit(&self, notification: &Notification) -> PaymentResult<()>;

    /// Transport name, for logging
    fn transport(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// Type alias for a shared notifier (dynamic dispatch)
pub type BoxedPaymentNotifier = Arc<dyn PaymentNotifier>;
