//! # Event Types
//!
//! Verified provider webhook events and the normalized notification
//! emitted to downstream consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider event type for a captured charge
pub const CHARGE_SUCCEEDED: &str = "charge.succeeded";

/// Notification pattern emitted for a successful payment
pub const PAYMENT_SUCCEEDED: &str = "payment.succeeded";

/// A webhook event whose signature has been verified
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider
    pub id: String,

    /// Provider event type (e.g. `charge.succeeded`)
    pub event_type: String,

    /// Provider name
    pub provider: String,

    /// The event's `data.object`
    pub object: serde_json::Map<String, serde_json::Value>,

    /// When the provider created the event
    pub created_at: DateTime<Utc>,
}

impl WebhookEvent {
    pub fn is_charge_succeeded(&self) -> bool {
        self.event_type == CHARGE_SUCCEEDED
    }

    /// String field of `data.object`
    pub fn object_str(&self, key: &str) -> Option<&str> {
        self.object.get(key).and_then(|v| v.as_str())
    }

    /// String entry of `data.object.metadata`
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.object
            .get("metadata")
            .and_then(|m| m.get(key))
            .and_then(|v| v.as_str())
    }
}

/// Normalized payload for a successful charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceeded {
    pub stripe_payment_id: String,
    pub order_id: String,
    pub receipt_url: Option<String>,
}

/// Envelope delivered on the internal notification channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique message id, lets consumers drop duplicates
    pub id: Uuid,

    /// Event name (e.g. `payment.succeeded`)
    pub pattern: String,

    pub data: PaymentSucceeded,

    pub emitted_at: DateTime<Utc>,
}

impl Notification {
    pub fn payment_succeeded(data: PaymentSucceeded) -> Self {
        Self {
            id: Uuid::new_v4(),
            pattern: PAYMENT_SUCCEEDED.to_string(),
            data,
            emitted_at: Utc::now(),
        }
    }
}
