//! # Stripe Webhook Handling
//!
//! Interpretation of verified Stripe events. Only `charge.succeeded` is
//! acted on; everything else is acknowledged and ignored.

use payments_core::{PaymentError, PaymentResult, PaymentSucceeded, WebhookEvent, CHARGE_SUCCEEDED};

/// Metadata key the session creator stores the order id under
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

/// Events that must be enabled on the Stripe webhook endpoint
pub const REQUIRED_WEBHOOK_EVENTS: &[&str] = &[CHARGE_SUCCEEDED];

/// Fields of a `charge.succeeded` event's Charge object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeSucceededData {
    pub charge_id: String,
    pub order_id: String,
    pub receipt_url: Option<String>,
}

impl ChargeSucceededData {
    /// Parse from a webhook event
    pub fn from_event(event: &WebhookEvent) -> PaymentResult<Self> {
        let charge_id = event
            .object_str("id")
            .map(String::from)
            .ok_or_else(|| PaymentError::WebhookParseError("Missing charge id".to_string()))?;

        let order_id = event
            .metadata_str(ORDER_ID_METADATA_KEY)
            .map(String::from)
            .ok_or_else(|| {
                PaymentError::WebhookParseError(format!(
                    "Charge {} has no metadata.{}",
                    charge_id, ORDER_ID_METADATA_KEY
                ))
            })?;

        let receipt_url = event.object_str("receipt_url").map(String::from);

        Ok(Self {
            charge_id,
            order_id,
            receipt_url,
        })
    }
}

impl From<ChargeSucceededData> for PaymentSucceeded {
    fn from(data: ChargeSucceededData) -> Self {
        Self {
            stripe_payment_id: data.charge_id,
            order_id: data.order_id,
            receipt_url: data.receipt_url,
        }
    }
}

/// What the webhook endpoint should do with a verified event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookDispatch {
    /// Forward to the notification channel
    PaymentSucceeded(PaymentSucceeded),
    /// Acknowledge without further action
    Ignored { event_type: String },
}

/// Classify a verified event.
///
/// A `charge.succeeded` event without an order id is an error: it cannot
/// be correlated to an order.
pub fn dispatch_webhook_event(event: &WebhookEvent) -> PaymentResult<WebhookDispatch> {
    if !event.is_charge_succeeded() {
        return Ok(WebhookDispatch::Ignored {
            event_type: event.event_type.clone(),
        });
    }

    let data = ChargeSucceededData::from_event(event)?;
    Ok(WebhookDispatch::PaymentSucceeded(data.into()))
}
