//! # Request Handlers
//!
//! Axum request handlers for the payment API.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use payments_core::{BoxedPaymentNotifier, Notification, PaymentError, PaymentSessionRequest};
use payments_stripe::{dispatch_webhook_event, WebhookDispatch};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

/// Header carrying Stripe's webhook signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment session response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentSessionResponse {
    /// Checkout URL (redirect user here)
    pub url: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Webhook acknowledgement
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    /// The signature header as received
    pub sig: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

fn payment_error_to_response(err: PaymentError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), Json(response))
}

fn webhook_rejection(message: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, format!("Webhook Error: {}", message))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payments-gateway",
        "provider": state.gateway.provider_name(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a hosted checkout session for an order
#[instrument(skip(state, request), fields(order_id = %request.order_id, items = request.items.len()))]
pub async fn create_payment_session(
    State(state): State<AppState>,
    Json(request): Json<PaymentSessionRequest>,
) -> Result<Json<CreatePaymentSessionResponse>, (StatusCode, Json<ErrorResponse>)> {
    let session = state.gateway.create_session(&request).await.map_err(|e| {
        error!("Failed to create payment session: {}", e);
        payment_error_to_response(e)
    })?;

    info!(
        "Created payment session: id={}, order={}",
        session.session_id, session.order_id
    );

    Ok(Json(CreatePaymentSessionResponse {
        url: session.url,
        success_url: session.success_url,
        cancel_url: session.cancel_url,
    }))
}

/// Handle Stripe webhook
///
/// The body is taken as raw bytes; the signature covers them verbatim.
#[instrument(skip(state, headers, body), fields(bytes = body.len()))]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, (StatusCode, String)> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .ok_or_else(|| webhook_rejection("Missing stripe-signature header"))?
        .to_str()
        .map_err(|_| webhook_rejection("Invalid stripe-signature header encoding"))?;

    let event = state.gateway.construct_event(&body, signature).map_err(|e| {
        warn!("Webhook verification failed: {}", e);
        if e.is_webhook_rejection() {
            webhook_rejection(&e)
        } else {
            let status = StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, format!("Webhook Error: {}", e))
        }
    })?;

    info!("Received webhook: type={}, id={}", event.event_type, event.id);

    match dispatch_webhook_event(&event) {
        Ok(WebhookDispatch::PaymentSucceeded(payload)) => {
            info!(
                "Payment succeeded: charge={}, order={}",
                payload.stripe_payment_id, payload.order_id
            );
            emit_in_background(
                state.notifier.clone(),
                Notification::payment_succeeded(payload),
            );
        }
        Ok(WebhookDispatch::Ignored { event_type }) => {
            debug!("Ignoring webhook event type {}", event_type);
        }
        Err(e) => {
            // Acknowledged anyway: Stripe redelivery would not fix the payload.
            warn!("Webhook event {} not dispatched: {}", event.id, e);
        }
    }

    Ok(Json(WebhookAck {
        received: true,
        sig: signature.to_string(),
    }))
}

/// Fire-and-forget delivery; failures are logged, never retried
fn emit_in_background(notifier: BoxedPaymentNotifier, notification: Notification) {
    tokio::spawn(async move {
        match notifier.emit(&notification).await {
            Ok(()) => debug!(
                "Notification {} sent via {}",
                notification.id,
                notifier.transport()
            ),
            Err(e) => error!(
                "Dropped notification {} for order {} via {}: {}",
                notification.id,
                notification.data.order_id,
                notifier.transport(),
                e
            ),
        }
    });
}

/// Checkout success landing
pub async fn payment_success() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "message": "Payment successful"
    }))
}

/// Checkout cancel landing
pub async fn payment_cancel() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": false,
        "message": "Payment cancelled"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_payment_error_conversion() {
        let (status, _json) = payment_error_to_response(PaymentError::InvalidRequest(
            "Bad data".to_string(),
        ));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _json) = payment_error_to_response(PaymentError::ProviderError {
            provider: "stripe".to_string(),
            message: "Invalid currency".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_webhook_rejection_body() {
        let (status, body) = webhook_rejection("No signatures found");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Webhook Error: No signatures found");
    }

    #[test]
    fn test_ack_shape() {
        let ack = WebhookAck {
            received: true,
            sig: "t=1,v1=ab".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&ack).unwrap(),
            serde_json::json!({ "received": true, "sig": "t=1,v1=ab" })
        );
    }
}
