//! Shared fixtures for API integration tests

#![allow(dead_code)]

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use payments_api::{create_router, AppConfig, AppState, ChannelNotifier, LogFormat};
use payments_core::Notification;
use payments_stripe::{generate_test_header, StripeConfig, StripeGateway};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub const WEBHOOK_SECRET: &str = "whsec_test123secret456";
pub const SUCCESS_URL: &str = "http://localhost:3003/payments/success";
pub const CANCEL_URL: &str = "http://localhost:3003/payments/cancel";

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        notify_url: None,
        log_format: LogFormat::Pretty,
    }
}

/// Stripe config aimed at `api_base_url` (a wiremock server, or nothing at all)
pub fn stripe_config(api_base_url: &str) -> StripeConfig {
    StripeConfig::new("sk_test_integration", WEBHOOK_SECRET, SUCCESS_URL, CANCEL_URL)
        .with_api_base_url(api_base_url)
}

/// Test server wired to a channel notifier; the receiver observes dispatches
pub fn test_server(api_base_url: &str) -> (TestServer, UnboundedReceiver<Notification>) {
    test_server_with(stripe_config(api_base_url))
}

pub fn test_server_with(config: StripeConfig) -> (TestServer, UnboundedReceiver<Notification>) {
    let gateway = StripeGateway::new(config).unwrap();
    let (notifier, receiver) = ChannelNotifier::new();
    let state = AppState::from_parts(test_config(), Arc::new(gateway), Arc::new(notifier));

    (TestServer::new(create_router(state)).unwrap(), receiver)
}

pub fn signature_header(payload: &[u8], secret: &str, timestamp: i64) -> String {
    generate_test_header(secret, timestamp, payload).unwrap()
}

pub fn stripe_signature() -> HeaderName {
    HeaderName::from_static("stripe-signature")
}

pub fn header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap()
}

/// A Stripe event body, serialized once so the signature covers these exact bytes
pub fn event_payload(event_type: &str, object: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "id": "evt_test_123",
        "object": "event",
        "type": event_type,
        "created": chrono::Utc::now().timestamp(),
        "data": { "object": object }
    }))
    .unwrap()
}

pub fn charge_object(order_id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "ch_test_123",
        "object": "charge",
        "amount": 3998,
        "currency": "usd",
        "paid": true,
        "receipt_url": "https://pay.stripe.com/receipts/ch_test_123",
        "metadata": { "orderId": order_id }
    })
}
