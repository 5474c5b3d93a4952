//! # Webhook Signature Verification
//!
//! Stripe signs every webhook delivery with the endpoint secret:
//!
//! ```text
//! Stripe-Signature: t=<unix seconds>,v1=<hex hmac>[,v1=<hex hmac>...]
//! v1 = hex(HMAC-SHA256(endpoint_secret, "<t>." ++ raw_body))
//! ```
//!
//! The HMAC covers the body bytes exactly as received. Verifying against a
//! re-serialized body will fail.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use payments_core::{PaymentError, PaymentResult, WebhookEvent};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_SCHEME: &str = "v1";

/// Parsed `Stripe-Signature` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub signatures: Vec<String>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> PaymentResult<Self> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => timestamp = value.parse().ok(),
                SIGNATURE_SCHEME => signatures.push(value.to_string()),
                _ => {}
            }
        }

        match timestamp {
            Some(timestamp) if !signatures.is_empty() => Ok(Self {
                timestamp,
                signatures,
            }),
            _ => Err(PaymentError::WebhookVerificationFailed(
                "Unable to extract timestamp and signatures from header".to_string(),
            )),
        }
    }
}

fn mac_for(secret: &str, timestamp: i64, payload: &[u8]) -> PaymentResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Hex-encoded `v1` signature for a payload
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> PaymentResult<String> {
    let mac = mac_for(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build a valid `Stripe-Signature` header, for tests and local tooling
pub fn generate_test_header(secret: &str, timestamp: i64, payload: &[u8]) -> PaymentResult<String> {
    let signature = compute_signature(secret, timestamp, payload)?;
    Ok(format!("t={},{}={}", timestamp, SIGNATURE_SCHEME, signature))
}

/// Verify a signature header against the raw payload.
///
/// `now` is the current unix time; `tolerance_secs` of 0 skips the
/// timestamp check.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> PaymentResult<()> {
    let header = SignatureHeader::parse(header)?;

    // verify_slice compares in constant time
    let mut matched = false;
    for candidate in &header.signatures {
        let Ok(candidate) = hex::decode(candidate) else {
            continue;
        };
        if mac_for(secret, header.timestamp, payload)?
            .verify_slice(&candidate)
            .is_ok()
        {
            matched = true;
            break;
        }
    }

    if !matched {
        return Err(PaymentError::WebhookVerificationFailed(
            "No signatures found matching the expected signature for payload".to_string(),
        ));
    }

    if tolerance_secs > 0 && now.abs_diff(header.timestamp) > tolerance_secs.unsigned_abs() {
        return Err(PaymentError::WebhookVerificationFailed(
            "Timestamp outside the tolerance zone".to_string(),
        ));
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

/// Verify the payload and parse it into a `WebhookEvent`
pub fn construct_event(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> PaymentResult<WebhookEvent> {
    verify_signature(payload, header, secret, tolerance_secs, Utc::now().timestamp())?;

    let event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
        PaymentError::WebhookParseError(format!("Webhook payload is not a valid event: {}", e))
    })?;

    Ok(WebhookEvent {
        id: event.id,
        event_type: event.event_type,
        provider: "stripe".to_string(),
        object: event.data.object,
        created_at: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}
