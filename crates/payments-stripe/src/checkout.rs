//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API, plus webhook event
//! construction, behind the `PaymentGateway` trait.

use crate::config::StripeConfig;
use crate::signature;
use crate::webhook::ORDER_ID_METADATA_KEY;
use async_trait::async_trait;
use chrono::Utc;
use payments_core::{
    CheckoutSession, PaymentError, PaymentGateway, PaymentResult, PaymentSessionRequest,
    WebhookEvent,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe gateway
///
/// Owns its HTTP client and configuration; build one at startup and share it.
pub struct StripeGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    /// Build form data for `POST /v1/checkout/sessions`
    fn build_form_params(&self, request: &PaymentSessionRequest) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), self.config.success_url.clone()),
            ("cancel_url".to_string(), self.config.cancel_url.clone()),
            (
                format!("payment_intent_data[metadata][{}]", ORDER_ID_METADATA_KEY),
                request.order_id.clone(),
            ),
        ];

        for (i, item) in request.items.iter().enumerate() {
            form_params.push((
                format!("line_items[{}][price_data][currency]", i),
                request.currency.as_str().to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount().to_string(),
            ));
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    async fn create_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> PaymentResult<CheckoutSession> {
        request.validate()?;

        let form_params = self.build_form_params(request);

        debug!(
            "Creating Stripe checkout session: {} items, currency={}, total={:?}",
            request.items.len(),
            request.currency,
            request.total_amount()
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        let checkout_url = session.url.ok_or_else(|| PaymentError::ProviderError {
            provider: PROVIDER.to_string(),
            message: format!("Checkout session {} has no url", session.id),
        })?;

        info!(
            "Created Stripe checkout session: id={}, url={}",
            session.id, checkout_url
        );

        Ok(CheckoutSession {
            session_id: session.id,
            order_id: request.order_id.clone(),
            url: checkout_url,
            success_url: session
                .success_url
                .unwrap_or_else(|| self.config.success_url.clone()),
            cancel_url: session
                .cancel_url
                .unwrap_or_else(|| self.config.cancel_url.clone()),
            created_at: Utc::now(),
        })
    }

    #[instrument(skip(self, payload, signature), fields(bytes = payload.len()))]
    fn construct_event(&self, payload: &[u8], signature: &str) -> PaymentResult<WebhookEvent> {
        let event = signature::construct_event(
            payload,
            signature,
            &self.config.webhook_secret,
            self.config.webhook_tolerance_secs,
        )?;

        debug!("Verified Stripe webhook: type={}, id={}", event.event_type, event.id);
        Ok(event)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    success_url: Option<String>,
    #[serde(default)]
    cancel_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use payments_core::{Currency, SessionItem};

    fn gateway() -> StripeGateway {
        StripeGateway::new(StripeConfig::new(
            "sk_test_abc",
            "whsec_test",
            "https://shop.example/payments/success",
            "https://shop.example/payments/cancel",
        ))
        .unwrap()
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_widget_line_item() {
        let request = PaymentSessionRequest::new(Currency::new("usd").unwrap(), "o1")
            .with_item(SessionItem::new("Widget", 19.99, 2));
        let params = gateway().build_form_params(&request);

        assert_eq!(param(&params, "line_items[0][price_data][unit_amount]"), Some("1999"));
        assert_eq!(param(&params, "line_items[0][quantity]"), Some("2"));
        assert_eq!(param(&params, "line_items[0][price_data][currency]"), Some("usd"));
        assert_eq!(
            param(&params, "line_items[0][price_data][product_data][name]"),
            Some("Widget")
        );
    }

    #[test]
    fn test_session_params() {
        let request = PaymentSessionRequest::new(Currency::new("EUR").unwrap(), "order-77")
            .with_item(SessionItem::new("A", 1.0, 1));
        let params = gateway().build_form_params(&request);

        assert_eq!(param(&params, "mode"), Some("payment"));
        assert_eq!(
            param(&params, "payment_intent_data[metadata][orderId]"),
            Some("order-77")
        );
        assert_eq!(
            param(&params, "success_url"),
            Some("https://shop.example/payments/success")
        );
        assert_eq!(
            param(&params, "cancel_url"),
            Some("https://shop.example/payments/cancel")
        );
        assert_eq!(param(&params, "line_items[0][price_data][currency]"), Some("eur"));
    }

    #[test]
    fn test_unit_amounts_for_every_item() {
        let prices = [0.01, 0.5, 1.1, 9.95, 19.99, 20.0, 123.45, 999.99];
        let mut request = PaymentSessionRequest::new(Currency::new("usd").unwrap(), "o1");
        for (i, price) in prices.iter().enumerate() {
            request = request.with_item(SessionItem::new(format!("item-{}", i), *price, 1));
        }
        let params = gateway().build_form_params(&request);

        for (i, price) in prices.iter().enumerate() {
            let expected = (price * 100.0).round() as i64;
            assert_eq!(
                param(&params, &format!("line_items[{}][price_data][unit_amount]", i)),
                Some(expected.to_string().as_str()),
                "price {}",
                price
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_stripe() {
        // Unroutable base URL: any HTTP attempt would surface as NetworkError
        let gateway = StripeGateway::new(
            StripeConfig::new(
                "sk_test_abc",
                "whsec_test",
                "https://shop.example/s",
                "https://shop.example/c",
            )
            .with_api_base_url("http://127.0.0.1:9"),
        )
        .unwrap();
        let request = PaymentSessionRequest::new(Currency::new("usd").unwrap(), "o1");

        assert!(matches!(
            gateway.create_session(&request).await,
            Err(PaymentError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(gateway().provider_name(), "stripe");
    }
}
