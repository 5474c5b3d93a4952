//! # Payment Session Types
//!
//! Request and result types for hosted checkout sessions.

use crate::error::{PaymentError, PaymentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ISO 4217 alphabetic currency code, stored lowercase (the form Stripe expects)
///
/// Only the shape is checked here. Whether a code is actually supported is
/// decided by the provider, which rejects unknown codes at session creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Parse and normalize a currency code
    pub fn new(code: impl AsRef<str>) -> PaymentResult<Self> {
        let code = code.as_ref().trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PaymentError::UnsupportedCurrency {
                currency: code.to_string(),
            });
        }
        Ok(Self(code.to_ascii_lowercase()))
    }

    /// Returns the lowercase ISO 4217 code
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_uppercase())
    }
}

/// Largest unit amount, in minor units, a checkout line item may carry
pub const MAX_UNIT_AMOUNT: i64 = 99_999_999;

/// Convert a decimal amount in major units to minor units (cents, etc.)
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// A purchasable item in a payment session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionItem {
    /// Display name shown on the hosted page
    pub name: String,

    /// Unit price in major currency units (e.g. 19.99)
    pub price: f64,

    /// Quantity, at least 1
    pub quantity: u32,
}

impl SessionItem {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Unit price in minor units, as sent to the provider
    pub fn unit_amount(&self) -> i64 {
        to_minor_units(self.price)
    }

    fn validate(&self, index: usize) -> PaymentResult<()> {
        if self.name.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(format!(
                "items[{}].name must not be empty",
                index
            )));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(PaymentError::InvalidRequest(format!(
                "items[{}].price must be a positive amount",
                index
            )));
        }
        if self.unit_amount() > MAX_UNIT_AMOUNT {
            return Err(PaymentError::InvalidRequest(format!(
                "items[{}].price exceeds the maximum of {} minor units",
                index, MAX_UNIT_AMOUNT
            )));
        }
        if self.quantity == 0 {
            return Err(PaymentError::InvalidRequest(format!(
                "items[{}].quantity must be at least 1",
                index
            )));
        }
        Ok(())
    }
}

/// Request to open a hosted checkout session for an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionRequest {
    pub currency: Currency,

    /// Order id, carried through the provider as payment metadata
    pub order_id: String,

    pub items: Vec<SessionItem>,
}

impl PaymentSessionRequest {
    pub fn new(currency: Currency, order_id: impl Into<String>) -> Self {
        Self {
            currency,
            order_id: order_id.into(),
            items: Vec::new(),
        }
    }

    /// Builder: append an item
    pub fn with_item(mut self, item: SessionItem) -> Self {
        self.items.push(item);
        self
    }

    /// Check the request before any provider call
    pub fn validate(&self) -> PaymentResult<()> {
        if self.order_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "orderId must not be empty".to_string(),
            ));
        }
        if self.items.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "Payment session has no items".to_string(),
            ));
        }
        self.items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| item.validate(i))
    }

    /// Order total in minor units, `None` if it does not fit in an `i64`
    pub fn total_amount(&self) -> Option<i64> {
        self.items.iter().try_fold(0i64, |total, item| {
            item.unit_amount()
                .checked_mul(i64::from(item.quantity))
                .and_then(|line| total.checked_add(line))
        })
    }
}

/// A checkout session issued by the payment provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Order the session was opened for
    pub order_id: String,

    /// Hosted payment page to redirect the customer to
    pub url: String,

    pub success_url: String,

    pub cancel_url: String,

    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_request() -> PaymentSessionRequest {
        PaymentSessionRequest::new(Currency::new("usd").unwrap(), "o1")
            .with_item(SessionItem::new("Widget", 19.99, 2))
    }

    #[test]
    fn test_currency_normalization() {
        assert_eq!(Currency::new("USD").unwrap().as_str(), "usd");
        assert_eq!(Currency::new(" eur ").unwrap().as_str(), "eur");
        assert_eq!(Currency::new("gbp").unwrap().to_string(), "GBP");
    }

    #[test]
    fn test_invalid_currency() {
        for code in ["", "us", "usdd", "u$d", "123"] {
            assert!(
                matches!(
                    Currency::new(code),
                    Err(PaymentError::UnsupportedCurrency { .. })
                ),
                "{code:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_minor_units_rounding() {
        assert_eq!(to_minor_units(19.99), 1999);
        assert_eq!(to_minor_units(20.0), 2000);
        assert_eq!(to_minor_units(0.1 + 0.2), 30);
        assert_eq!(to_minor_units(1.005), 100);
    }

    #[test]
    fn test_request_total() {
        let request = widget_request().with_item(SessionItem::new("Gadget", 5.0, 1));
        assert_eq!(request.total_amount(), Some(1999 * 2 + 500));
    }

    #[test]
    fn test_total_overflow_is_none() {
        let request = widget_request().with_item(SessionItem::new("Yacht", 1e17, 2));
        assert_eq!(request.total_amount(), None);
    }

    #[test]
    fn test_rejects_price_above_maximum() {
        let request = widget_request().with_item(SessionItem::new("Yacht", 1e17, 2));
        assert!(matches!(
            request.validate(),
            Err(PaymentError::InvalidRequest(msg)) if msg.contains("items[1].price")
        ));

        let at_limit = widget_request().with_item(SessionItem::new("Car", 999_999.99, 1));
        assert!(at_limit.validate().is_ok());

        let over_limit = widget_request().with_item(SessionItem::new("Car", 1_000_000.0, 1));
        assert!(over_limit.validate().is_err());
    }

    #[test]
    fn test_valid_request() {
        assert!(widget_request().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_items() {
        let request = PaymentSessionRequest::new(Currency::new("usd").unwrap(), "o1");
        assert!(matches!(
            request.validate(),
            Err(PaymentError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_rejects_bad_items() {
        let cases = [
            SessionItem::new("Widget", 0.0, 1),
            SessionItem::new("Widget", -3.0, 1),
            SessionItem::new("Widget", f64::NAN, 1),
            SessionItem::new("Widget", 1.0, 0),
            SessionItem::new("  ", 1.0, 1),
        ];
        for item in cases {
            let request = widget_request().with_item(item.clone());
            assert!(request.validate().is_err(), "{item:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_blank_order_id() {
        let mut request = widget_request();
        request.order_id = " ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "currency": "USD",
            "orderId": "o1",
            "items": [{ "name": "Widget", "price": 19.99, "quantity": 2 }]
        }"#;
        let request: PaymentSessionRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.currency.as_str(), "usd");
        assert_eq!(request.order_id, "o1");
        assert_eq!(request.items[0].unit_amount(), 1999);
        assert_eq!(request.items[0].quantity, 2);
    }

    #[test]
    fn test_deserialize_rejects_bad_currency() {
        let json = r#"{ "currency": "dollars", "orderId": "o1", "items": [] }"#;
        assert!(serde_json::from_str::<PaymentSessionRequest>(json).is_err());
    }
}
