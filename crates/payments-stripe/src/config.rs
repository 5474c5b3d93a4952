//! # Stripe Configuration
//!
//! Configuration management for Stripe integration.
//! All secrets are loaded from environment variables.

use payments_core::PaymentError;
use std::env;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Default tolerance for webhook timestamps, in seconds
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// Webhook endpoint signing secret (whsec_...)
    pub webhook_secret: String,

    /// Where Stripe redirects after a completed payment
    pub success_url: String,

    /// Where Stripe redirects when the customer backs out
    pub cancel_url: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Maximum webhook timestamp age in seconds; 0 disables the check
    pub webhook_tolerance_secs: i64,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    /// - `STRIPE_ENDPOINT_SECRET`
    /// - `STRIPE_SUCCESS_URL`
    /// - `STRIPE_CANCEL_URL`
    ///
    /// Optional: `STRIPE_API_BASE_URL`, `STRIPE_WEBHOOK_TOLERANCE_SECS`.
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build from a variable lookup, then validate
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, PaymentError> {
        let required = |name: &str| {
            var(name).ok_or_else(|| PaymentError::Configuration(format!("{} not set", name)))
        };

        let config = Self {
            secret_key: required("STRIPE_SECRET_KEY")?,
            webhook_secret: required("STRIPE_ENDPOINT_SECRET")?,
            success_url: required("STRIPE_SUCCESS_URL")?,
            cancel_url: required("STRIPE_CANCEL_URL")?,
            api_base_url: var("STRIPE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_version: DEFAULT_API_VERSION.to_string(),
            webhook_tolerance_secs: match var("STRIPE_WEBHOOK_TOLERANCE_SECS") {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    PaymentError::Configuration(format!(
                        "STRIPE_WEBHOOK_TOLERANCE_SECS must be an integer, got {:?}",
                        raw
                    ))
                })?,
                None => DEFAULT_WEBHOOK_TOLERANCE_SECS,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        secret_key: impl Into<String>,
        webhook_secret: impl Into<String>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            webhook_tolerance_secs: DEFAULT_WEBHOOK_TOLERANCE_SECS,
        }
    }

    /// Validate key formats and redirect URLs
    pub fn validate(&self) -> Result<(), PaymentError> {
        if !self.secret_key.starts_with("sk_test_") && !self.secret_key.starts_with("sk_live_") {
            return Err(PaymentError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        if !self.webhook_secret.starts_with("whsec_") {
            return Err(PaymentError::Configuration(
                "STRIPE_ENDPOINT_SECRET must start with whsec_".to_string(),
            ));
        }

        for (name, url) in [
            ("STRIPE_SUCCESS_URL", &self.success_url),
            ("STRIPE_CANCEL_URL", &self.cancel_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PaymentError::Configuration(format!(
                    "{} must be an absolute http(s) URL",
                    name
                )));
            }
        }

        if self.webhook_tolerance_secs < 0 {
            return Err(PaymentError::Configuration(
                "STRIPE_WEBHOOK_TOLERANCE_SECS must not be negative".to_string(),
            ));
        }

        Ok(())
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set webhook timestamp tolerance
    pub fn with_webhook_tolerance(mut self, secs: i64) -> Self {
        self.webhook_tolerance_secs = secs;
        self
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"<redacted>")
            .field("webhook_secret", &"<redacted>")
            .field("success_url", &self.success_url)
            .field("cancel_url", &self.cancel_url)
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("webhook_tolerance_secs", &self.webhook_tolerance_secs)
            .finish()
    }
}
