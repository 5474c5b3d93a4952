//! # Payment Error Types
//!
//! Typed error handling for the payments gateway.
//! All gateway operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Currency code is not a valid ISO 4217 code
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Internal notification could not be delivered
    #[error("Notification failed [{transport}]: {message}")]
    NotificationFailed { transport: String, message: String },

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns true for errors raised while authenticating or decoding a webhook
    pub fn is_webhook_rejection(&self) -> bool {
        matches!(
            self,
            PaymentError::WebhookVerificationFailed(_) | PaymentError::WebhookParseError(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::UnsupportedCurrency { .. } => 400,
            PaymentError::ProviderError { .. } => 502,
            PaymentError::NetworkError(_) => 503,
            PaymentError::WebhookVerificationFailed(_) => 400,
            PaymentError::WebhookParseError(_) => 400,
            PaymentError::NotificationFailed { .. } => 502,
            PaymentError::Internal(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PaymentError::InvalidRequest("test".into()).status_code(),
            400
        );
        assert_eq!(
            PaymentError::WebhookVerificationFailed("sig".into()).status_code(),
            400
        );
        assert_eq!(
            PaymentError::ProviderError {
                provider: "stripe".into(),
                message: "Invalid currency".into()
            }
            .status_code(),
            502
        );
    }

    #[test]
    fn test_webhook_rejection() {
        assert!(PaymentError::WebhookParseError("not json".into()).is_webhook_rejection());
        assert!(!PaymentError::NetworkError("reset".into()).is_webhook_rejection());
    }
}
