//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the payment gateway, the notifier, and service configuration.

use crate::notifier::{HttpNotifier, LoggingNotifier};
use anyhow::Context;
use payments_core::{BoxedPaymentGateway, BoxedPaymentNotifier};
use payments_stripe::StripeGateway;
use std::sync::Arc;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Downstream endpoint for `payment.succeeded`; logged only when unset
    pub notify_url: Option<String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3003),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            notify_url: std::env::var("NOTIFY_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            log_format: match std::env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider
    pub gateway: BoxedPaymentGateway,
    /// Downstream notification transport
    pub notifier: BoxedPaymentNotifier,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with the Stripe gateway, configured from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let gateway = StripeGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        let notifier: BoxedPaymentNotifier = match &config.notify_url {
            Some(url) => Arc::new(
                HttpNotifier::new(url.clone())
                    .map_err(|e| anyhow::anyhow!("Failed to initialize notifier: {}", e))?,
            ),
            None => Arc::new(LoggingNotifier),
        };

        Ok(Self::from_parts(config, Arc::new(gateway), notifier))
    }

    /// Assemble state from explicit parts
    pub fn from_parts(
        config: AppConfig,
        gateway: BoxedPaymentGateway,
        notifier: BoxedPaymentNotifier,
    ) -> Self {
        Self {
            gateway,
            notifier,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str, port: u16) -> AppConfig {
        AppConfig {
            host: host.to_string(),
            port,
            environment: "test".to_string(),
            notify_url: None,
            log_format: LogFormat::Pretty,
        }
    }

    #[test]
    fn test_app_config_defaults() {
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("NOTIFY_URL");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3003);
        assert_eq!(config.notify_url, None);
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("0.0.0.0", 3000).socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_invalid_socket_addr() {
        assert!(config("not a host", 3000).socket_addr().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = config("127.0.0.1", 3003);
        assert!(!config.is_production());
        config.environment = "production".to_string();
        assert!(config.is_production());
    }
}
