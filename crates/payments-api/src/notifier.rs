//! # Notifiers
//!
//! Transports for the `payment.succeeded` notification. Delivery is
//! at-most-once: failures are logged by the caller and never retried.

use async_trait::async_trait;
use payments_core::{Notification, PaymentError, PaymentNotifier, PaymentResult};
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{info, instrument};

/// Logs the notification instead of delivering it (no downstream consumer)
pub struct LoggingNotifier;

#[async_trait]
impl PaymentNotifier for LoggingNotifier {
    async fn emit(&self, notification: &Notification) -> PaymentResult<()> {
        info!(
            pattern = %notification.pattern,
            stripe_payment_id = %notification.data.stripe_payment_id,
            order_id = %notification.data.order_id,
            receipt_url = ?notification.data.receipt_url,
            "Payment succeeded"
        );
        Ok(())
    }

    fn transport(&self) -> &'static str {
        "log"
    }
}

/// POSTs the notification as JSON to a downstream service
pub struct HttpNotifier {
    url: String,
    client: Client,
}

impl HttpNotifier {
    pub fn new(url: impl Into<String>) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl PaymentNotifier for HttpNotifier {
    #[instrument(skip(self, notification), fields(url = %self.url, id = %notification.id))]
    async fn emit(&self, notification: &Notification) -> PaymentResult<()> {
        let response = self
            .client
            .post(&self.url)
            .header("X-Notification-Pattern", &notification.pattern)
            .json(notification)
            .send()
            .await
            .map_err(|e| PaymentError::NotificationFailed {
                transport: self.transport().to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::NotificationFailed {
                transport: self.transport().to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        info!("Notification delivered: status={}", status);
        Ok(())
    }

    fn transport(&self) -> &'static str {
        "http"
    }
}

/// Hands notifications to an in-process consumer over a tokio channel
#[derive(Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end for the consumer
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl PaymentNotifier for ChannelNotifier {
    async fn emit(&self, notification: &Notification) -> PaymentResult<()> {
        self.sender
            .send(notification.clone())
            .map_err(|_| PaymentError::NotificationFailed {
                transport: self.transport().to_string(),
                message: "receiver dropped".to_string(),
            })
    }

    fn transport(&self) -> &'static str {
        "channel"
    }
}
