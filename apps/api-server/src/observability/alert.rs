//! Alerting layer for tracing.
//!
//! Intercepts ERROR-level events (storage outages surface here) and hands
//! them to an [`AlertSender`] on a background task.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{Event, Subscriber};
use tracing_subscriber::{Layer, layer::Context};

/// Alert message containing error details.
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub level: String,
    pub message: String,
    pub target: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub fields: Vec<(String, String)>,
}

impl AlertMessage {
    fn summary(&self) -> String {
        let mut text = format!("[{}] {}: {}", self.level, self.target, self.message);
        for (name, value) in &self.fields {
            text.push_str(&format!(" {}={}", name, value));
        }
        text
    }
}

/// Destination for alerts.
#[async_trait::async_trait]
pub trait AlertSender: Send + Sync {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("Failed to send alert: {0}")]
    SendError(String),
}

/// Writes alerts to stderr (for development).
pub struct ConsoleAlertSender;

#[async_trait::async_trait]
impl AlertSender for ConsoleAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        eprintln!("ALERT {} {}", alert.timestamp.to_rfc3339(), alert.summary());
        Ok(())
    }
}

/// Posts alerts to a chat webhook (Slack, Discord, ...).
pub struct WebhookAlertSender {
    url: String,
    client: reqwest::Client,
}

impl WebhookAlertSender {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl AlertSender for WebhookAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        let payload = serde_json::json!({
            "text": format!("*Publisher error* at {}\n{}", alert.timestamp.to_rfc3339(), alert.summary())
        });

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| AlertError::SendError(e.to_string()))?;

        Ok(())
    }
}

/// Tracing layer that forwards ERROR events to an [`AlertSender`].
///
/// Events are dropped when the buffer is full; logging never blocks on alerting.
pub struct AlertLayer {
    sender: mpsc::Sender<AlertMessage>,
}

impl AlertLayer {
    /// Must be called inside a Tokio runtime.
    pub fn new(alert_sender: Arc<dyn AlertSender>, buffer_size: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<AlertMessage>(buffer_size);

        tokio::spawn(async move {
            while let Some(alert) = rx.recv().await {
                if let Err(e) = alert_sender.send(alert).await {
                    eprintln!("{}", e);
                }
            }
        });

        Self { sender: tx }
    }

    pub fn console(buffer_size: usize) -> Self {
        Self::new(Arc::new(ConsoleAlertSender), buffer_size)
    }

    pub fn webhook(url: String, buffer_size: usize) -> Self {
        Self::new(Arc::new(WebhookAlertSender::new(url)), buffer_size)
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}

impl<S> Layer<S> for AlertLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::ERROR {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let alert = AlertMessage {
            level: event.metadata().level().to_string(),
            message: visitor.message,
            target: event.metadata().target().to_string(),
            timestamp: chrono::Utc::now(),
            fields: visitor.fields,
        };

        let _ = self.sender.try_send(alert);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    #[derive(Default)]
    struct RecordingSender {
        alerts: Mutex<Vec<AlertMessage>>,
    }

    #[async_trait::async_trait]
    impl AlertSender for RecordingSender {
        async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
            self.alerts.lock().unwrap().push(alert);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_only_errors_are_forwarded() {
        let sender = Arc::new(RecordingSender::default());
        let subscriber = tracing_subscriber::registry().with(AlertLayer::new(sender.clone(), 8));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("routine");
            tracing::error!(post_id = 4, "Database query error");
        });

        for _ in 0..50 {
            if !sender.alerts.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let alerts = sender.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "Database query error");
        assert_eq!(alerts[0].fields, vec![("post_id".to_string(), "4".to_string())]);
    }
}
