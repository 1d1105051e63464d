//! Tracing layer capturing emitted events for assertions.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::Layer;

/// Layer that stores every event it sees.
#[derive(Clone)]
pub struct MockCaptureLayer {
    captured: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Captured event information.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    /// Structured fields other than `message`, rendered with `Debug`
    /// (strings recorded through `%` appear without quotes)
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    /// Get a captured field value.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl MockCaptureLayer {
    /// Create a new capture layer.
    pub fn new() -> Self {
        Self {
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get all captured events.
    pub fn get_captured(&self) -> Vec<CapturedEvent> {
        self.captured
            .lock()
            .expect(
                "MockCaptureLayer mutex poisoned - a test thread panicked while holding the lock",
            )
            .clone()
    }

    /// Get captured events whose message equals `message`.
    pub fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.get_captured()
            .into_iter()
            .filter(|event| event.message == message)
            .collect()
    }

    /// Get the count of captured events.
    pub fn count(&self) -> usize {
        self.captured
            .lock()
            .expect(
                "MockCaptureLayer mutex poisoned - a test thread panicked while holding the lock",
            )
            .len()
    }
}

impl Default for MockCaptureLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for MockCaptureLayer
where
    S: tracing::Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        self.captured
            .lock()
            .expect(
                "MockCaptureLayer mutex poisoned - a test thread panicked while holding the lock",
            )
            .push(CapturedEvent {
                level: *event.metadata().level(),
                message: visitor.message,
                fields: visitor.fields,
            });
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: BTreeMap<String, String>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{:?}", value));
        }
    }
}
