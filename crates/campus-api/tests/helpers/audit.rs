//! Captures `audit` target records emitted while a guard is held

use serde_json::Value;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Clone, Default)]
pub struct AuditCapture {
    entries: Arc<Mutex<Vec<Value>>>,
}

impl AuditCapture {
    /// Route this thread's events through the capture until the guard drops.
    ///
    /// Tests run on a current-thread runtime and the test server calls the
    /// router in-process, so handler events land on this thread.
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    /// `event_type` of every captured record, in emission order
    pub fn event_types(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter_map(|entry| entry["event_type"].as_str().map(str::to_string))
            .collect()
    }
}

struct AuditEntryVisitor(Option<String>);

impl Visit for AuditEntryVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "audit_entry" {
            self.0 = Some(format!("{:?}", value));
        }
    }
}

impl<S: Subscriber> Layer<S> for AuditCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != "audit" {
            return;
        }
        let mut visitor = AuditEntryVisitor(None);
        event.record(&mut visitor);
        if let Some(entry) = visitor.0.and_then(|json| serde_json::from_str(&json).ok()) {
            self.entries.lock().unwrap().push(entry);
        }
    }
}
