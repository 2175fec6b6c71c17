//! Records the field names of every event emitted while a closure runs.

use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

struct FieldNames(Arc<Mutex<Vec<Vec<String>>>>);

impl<S: Subscriber> Layer<S> for FieldNames {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let names = event.fields().map(|field| field.name().to_string()).collect();
        self.0.lock().unwrap().push(names);
    }
}

/// Field names per event, in emission order.
pub(crate) fn event_fields(f: impl FnOnce()) -> Vec<Vec<String>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(FieldNames(Arc::clone(&events)));
    tracing::subscriber::with_default(subscriber, f);
    let recorded = events.lock().unwrap().clone();
    recorded
}
