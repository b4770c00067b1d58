use crate::models::event::RegistryEvent;

/// Append-only destination for registry notifications.
///
/// The registry publishes only after a mutation has been committed, and
/// publishing cannot undo it, so sinks report their own delivery failures.
pub trait EventSink {
    fn publish(&self, event: &RegistryEvent);
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn publish(&self, event: &RegistryEvent) {
        (**self).publish(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn publish(&self, event: &RegistryEvent) {
        (**self).publish(event);
    }
}

/// Fans every event out to both sinks, first then second
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn publish(&self, event: &RegistryEvent) {
        self.0.publish(event);
        self.1.publish(event);
    }
}

impl<S: EventSink> EventSink for Option<S> {
    fn publish(&self, event: &RegistryEvent) {
        if let Some(sink) = self {
            sink.publish(event);
        }
    }
}
