use super::Event;

/// Receiver of interaction events emitted by the graph view.
pub trait EventSink {
    fn send(&self, event: Event);
}

impl<F: Fn(Event)> EventSink for F {
    fn send(&self, event: Event) {
        self(event);
    }
}

#[cfg(feature = "events")]
impl EventSink for crossbeam::channel::Sender<Event> {
    fn send(&self, event: Event) {
        if let Err(err) = crossbeam::channel::Sender::send(self, event) {
            log::warn!("event receiver dropped: {err}");
        }
    }
}
