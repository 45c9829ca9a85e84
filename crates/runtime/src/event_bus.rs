use foundation::time::Millis;

/// Structured record of something the viewer did or refused to do.
///
/// The page drains these to give feedback (e.g. a nudge when a rotation is
/// ignored) and they double as a trace in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub at: Millis,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, at: Millis, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            at,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::time::Millis;

    #[test]
    fn records_events_with_timestamp() {
        let mut bus = EventBus::new();
        bus.emit(Millis(2), "test", "hello");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].at, Millis(2));
        assert_eq!(bus.count("test"), 1);
        assert_eq!(bus.count("other"), 0);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Millis(0), "k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
